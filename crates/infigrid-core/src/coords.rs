//! Coordinate model: unbounded block addresses and bounded local offsets.
//!
//! A world position is split into a [`BlockAddress`] (three unbounded
//! integers) and a [`LocalPoint`] (three fractions in `[0, 1)`). Blocks are
//! looked up through [`BlockIndex`], the canonical text encoding of an
//! address.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use glam::DVec3;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separator between the three components of a [`BlockIndex`].
pub const SEPARATOR: char = ',';

/// One of the three world axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in `x, y, z` order
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];
}

/// Address of a block, one unbounded integer per axis.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockAddress {
    pub x: BigInt,
    pub y: BigInt,
    pub z: BigInt,
}

impl BlockAddress {
    /// Create a new block address
    pub fn new(x: impl Into<BigInt>, y: impl Into<BigInt>, z: impl Into<BigInt>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// Component along `axis`
    #[inline]
    pub const fn get(&self, axis: Axis) -> &BigInt {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Encode as the canonical lookup key
    pub fn to_index(&self) -> BlockIndex {
        BlockIndex::from(self)
    }
}

impl fmt::Display for BlockAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl FromStr for BlockAddress {
    type Err = Error;

    /// Decode a canonical `x,y,z` string.
    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split(SEPARATOR).collect();
        let [x, y, z] = tokens.as_slice() else {
            return Err(Error::Format(format!(
                "{s:?} has {} components, expected 3",
                tokens.len()
            )));
        };
        Ok(Self {
            x: parse_component(s, x)?,
            y: parse_component(s, y)?,
            z: parse_component(s, z)?,
        })
    }
}

/// Parse one decimal component, accepting only the form `BigInt`'s
/// `Display` produces.
fn parse_component(index: &str, token: &str) -> Result<BigInt> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    let canonical = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && !(digits.len() > 1 && digits.starts_with('0'))
        && !(digits == "0" && token.starts_with('-'));
    if !canonical {
        return Err(Error::Format(format!(
            "{index:?} contains non-canonical integer {token:?}"
        )));
    }
    token
        .parse()
        .map_err(|e| Error::Format(format!("{index:?}: {e}")))
}

/// Canonical hashable key of a [`BlockAddress`].
///
/// Only obtainable by encoding an address or by parsing a canonical string,
/// so every value decodes back to exactly one address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockIndex(String);

impl BlockIndex {
    /// The encoded key
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode back into the address this key was built from
    pub fn to_address(&self) -> Result<BlockAddress> {
        self.0.parse()
    }
}

impl From<&BlockAddress> for BlockIndex {
    fn from(address: &BlockAddress) -> Self {
        Self(format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            address.x, address.y, address.z
        ))
    }
}

impl From<BlockAddress> for BlockIndex {
    fn from(address: BlockAddress) -> Self {
        Self::from(&address)
    }
}

impl From<&BlockIndex> for BlockIndex {
    fn from(index: &BlockIndex) -> Self {
        index.clone()
    }
}

impl FromStr for BlockIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<BlockAddress>()?;
        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for BlockIndex {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse::<BlockAddress>()?;
        Ok(Self(s))
    }
}

impl From<BlockIndex> for String {
    fn from(index: BlockIndex) -> Self {
        index.0
    }
}

impl fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that names a block: an address, or a key owned or borrowed.
///
/// A borrowed key is passed through without cloning; addresses are encoded.
pub trait BlockKey<'a> {
    /// The key this value names
    fn block_key(self) -> Cow<'a, BlockIndex>;
}

impl<'a> BlockKey<'a> for &'a BlockIndex {
    fn block_key(self) -> Cow<'a, BlockIndex> {
        Cow::Borrowed(self)
    }
}

impl<'a> BlockKey<'a> for BlockIndex {
    fn block_key(self) -> Cow<'a, BlockIndex> {
        Cow::Owned(self)
    }
}

impl<'a> BlockKey<'a> for &BlockAddress {
    fn block_key(self) -> Cow<'a, BlockIndex> {
        Cow::Owned(BlockIndex::from(self))
    }
}

impl<'a> BlockKey<'a> for BlockAddress {
    fn block_key(self) -> Cow<'a, BlockIndex> {
        Cow::Owned(BlockIndex::from(&self))
    }
}

/// Encode an address as its canonical key.
pub fn address_to_index(address: &BlockAddress) -> BlockIndex {
    BlockIndex::from(address)
}

/// Decode a key string into an address.
pub fn index_to_address(index: &str) -> Result<BlockAddress> {
    index.parse()
}

/// Offset within a block along one axis, always in `[0, 1)`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct LocalValue(f64);

impl LocalValue {
    /// The block's lower edge
    pub const ZERO: Self = Self(0.0);

    /// Validate a local value. `-0.0` is stored as `0.0`.
    pub fn new(value: f64) -> Result<Self> {
        if (0.0..1.0).contains(&value) {
            Ok(Self(value + 0.0))
        } else {
            Err(Error::InvalidLocalValue(value))
        }
    }

    /// Wrap a value already known to lie in `[0, 1)`.
    #[inline]
    pub(crate) fn new_unchecked(value: f64) -> Self {
        debug_assert!(
            (0.0..1.0).contains(&value),
            "local value {value} out of range"
        );
        Self(value + 0.0)
    }

    /// The raw fraction
    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for LocalValue {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

// NaN and -0.0 never get past the constructor, so equality is total and
// agrees with the bit pattern.
impl Eq for LocalValue {}

impl PartialOrd for LocalValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LocalValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for LocalValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl TryFrom<f64> for LocalValue {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<LocalValue> for f64 {
    fn from(value: LocalValue) -> Self {
        value.0
    }
}

impl fmt::Display for LocalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Offset within a block, one [`LocalValue`] per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: LocalValue,
    pub y: LocalValue,
    pub z: LocalValue,
}

impl LocalPoint {
    /// The block's lower corner
    pub const ORIGIN: Self =
        Self::from_values(LocalValue::ZERO, LocalValue::ZERO, LocalValue::ZERO);

    /// Validate three raw fractions
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        Ok(Self {
            x: LocalValue::new(x)?,
            y: LocalValue::new(y)?,
            z: LocalValue::new(z)?,
        })
    }

    /// Build from already validated values
    #[inline]
    pub const fn from_values(x: LocalValue, y: LocalValue, z: LocalValue) -> Self {
        Self { x, y, z }
    }

    /// Component along `axis`
    #[inline]
    pub const fn get(&self, axis: Axis) -> LocalValue {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Raw fractions in `x, y, z` order
    #[inline]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x.0, self.y.0, self.z.0]
    }

    /// Convert to glam DVec3
    #[inline]
    pub const fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x.0, self.y.0, self.z.0)
    }
}

impl TryFrom<[f64; 3]> for LocalPoint {
    type Error = Error;

    fn try_from([x, y, z]: [f64; 3]) -> Result<Self> {
        Self::new(x, y, z)
    }
}

impl fmt::Display for LocalPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
