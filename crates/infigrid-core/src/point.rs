//! World positions at full precision.

use std::cmp::Ordering;
use std::fmt;

use glam::DVec3;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::coords::{Axis, BlockAddress, BlockIndex, LocalPoint};
use crate::error::Result;
use crate::geometry;

/// Largest block delta that converts to `f64` without rounding.
const MAX_EXACT_F64: i64 = 1 << 53;

/// A position in the world: a block plus an offset inside it.
///
/// The block is kept both as an address and as its lookup key; the two are
/// fixed together at construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridPoint {
    block: BlockAddress,
    index: BlockIndex,
    local: LocalPoint,
}

impl GridPoint {
    /// Create a point from a block address and a validated offset
    pub fn new(block: BlockAddress, local: LocalPoint) -> Self {
        let index = BlockIndex::from(&block);
        Self {
            block,
            index,
            local,
        }
    }

    /// Create a point from a block key.
    pub fn from_index(index: BlockIndex, local: LocalPoint) -> Result<Self> {
        let block = index.to_address()?;
        Ok(Self {
            block,
            index,
            local,
        })
    }

    /// Create a point from a block address and raw fractions.
    pub fn from_parts(block: BlockAddress, local: [f64; 3]) -> Result<Self> {
        Ok(Self::new(block, LocalPoint::try_from(local)?))
    }

    /// Block address
    #[inline]
    pub const fn block(&self) -> &BlockAddress {
        &self.block
    }

    /// Block lookup key
    #[inline]
    pub const fn index(&self) -> &BlockIndex {
        &self.index
    }

    /// Offset within the block
    #[inline]
    pub const fn local(&self) -> &LocalPoint {
        &self.local
    }

    /// Midpoint of two points. Symmetric in its arguments.
    pub fn midpoint(p1: &Self, p2: &Self) -> Self {
        let (block, local) = geometry::midpoint(&p1.block, &p1.local, &p2.block, &p2.local);
        Self::new(block, local)
    }

    /// Midpoint between `self` and `other`
    pub fn midpoint_with(&self, other: &Self) -> Self {
        Self::midpoint(self, other)
    }

    /// Distance to `other` as `(integer part, fraction in [0, 1))`.
    pub fn distance(&self, other: &Self) -> (BigInt, f64) {
        geometry::point_distance(&self.block, &self.local, &other.block, &other.local)
    }

    /// Distance between the two blocks' lower corners, ignoring offsets.
    pub fn block_distance(&self, other: &Self) -> (BigInt, f64) {
        geometry::int_frac_distance(&self.block, &other.block)
    }

    /// Compare along one axis: block first, offset only when blocks tie.
    pub fn cmp_on(&self, axis: Axis, other: &Self) -> Ordering {
        self.block
            .get(axis)
            .cmp(other.block.get(axis))
            .then_with(|| self.local.get(axis).cmp(&other.local.get(axis)))
    }

    /// `self <= other` along `axis`
    pub fn le_on(&self, axis: Axis, other: &Self) -> bool {
        self.cmp_on(axis, other).is_le()
    }

    /// `self >= other` along `axis`
    pub fn ge_on(&self, axis: Axis, other: &Self) -> bool {
        self.cmp_on(axis, other).is_ge()
    }

    /// `self <= other` on every axis
    pub fn point_le(&self, other: &Self) -> bool {
        Axis::ALL.iter().all(|&axis| self.le_on(axis, other))
    }

    /// `self >= other` on every axis
    pub fn point_ge(&self, other: &Self) -> bool {
        Axis::ALL.iter().all(|&axis| self.ge_on(axis, other))
    }

    /// Offset from `origin` as a double-precision vector.
    ///
    /// Returns `None` if a block delta exceeds `2^53` and would lose
    /// precision.
    #[allow(clippy::cast_precision_loss)]
    pub fn relative_to(&self, origin: &Self) -> Option<DVec3> {
        let mut blocks = [0.0; 3];
        for (slot, axis) in blocks.iter_mut().zip(Axis::ALL) {
            let delta = (self.block.get(axis) - origin.block.get(axis)).to_i64()?;
            if delta.unsigned_abs() > MAX_EXACT_F64.unsigned_abs() {
                return None;
            }
            *slot = delta as f64;
        }
        Some(DVec3::from_array(blocks) + self.local.to_dvec3() - origin.local.to_dvec3())
    }
}

/// Product order: a point is below another only if it is below on every axis.
impl PartialOrd for GridPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.point_le(other), self.point_ge(other)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.block, self.local)
    }
}
