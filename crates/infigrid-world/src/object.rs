//! Bounded objects placed in the grid.

use std::fmt;
use std::iter::successors;

use hashbrown::HashSet;
use infigrid_core::{Axis, BlockAddress, BlockIndex, Error, GridPoint, Result};
use num_bigint::BigInt;
use num_traits::One;

/// Identifier of an object inside a grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Wrap a caller-chosen identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier text
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of identifiers for objects built without an explicit uid.
pub trait IdSource {
    /// Produce an identifier not handed out before
    fn next_id(&mut self) -> ObjectId;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> ObjectId {
        ObjectId(uuid::Uuid::new_v4().to_string())
    }
}

/// Deterministic `"<prefix>-<n>"` identifiers counting up from 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    /// Create a counter with the given prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("obj")
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Predicate a payload must satisfy for its object to be built.
pub type Validator<D> = Box<dyn Fn(&D) -> bool>;

/// An axis-aligned box between two grid points, carrying a payload.
#[derive(Debug, Clone)]
pub struct GridObject<D> {
    uid: ObjectId,
    start: GridPoint,
    end: GridPoint,
    data: D,
}

impl<D> GridObject<D> {
    /// Start building an object spanning `start` to `end`.
    pub fn builder(start: GridPoint, end: GridPoint, data: D) -> GridObjectBuilder<D> {
        GridObjectBuilder {
            uid: None,
            start,
            end,
            data,
            validator: None,
        }
    }

    /// Unique identifier
    #[inline]
    pub const fn uid(&self) -> &ObjectId {
        &self.uid
    }

    /// Lower corner
    #[inline]
    pub const fn start(&self) -> &GridPoint {
        &self.start
    }

    /// Upper corner
    #[inline]
    pub const fn end(&self) -> &GridPoint {
        &self.end
    }

    /// Payload
    #[inline]
    pub const fn data(&self) -> &D {
        &self.data
    }

    /// Consume the object, returning its payload
    pub fn into_data(self) -> D {
        self.data
    }

    /// Midpoint of the two corners. Its block is the object's home block.
    pub fn center_point(&self) -> GridPoint {
        GridPoint::midpoint(&self.start, &self.end)
    }

    /// Keys of every block the box touches.
    ///
    /// The home block is left out unless `include_center_point` is set,
    /// since the index records it separately.
    pub fn overlapping(&self, include_center_point: bool) -> HashSet<BlockIndex> {
        let mut overlapped: HashSet<BlockIndex> =
            blocks_in_cube(self.start.block(), self.end.block())
                .map(BlockIndex::from)
                .collect();
        if !include_center_point {
            overlapped.remove(self.center_point().index());
        }
        overlapped
    }

    /// Number of blocks the box touches, home block included.
    pub fn span(&self) -> BigInt {
        Axis::ALL
            .iter()
            .map(|&axis| self.end.block().get(axis) - self.start.block().get(axis) + 1u32)
            .fold(BigInt::one(), |acc, extent| acc * extent)
    }

    /// Whether the two closed boxes share at least one point.
    pub fn intersects<E>(&self, other: &GridObject<E>) -> bool {
        Axis::ALL.iter().all(|&axis| {
            self.start.le_on(axis, &other.end) && other.start.le_on(axis, &self.end)
        })
    }
}

/// Builder for [`GridObject`], the only way to construct one.
pub struct GridObjectBuilder<D> {
    uid: Option<ObjectId>,
    start: GridPoint,
    end: GridPoint,
    data: D,
    validator: Option<Validator<D>>,
}

impl<D> GridObjectBuilder<D> {
    /// Use a caller-chosen identifier instead of drawing one
    #[must_use]
    pub fn uid(mut self, uid: impl Into<ObjectId>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Reject the object unless `validator` accepts its payload
    #[must_use]
    pub fn validator(mut self, validator: impl Fn(&D) -> bool + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Validate and build, drawing a uid from `ids` if none was set.
    ///
    /// No identifier is consumed when validation fails.
    pub fn build_with(self, ids: &mut impl IdSource) -> Result<GridObject<D>> {
        if !self.start.point_le(&self.end) {
            return Err(Error::InvalidBounds(format!(
                "start {} is not <= end {} on every axis",
                self.start, self.end
            )));
        }
        if let Some(validator) = &self.validator {
            if !validator(&self.data) {
                return Err(Error::InvalidData(match &self.uid {
                    Some(uid) => format!("payload of object {uid} rejected by validator"),
                    None => "payload rejected by validator".to_string(),
                }));
            }
        }

        Ok(GridObject {
            uid: self.uid.unwrap_or_else(|| ids.next_id()),
            start: self.start,
            end: self.end,
            data: self.data,
        })
    }

    /// Validate and build with a random UUID if no uid was set.
    pub fn build(self) -> Result<GridObject<D>> {
        self.build_with(&mut RandomIds)
    }
}

/// Every address in the closed cube `[start ..= end]`, x-major.
pub fn blocks_in_cube<'a>(
    start: &'a BlockAddress,
    end: &'a BlockAddress,
) -> impl Iterator<Item = BlockAddress> + 'a {
    axis_range(&start.x, &end.x).flat_map(move |x| {
        axis_range(&start.y, &end.y).flat_map(move |y| {
            let x = x.clone();
            axis_range(&start.z, &end.z).map(move |z| BlockAddress {
                x: x.clone(),
                y: y.clone(),
                z,
            })
        })
    })
}

fn axis_range<'a>(from: &BigInt, to: &'a BigInt) -> impl Iterator<Item = BigInt> + 'a {
    successors(Some(from.clone()), |v| Some(v + 1u32)).take_while(move |v| v <= to)
}
