//! Per-block membership records.

use hashbrown::HashSet;
use infigrid_core::BlockIndex;

use crate::object::ObjectId;

/// Objects registered in one block of the grid.
///
/// `main` holds objects centred in this block, `overlapping` those that only
/// reach into it. An object is never in both sets of the same block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    index: BlockIndex,
    pub(crate) main: HashSet<ObjectId>,
    pub(crate) overlapping: HashSet<ObjectId>,
}

impl Block {
    /// Create an empty block record
    pub fn new(index: BlockIndex) -> Self {
        Self {
            index,
            main: HashSet::new(),
            overlapping: HashSet::new(),
        }
    }

    /// Key of this block
    #[inline]
    pub const fn index(&self) -> &BlockIndex {
        &self.index
    }

    /// Objects whose centre lies in this block
    #[inline]
    pub const fn main(&self) -> &HashSet<ObjectId> {
        &self.main
    }

    /// Objects reaching into this block from another home block
    #[inline]
    pub const fn overlapping(&self) -> &HashSet<ObjectId> {
        &self.overlapping
    }

    /// Whether both sets are empty
    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.overlapping.is_empty()
    }

    /// Whether `uid` is registered here in either role
    pub fn contains(&self, uid: &ObjectId) -> bool {
        self.main.contains(uid) || self.overlapping.contains(uid)
    }

    /// Every object registered here, centred or overlapping.
    pub fn objects(&self) -> HashSet<ObjectId> {
        [&self.main, &self.overlapping]
            .into_iter()
            .fold(HashSet::new(), |mut all, set| {
                all.extend(set.iter().cloned());
                all
            })
    }
}

/// Every object in `block`, or nothing for an unpopulated block.
pub fn block_objects(block: Option<&Block>) -> HashSet<ObjectId> {
    block.map(Block::objects).unwrap_or_default()
}
