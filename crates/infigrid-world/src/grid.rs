//! Block-partitioned object index with reverse lookups.

use hashbrown::{HashMap, HashSet};
use infigrid_core::{BlockIndex, BlockKey, Error, Result};
use num_bigint::BigInt;
use tracing::{debug, trace, warn};

use crate::block::{block_objects, Block};
use crate::config::GridConfig;
use crate::object::{GridObject, ObjectId};

/// Index of objects by the blocks they occupy.
///
/// Every object has one home block (the block of its centre point) where it
/// sits in the `main` set, and is listed in the `overlapping` set of every
/// other block its box touches. Reverse lookups from uid to those blocks make
/// removal proportional to the object's size rather than the grid's.
///
/// Mutation needs `&mut self`; callers sharing a grid across threads must
/// wrap it in their own lock.
#[derive(Debug)]
pub struct InfiniteGrid<D> {
    config: GridConfig,
    blocks: HashMap<BlockIndex, Block>,
    objects: HashMap<ObjectId, GridObject<D>>,
    home_lookup: HashMap<ObjectId, BlockIndex>,
    overlap_lookup: HashMap<ObjectId, HashSet<BlockIndex>>,
}

impl<D> InfiniteGrid<D> {
    /// Create an empty grid.
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            blocks: HashMap::new(),
            objects: HashMap::new(),
            home_lookup: HashMap::new(),
            overlap_lookup: HashMap::new(),
        }
    }

    /// Create a grid holding `objects`, with the default configuration.
    pub fn from_objects(objects: impl IntoIterator<Item = GridObject<D>>) -> Result<Self> {
        Self::from_objects_with(GridConfig::default(), objects)
    }

    /// Create a grid holding `objects`.
    pub fn from_objects_with(
        config: GridConfig,
        objects: impl IntoIterator<Item = GridObject<D>>,
    ) -> Result<Self> {
        let mut grid = Self::new(config);
        for object in objects {
            grid.insert_object(object)?;
        }
        Ok(grid)
    }

    /// Get the grid configuration.
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of objects in the grid
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the grid holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of populated blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Whether an object with this uid is in the grid
    pub fn contains(&self, uid: &ObjectId) -> bool {
        self.objects.contains_key(uid)
    }

    /// Look up a stored object
    pub fn get_object(&self, uid: &ObjectId) -> Option<&GridObject<D>> {
        self.objects.get(uid)
    }

    /// Iterate over stored objects in no particular order
    pub fn objects(&self) -> impl Iterator<Item = &GridObject<D>> {
        self.objects.values()
    }

    /// Iterate over populated blocks in no particular order
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Home block of a stored object
    pub fn home_block(&self, uid: &ObjectId) -> Option<&BlockIndex> {
        self.home_lookup.get(uid)
    }

    /// Non-home blocks a stored object reaches into
    pub fn overlap_blocks(&self, uid: &ObjectId) -> Option<&HashSet<BlockIndex>> {
        self.overlap_lookup.get(uid)
    }

    /// Look up a block by address or key. Never creates one.
    pub fn get_block<'k>(&self, key: impl BlockKey<'k>) -> Option<&Block> {
        self.blocks.get(key.block_key().as_ref())
    }

    /// Get the block at `key`, creating an empty record if it is absent.
    pub fn create_block(&mut self, key: impl Into<BlockIndex>) -> &mut Block {
        self.blocks.entry(key.into()).or_insert_with_key(|index| {
            trace!(block = %index, "creating block");
            Block::new(index.clone())
        })
    }

    /// Every object centred in or reaching into the block at `key`.
    pub fn objects_in_block<'k>(&self, key: impl BlockKey<'k>) -> HashSet<ObjectId> {
        block_objects(self.get_block(key))
    }

    /// Add an object to the grid.
    ///
    /// Returns `Ok(false)` without touching the grid if the uid is already
    /// present. Fails only when the object covers more blocks than
    /// [`GridConfig::max_object_span`] allows, before any state changes.
    pub fn insert_object(&mut self, object: GridObject<D>) -> Result<bool> {
        if self.objects.contains_key(object.uid()) {
            trace!(uid = %object.uid(), "object already tracked");
            return Ok(false);
        }
        self.check_span(&object)?;

        let uid = object.uid().clone();
        let home = object.center_point().index().clone();
        self.create_block(home.clone()).main.insert(uid.clone());

        let overlapping = object.overlapping(false);
        for index in &overlapping {
            self.create_block(index.clone())
                .overlapping
                .insert(uid.clone());
        }

        debug!(
            uid = %uid,
            home = %home,
            overlaps = overlapping.len(),
            "inserted object"
        );
        self.home_lookup.insert(uid.clone(), home);
        self.overlap_lookup.insert(uid.clone(), overlapping);
        self.objects.insert(uid, object);
        Ok(true)
    }

    /// Remove an object from the grid, returning it.
    ///
    /// Untracked uids are a silent no-op, so removing twice is safe. Blocks
    /// left with no objects are dropped.
    pub fn remove_object(&mut self, uid: &ObjectId) -> Option<GridObject<D>> {
        let Some(home) = self.home_lookup.remove(uid) else {
            trace!(uid = %uid, "remove of untracked object ignored");
            return None;
        };
        let overlapping = self.overlap_lookup.remove(uid).unwrap_or_default();

        if let Some(block) = self.blocks.get_mut(&home) {
            block.main.remove(uid);
        }
        self.remove_block_if_empty(&home);

        for index in &overlapping {
            if let Some(block) = self.blocks.get_mut(index) {
                block.overlapping.remove(uid);
            }
            self.remove_block_if_empty(index);
        }

        debug!(uid = %uid, home = %home, overlaps = overlapping.len(), "removed object");
        self.objects.remove(uid)
    }

    /// Objects whose boxes intersect `probe`, sorted by uid.
    ///
    /// Candidates come from every block the probe covers, so the probe is
    /// subject to the same span limit as inserted objects.
    pub fn intersecting<E>(&self, probe: &GridObject<E>) -> Result<Vec<ObjectId>> {
        self.check_span(probe)?;

        let candidates = probe
            .overlapping(true)
            .iter()
            .filter_map(|index| self.blocks.get(index))
            .fold(HashSet::new(), |mut all, block| {
                all.extend(block.objects());
                all
            });

        let mut hits: Vec<ObjectId> = candidates
            .into_iter()
            .filter(|uid| {
                self.objects
                    .get(uid)
                    .is_some_and(|object| object.intersects(probe))
            })
            .collect();
        hits.sort();
        Ok(hits)
    }

    fn check_span<E>(&self, object: &GridObject<E>) -> Result<()> {
        let Some(limit) = self.config.max_object_span else {
            return Ok(());
        };
        let span = object.span();
        if span > BigInt::from(limit) {
            warn!(uid = %object.uid(), %span, limit, "object spans too many blocks");
            return Err(Error::OutOfBounds(format!(
                "object {} spans {span} blocks, limit is {limit}",
                object.uid()
            )));
        }
        Ok(())
    }

    fn remove_block_if_empty(&mut self, index: &BlockIndex) {
        if self.blocks.get(index).is_some_and(Block::is_empty) {
            trace!(block = %index, "reclaiming empty block");
            self.blocks.remove(index);
        }
    }
}

impl<D> Default for InfiniteGrid<D> {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}
