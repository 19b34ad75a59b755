//! Spatial object index over the unbounded Infigrid coordinate space.
//!
//! Objects are axis-aligned boxes between two [`GridPoint`]s. The
//! [`InfiniteGrid`] files each object under the block holding its centre
//! and cross-references every other block it touches, so a consumer that
//! enumerates blocks (a viewport, a physics broad phase) can collect the
//! objects relevant to any region one block at a time.

pub mod block;
pub mod config;
pub mod grid;
pub mod object;

pub use block::{block_objects, Block};
pub use config::GridConfig;
pub use grid::InfiniteGrid;
pub use object::{
    blocks_in_cube, GridObject, GridObjectBuilder, IdSource, ObjectId, RandomIds, SequentialIds,
};

pub use infigrid_core::{BlockAddress, BlockIndex, Error, GridPoint, LocalPoint, Result};
