//! An unbounded raster canvas backed by a bounded set of resident chunks.
//!
//! The plane is cut into square chunks addressed by [GridCoord].  Only the chunks near the viewport live in the
//! [ChunkPool], a fixed-capacity set standing in for rendering-device surfaces.  Modified chunks which leave the
//! viewport are demoted to the [ChunkCache] in host memory and revived when touched again.  The [ChunkCoordinator]
//! owns both and runs the per-frame [ChunkCoordinator::reconcile].
//!
//! On top of that, [UndoHistory] records the before-state of every chunk touched by one logical edit and replays it
//! through the coordinator, and [Canvas] packages everything as a single owned context which can also be saved to and
//! loaded from the format in `canvas_format`.
//!
//! Everything here is single threaded and synchronous: each call runs to completion before the next.
mod bitmap;
mod cache;
mod canvas;
mod config;
mod coordinator;
mod errors;
mod grid;
mod persistence;
mod pool;
#[cfg(test)]
mod tests;
mod undo;

pub use bitmap::*;
pub use cache::*;
pub use canvas::*;
pub use config::*;
pub use coordinator::*;
pub use errors::*;
pub use grid::*;
pub use persistence::*;
pub use pool::*;
pub use undo::*;

pub use canvas_geometry::{Aabb, V2};
