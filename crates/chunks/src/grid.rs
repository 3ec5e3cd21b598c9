//! Knows how to go from a continuous canvas position to the chunk containing it and an offset in that chunk.
//!
//! Division floors toward negative infinity, so that chunks left of or above the origin have the same orientation as
//! every other chunk and local offsets are never negative.
use derive_more::Display;

use canvas_geometry::{Aabb, V2};

/// Integer address of one chunk.
#[derive(Copy, Clone, Debug, Default, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display(fmt = "({}, {})", x, y)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> GridCoord {
        GridCoord { x, y }
    }

    /// World position of this chunk's minimum corner.
    pub fn origin(&self, chunk_size: u32) -> V2<f64> {
        V2::new(self.x, self.y) * chunk_size as f64
    }

    /// The region of the plane this chunk covers.
    pub fn world_bounds(&self, chunk_size: u32) -> Aabb<f64> {
        let origin = self.origin(chunk_size);
        let size = chunk_size as f64;
        Aabb::from_points(origin, origin + V2::new(size, size))
            .expect("Chunks have a nonzero size, so their bounds are never degenerate")
    }
}

/// The chunk containing a world position.
///
/// Positions beyond the addressable range saturate to the outermost chunk; NaN maps to 0.
pub fn to_grid(world: V2<f64>, chunk_size: u32) -> GridCoord {
    let size = chunk_size as f64;
    GridCoord::new(
        (world.x / size).floor() as i32,
        (world.y / size).floor() as i32,
    )
}

/// Clamp an offset into `[0, size)`.
///
/// The subtraction in [to_local] can round onto `size` itself for tiny negative positions, e.g. `-1e-20` belongs to
/// chunk -1 but `16 - 1e-20` is `16.0`.
fn clamp_local(offset: f64, size: f64) -> f64 {
    let below_size = f64::from_bits(size.to_bits() - 1);
    offset.clamp(0.0, below_size)
}

/// Offset of a world position relative to a chunk's origin.
///
/// For finite positions, `to_local(p, to_grid(p, s), s)` is always within `[0, s)` on both axes.
pub fn to_local(world: V2<f64>, coord: GridCoord, chunk_size: u32) -> V2<f64> {
    let origin = coord.origin(chunk_size);
    let size = chunk_size as f64;
    V2::new(
        clamp_local(world.x - origin.x, size),
        clamp_local(world.y - origin.y, size),
    )
}

/// An inclusive rectangle of grid coordinates.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GridRect {
    min: GridCoord,
    max: GridCoord,
}

impl GridRect {
    /// Build a rectangle from two corners given in any order.
    pub fn new(a: GridCoord, b: GridCoord) -> GridRect {
        GridRect {
            min: GridCoord::new(a.x.min(b.x), a.y.min(b.y)),
            max: GridCoord::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// The chunks covering a world-space rectangle, grown by `padding` chunks on every side.
    pub fn covering(world: &Aabb<f64>, chunk_size: u32, padding: u32) -> GridRect {
        let pad = padding.min(i32::MAX as u32) as i32;
        let lo = to_grid(world.get_p1(), chunk_size);
        let hi = to_grid(world.get_p2(), chunk_size);
        GridRect::new(
            GridCoord::new(lo.x.saturating_sub(pad), lo.y.saturating_sub(pad)),
            GridCoord::new(hi.x.saturating_add(pad), hi.y.saturating_add(pad)),
        )
    }

    /// Exactly the chunks a world-space rectangle overlaps with nonzero area.
    ///
    /// Unlike [GridRect::covering], a far edge lying on a chunk boundary doesn't pull in the chunk beyond it.
    pub fn touching(world: &Aabb<f64>, chunk_size: u32) -> GridRect {
        let size = chunk_size as f64;
        let lo = to_grid(world.get_p1(), chunk_size);
        let p2 = world.get_p2();
        let hi = GridCoord::new(
            ((p2.x / size).ceil() as i32).saturating_sub(1),
            ((p2.y / size).ceil() as i32).saturating_sub(1),
        );
        GridRect::new(lo, hi)
    }

    pub fn min(&self) -> GridCoord {
        self.min
    }

    pub fn max(&self) -> GridCoord {
        self.max
    }

    pub fn width(&self) -> u64 {
        (self.max.x as i64 - self.min.x as i64 + 1) as u64
    }

    pub fn height(&self) -> u64 {
        (self.max.y as i64 - self.min.y as i64 + 1) as u64
    }

    /// Number of chunks in the rectangle.  Saturates rather than overflowing for absurd rectangles.
    pub fn area(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= self.min.x && coord.x <= self.max.x && coord.y >= self.min.y && coord.y <= self.max.y
    }

    /// Visit every coordinate by rows: `(min.x, min.y), (min.x + 1, min.y), ... (min.x, min.y + 1), ...`
    pub fn iter(&self) -> impl Iterator<Item = GridCoord> {
        itertools::iproduct!(self.min.y..=self.max.y, self.min.x..=self.max.x)
            .map(|(y, x)| GridCoord::new(x, y))
    }
}
