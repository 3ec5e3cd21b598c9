//! The owned context which callers hold: one coordinator, one undo history, one configuration.
use log::*;

use crate::*;

/// Resource counts, mostly for tests and debug overlays.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CanvasStats {
    pub active_chunks: usize,
    pub modified_chunks: usize,
    pub cached_chunks: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub snapshots: usize,
    pub snapshot_bytes: usize,
}

/// Mutable access to one active chunk, for drawing.
///
/// Handing one out flags the chunk as modified.
pub struct DrawSurface<'a> {
    chunk: &'a mut ActiveChunk,
    chunk_size: u32,
}

impl<'a> DrawSurface<'a> {
    pub fn coord(&self) -> GridCoord {
        self.chunk.coord()
    }

    /// Offset of a world position relative to this chunk, clamped into the chunk.
    pub fn to_local(&self, world: V2<f64>) -> V2<f64> {
        to_local(world, self.chunk.coord(), self.chunk_size)
    }

    pub fn bitmap(&self) -> &Bitmap {
        self.chunk.bitmap()
    }

    pub fn bitmap_mut(&mut self) -> &mut Bitmap {
        self.chunk.bitmap_mut()
    }

    /// Set the pixel under a world position.  Returns false if the position belongs to another chunk.
    pub fn write_world(&mut self, world: V2<f64>, colour: Rgba) -> bool {
        if to_grid(world, self.chunk_size) != self.chunk.coord() {
            return false;
        }

        let local = self.to_local(world);
        self.chunk
            .bitmap_mut()
            .write(local.x as u32, local.y as u32, colour)
            .is_some()
    }
}

pub struct Canvas {
    config: CanvasConfig,
    coordinator: ChunkCoordinator,
    history: UndoHistory,
}

impl Canvas {
    pub fn new(config: CanvasConfig) -> Result<Canvas> {
        config.validate()?;
        info!(
            "Creating canvas: chunk size {}, {} pool slots, {} cache slots, {} undo levels",
            config.chunk_size,
            config.pool_capacity(),
            config.max_cached_chunks,
            config.max_undo_actions
        );

        Ok(Canvas {
            coordinator: ChunkCoordinator::new(&config),
            history: UndoHistory::new(config.max_undo_actions),
            config,
        })
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &ChunkCoordinator {
        &self.coordinator
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut ChunkCoordinator, &mut UndoHistory) {
        (&mut self.coordinator, &mut self.history)
    }

    /// See [ChunkCoordinator::get_or_activate].
    pub fn activate(&mut self, coord: GridCoord) -> Option<SlotHandle> {
        self.coordinator.get_or_activate(coord)
    }

    /// Run once per frame with the current viewport.
    pub fn reconcile(&mut self, viewport: &Aabb<f64>) -> ReconcileReport {
        self.coordinator.reconcile(viewport)
    }

    /// Get a surface for the chunk under a world position.
    ///
    /// Returns `None` and logs a warning when the pool is full; the draw should be skipped.
    pub fn draw_surface(&mut self, world: V2<f64>) -> Option<DrawSurface<'_>> {
        let coord = to_grid(world, self.config.chunk_size);
        self.surface_at(coord)
    }

    pub fn surface_at(&mut self, coord: GridCoord) -> Option<DrawSurface<'_>> {
        let chunk_size = self.config.chunk_size;
        let handle = match self.coordinator.get_or_activate(coord) {
            Some(h) => h,
            None => {
                warn!("Chunk pool is full; skipping draw into chunk {}", coord);
                return None;
            }
        };

        let chunk = self.coordinator.chunk_mut(handle)?;
        chunk.mark_modified();
        Some(DrawSurface { chunk, chunk_size })
    }

    pub fn begin_action(&mut self) {
        self.history.begin_action();
    }

    /// Call before drawing into a chunk while an action is open.
    pub fn capture_chunk(&mut self, coord: GridCoord) -> bool {
        self.history.capture_chunk(&mut self.coordinator, coord)
    }

    pub fn end_action(&mut self) -> bool {
        self.history.end_action()
    }

    pub fn undo(&mut self) -> bool {
        self.history.perform_undo(&mut self.coordinator)
    }

    pub fn redo(&mut self) -> bool {
        self.history.perform_redo(&mut self.coordinator)
    }

    /// Fill a world-space rectangle, capturing every chunk it touches first if an action is open.
    ///
    /// A pixel is filled if the rectangle overlaps it at all.  Returns how many chunks were drawn into.
    ///
    /// Chunks already active are always drawn.  Others are activated only while the pool has room; the rest are
    /// skipped with one warning, so the work done is bounded by the pool's capacity rather than the rectangle's area.
    pub fn fill_world_rect(&mut self, rect: &Aabb<f64>, colour: Rgba) -> usize {
        let touched = GridRect::touching(rect, self.config.chunk_size);
        let resident = self
            .coordinator
            .pool()
            .iter()
            .map(|(_, c)| c.coord())
            .filter(|c| touched.contains(*c))
            .collect::<Vec<_>>();

        let mut drawn = 0;
        for coord in resident {
            if self.fill_chunk(coord, rect, colour) {
                drawn += 1;
            }
        }

        for coord in touched.iter() {
            let pool = self.coordinator.pool();
            if pool.is_full() {
                break;
            }
            if pool.contains(coord) {
                continue;
            }
            if self.fill_chunk(coord, rect, colour) {
                drawn += 1;
            }
        }

        let skipped = touched.area().saturating_sub(drawn as u64);
        if skipped > 0 {
            warn!(
                "Chunk pool of {} is full; skipped {} chunks of a rectangle fill",
                self.coordinator.pool().capacity(),
                skipped
            );
        }

        drawn
    }

    /// Capture one chunk, then fill the part of it under `rect`.  False if nothing was drawn.
    fn fill_chunk(&mut self, coord: GridCoord, rect: &Aabb<f64>, colour: Rgba) -> bool {
        let overlap = match coord
            .world_bounds(self.config.chunk_size)
            .intersection(rect)
        {
            Some(o) => o,
            None => return false,
        };
        let origin = self.coordinator.chunk_origin(coord);

        self.capture_chunk(coord);
        let mut surface = match self.surface_at(coord) {
            Some(s) => s,
            None => return false,
        };

        let lo = (overlap.get_p1() - origin).floor();
        let hi = overlap.get_p2() - origin;
        surface.bitmap_mut().fill_rect(
            lo.x as u32,
            lo.y as u32,
            hi.x.ceil() as u32,
            hi.y.ceil() as u32,
            colour,
        );
        true
    }

    /// The colour under a world position, without activating anything.
    pub fn sample(&self, world: V2<f64>) -> Rgba {
        let coord = to_grid(world, self.config.chunk_size);
        let local = to_local(world, coord, self.config.chunk_size);
        self.coordinator
            .read_pixel(coord, local.x as u32, local.y as u32)
            .unwrap_or_else(|| self.coordinator.background())
    }

    /// Every active chunk and its pixels, in no particular order.
    pub fn active_chunks(&self) -> impl Iterator<Item = (GridCoord, &Bitmap)> {
        self.coordinator
            .pool()
            .iter()
            .map(|(_, c)| (c.coord(), c.bitmap()))
    }

    pub fn stats(&self) -> CanvasStats {
        let pool = self.coordinator.pool();
        CanvasStats {
            active_chunks: pool.len(),
            modified_chunks: pool.iter().filter(|(_, c)| c.is_modified()).count(),
            cached_chunks: self.coordinator.cache().len(),
            undo_depth: self.history.undo_depth(),
            redo_depth: self.history.redo_depth(),
            snapshots: self.history.snapshot_count(),
            snapshot_bytes: self.history.retained_bytes(),
        }
    }

    /// Release every chunk and forget all history.
    pub fn clear(&mut self) {
        self.coordinator.clear();
        self.history.clear();
        debug!("Cleared canvas");
    }
}
