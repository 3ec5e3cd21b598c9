//! Policy layer over the pool and the cache.
//!
//! The coordinator is the only thing which moves bitmaps between the two.  A chunk is in at most one of them: reviving
//! takes the bitmap out of the cache, and demoting takes it out of the pool.
use log::*;
use smallvec::SmallVec;

use crate::*;

/// What one call to [ChunkCoordinator::reconcile] did.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ReconcileReport {
    /// Chunks removed from the pool because they left the viewport.
    pub evicted: usize,

    /// Evicted chunks which were modified and made it into the cache.
    pub cached: usize,

    /// Evicted chunks which were modified but were lost because the cache was full.
    pub dropped: usize,

    /// Chunks newly created with the background colour.
    pub activated: usize,

    /// Chunks brought back from the cache.
    pub revived: usize,

    /// Coordinates in range which could not be activated because the pool was full.
    pub skipped: u64,
}

enum Demotion {
    Cached,
    Dropped,
    Discarded,
}

pub struct ChunkCoordinator {
    pool: ChunkPool,
    cache: ChunkCache,
    chunk_size: u32,
    background: Rgba,
    load_padding: u32,
}

impl ChunkCoordinator {
    /// Build a coordinator.  The configuration is assumed to be valid.
    pub fn new(config: &CanvasConfig) -> ChunkCoordinator {
        debug_assert!(config.validate().is_ok());
        ChunkCoordinator {
            pool: ChunkPool::new(config.pool_capacity()),
            cache: ChunkCache::new(config.max_cached_chunks),
            chunk_size: config.chunk_size,
            background: config.background,
            load_padding: config.load_padding,
        }
    }

    pub fn pool(&self) -> &ChunkPool {
        &self.pool
    }

    pub fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    /// World position of a chunk's minimum corner, for placing it on screen.
    pub fn chunk_origin(&self, coord: GridCoord) -> V2<f64> {
        coord.origin(self.chunk_size)
    }

    /// Resolve a coordinate to an active chunk, creating or reviving it as needed.
    ///
    /// Returns `None` only when the chunk isn't active and the pool has no free slot.  Calling this repeatedly for
    /// the same coordinate returns the same handle until the chunk is evicted.
    pub fn get_or_activate(&mut self, coord: GridCoord) -> Option<SlotHandle> {
        if let Some(h) = self.pool.find_active(coord) {
            return Some(h);
        }

        if self.pool.is_full() {
            return None;
        }

        let chunk = match self.cache.take(coord) {
            Some(cached) => {
                debug!("Reviving chunk {} from the cache", coord);
                ActiveChunk::new(coord, cached.into_bitmap(), true)
            }
            None => {
                debug!("Activating blank chunk {}", coord);
                ActiveChunk::new(
                    coord,
                    Bitmap::new_filled(self.chunk_size, self.background),
                    false,
                )
            }
        };

        let handle = self
            .pool
            .insert(chunk)
            .expect("Checked for a free slot above");
        debug_assert!(self.active_and_cached_disjoint());
        Some(handle)
    }

    pub fn chunk(&self, handle: SlotHandle) -> Option<&ActiveChunk> {
        self.pool.get(handle)
    }

    pub fn chunk_mut(&mut self, handle: SlotHandle) -> Option<&mut ActiveChunk> {
        self.pool.get_mut(handle)
    }

    /// Move a chunk out of the pool, into the cache if it has edits worth keeping.
    fn demote(&mut self, handle: SlotHandle) -> Option<Demotion> {
        let (coord, bitmap, modified) = self.pool.evict(handle)?.into_parts();
        if !modified {
            debug!("Releasing unmodified chunk {}", coord);
            return Some(Demotion::Discarded);
        }

        match self.cache.insert(CachedChunk::new(coord, bitmap)) {
            Ok(()) => {
                debug!("Demoted chunk {} to the cache", coord);
                Some(Demotion::Cached)
            }
            Err(lost) => {
                warn!("Edits to chunk {} are lost", lost.coord());
                Some(Demotion::Dropped)
            }
        }
    }

    /// Bring the pool in line with a viewport.
    ///
    /// Every active chunk outside the viewport's chunks plus the load padding is evicted first, then every
    /// coordinate inside is activated until the pool runs out of slots.
    pub fn reconcile(&mut self, viewport: &Aabb<f64>) -> ReconcileReport {
        let rect = GridRect::covering(viewport, self.chunk_size, self.load_padding);
        let mut report = ReconcileReport::default();

        let outside = self
            .pool
            .iter()
            .filter(|(_, c)| !rect.contains(c.coord()))
            .map(|(h, _)| h)
            .collect::<SmallVec<[SlotHandle; 32]>>();
        for h in outside {
            report.evicted += 1;
            match self.demote(h) {
                Some(Demotion::Cached) => report.cached += 1,
                Some(Demotion::Dropped) => report.dropped += 1,
                Some(Demotion::Discarded) | None => {}
            }
        }

        for coord in rect.iter() {
            if self.pool.contains(coord) {
                continue;
            }

            if self.pool.is_full() {
                break;
            }

            let reviving = self.cache.contains(coord);
            if self.get_or_activate(coord).is_some() {
                if reviving {
                    report.revived += 1;
                } else {
                    report.activated += 1;
                }
            }
        }

        // After eviction everything left in the pool is inside the rectangle.
        report.skipped = rect.area().saturating_sub(self.pool.len() as u64);
        if report.skipped > 0 {
            warn!(
                "Pool is full: {} chunks in view of {} to {} were not activated",
                report.skipped,
                rect.min(),
                rect.max()
            );
        }

        if report.evicted > 0 || report.activated > 0 || report.revived > 0 {
            debug!("Reconciled viewport: {:?}", report);
        }

        debug_assert!(self.active_and_cached_disjoint());
        report
    }

    /// Read a pixel without activating anything: from the pool, else the cache, else the background.
    ///
    /// Returns `None` if the local position is outside a chunk.
    pub fn read_pixel(&self, coord: GridCoord, x: u32, y: u32) -> Option<Rgba> {
        if let Some(c) = self.pool.find_active(coord).and_then(|h| self.pool.get(h)) {
            return c.bitmap().read(x, y);
        }

        if let Some(b) = self.cache.peek(coord) {
            return b.read(x, y);
        }

        (x < self.chunk_size && y < self.chunk_size).then(|| self.background)
    }

    /// Whether no coordinate is both active and cached.
    pub fn active_and_cached_disjoint(&self) -> bool {
        self.pool
            .iter()
            .all(|(_, c)| !self.cache.contains(c.coord()))
    }

    /// Put a chunk straight into the cache.  Used by loading, after [ChunkCoordinator::clear].
    pub(crate) fn install_cached(&mut self, chunk: CachedChunk) -> Result<(), CachedChunk> {
        debug_assert!(!self.pool.contains(chunk.coord()));
        self.cache.insert(chunk)
    }

    /// Release every active and cached chunk.
    pub(crate) fn clear(&mut self) {
        self.pool.clear();
        self.cache.clear();
    }
}
