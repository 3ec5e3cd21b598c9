//! Host-memory holding area for modified chunks evicted from the pool.
use std::collections::HashMap;

use log::*;

use crate::*;

/// An evicted chunk's bitmap, owned by whoever holds this value.
#[derive(Debug)]
pub struct CachedChunk {
    coord: GridCoord,
    bitmap: Bitmap,
}

impl CachedChunk {
    pub fn new(coord: GridCoord, bitmap: Bitmap) -> CachedChunk {
        CachedChunk { coord, bitmap }
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }
}

/// A bounded, unordered store of cached chunks.
///
/// There is no replacement policy.  Once full, new entries are refused and existing entries are kept.
pub struct ChunkCache {
    entries: HashMap<GridCoord, Bitmap>,
    capacity: usize,
}

impl ChunkCache {
    pub fn new(capacity: usize) -> ChunkCache {
        ChunkCache {
            entries: HashMap::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.entries.contains_key(&coord)
    }

    /// Remove a chunk from the cache, handing ownership to the caller.
    pub fn take(&mut self, coord: GridCoord) -> Option<CachedChunk> {
        self.entries
            .remove(&coord)
            .map(|bitmap| CachedChunk::new(coord, bitmap))
    }

    /// Look at a cached chunk without reviving it.
    pub fn peek(&self, coord: GridCoord) -> Option<&Bitmap> {
        self.entries.get(&coord)
    }

    /// Store a chunk.
    ///
    /// If the cache is full the chunk is handed back and a warning is logged; the caller decides whether to drop it.
    /// Replacing an entry for a coordinate already present never fails.
    pub fn insert(&mut self, chunk: CachedChunk) -> Result<(), CachedChunk> {
        if self.is_full() && !self.entries.contains_key(&chunk.coord) {
            warn!(
                "Chunk cache is full ({} entries); cannot cache chunk {}",
                self.capacity, chunk.coord
            );
            return Err(chunk);
        }

        self.entries.insert(chunk.coord, chunk.bitmap);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &Bitmap)> {
        self.entries.iter().map(|(c, b)| (*c, b))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
