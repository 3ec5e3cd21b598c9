//! The fixed-capacity set of chunks resident on the rendering device.
//!
//! Chunks live in a [Slab] whose length never exceeds the pool's capacity, and a map from [GridCoord] to slot gives
//! O(1) lookup.  At most one active chunk may exist per coordinate.
use std::collections::HashMap;

use slab::Slab;

use crate::*;

/// Stable handle to an active chunk.
///
/// A handle stays valid until its chunk is evicted.  Slots are reused after that, so a handle also remembers its
/// coordinate, and lookups with a handle whose slot now holds a different chunk fail instead of returning the wrong
/// chunk.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct SlotHandle {
    slot: usize,
    coord: GridCoord,
}

impl SlotHandle {
    pub fn coord(&self) -> GridCoord {
        self.coord
    }
}

#[derive(Debug)]
pub struct ActiveChunk {
    coord: GridCoord,
    bitmap: Bitmap,
    /// Set the instant anything draws into the chunk, and for chunks revived from the cache.
    modified: bool,
}

impl ActiveChunk {
    pub(crate) fn new(coord: GridCoord, bitmap: Bitmap, modified: bool) -> ActiveChunk {
        ActiveChunk {
            coord,
            bitmap,
            modified,
        }
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Get the bitmap for drawing, which flags the chunk as modified.
    pub fn bitmap_mut(&mut self) -> &mut Bitmap {
        self.modified = true;
        &mut self.bitmap
    }

    pub(crate) fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// Swap in a whole new bitmap, returning the old one.
    pub(crate) fn replace_bitmap(&mut self, bitmap: Bitmap) -> Bitmap {
        debug_assert_eq!(bitmap.size(), self.bitmap.size());
        self.modified = true;
        std::mem::replace(&mut self.bitmap, bitmap)
    }

    pub(crate) fn into_parts(self) -> (GridCoord, Bitmap, bool) {
        (self.coord, self.bitmap, self.modified)
    }
}

pub struct ChunkPool {
    slots: Slab<ActiveChunk>,
    index: HashMap<GridCoord, SlotHandle>,
    capacity: usize,
}

impl ChunkPool {
    pub fn new(capacity: usize) -> ChunkPool {
        ChunkPool {
            slots: Slab::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn free_slots(&self) -> usize {
        self.capacity - self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn find_active(&self, coord: GridCoord) -> Option<SlotHandle> {
        self.index.get(&coord).copied()
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.index.contains_key(&coord)
    }

    /// Place a chunk into a free slot.
    ///
    /// A full pool is a hard limit rather than an error: the chunk is handed back so that the caller can decide what
    /// to do with it.
    pub(crate) fn insert(&mut self, chunk: ActiveChunk) -> Result<SlotHandle, ActiveChunk> {
        if self.is_full() {
            return Err(chunk);
        }

        let coord = chunk.coord;
        debug_assert!(
            !self.index.contains_key(&coord),
            "Two active chunks claim {}",
            coord
        );
        let handle = SlotHandle {
            slot: self.slots.insert(chunk),
            coord,
        };
        self.index.insert(coord, handle);
        Ok(handle)
    }

    pub fn get(&self, handle: SlotHandle) -> Option<&ActiveChunk> {
        self.slots
            .get(handle.slot)
            .filter(|c| c.coord == handle.coord)
    }

    pub fn get_mut(&mut self, handle: SlotHandle) -> Option<&mut ActiveChunk> {
        self.slots
            .get_mut(handle.slot)
            .filter(|c| c.coord == handle.coord)
    }

    /// Remove a chunk from the pool, handing its ownership to the caller.
    pub(crate) fn evict(&mut self, handle: SlotHandle) -> Option<ActiveChunk> {
        self.get(handle)?;
        self.index.remove(&handle.coord);
        Some(self.slots.remove(handle.slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotHandle, &ActiveChunk)> {
        self.slots.iter().map(|(slot, chunk)| {
            (
                SlotHandle {
                    slot,
                    coord: chunk.coord,
                },
                chunk,
            )
        })
    }

    /// Release every chunk.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(x: i32, y: i32) -> ActiveChunk {
        ActiveChunk::new(GridCoord::new(x, y), Bitmap::new_filled(2, Rgba::PAPER), false)
    }

    #[test]
    fn test_capacity_is_hard() {
        let mut pool = ChunkPool::new(2);
        pool.insert(blank(0, 0)).expect("Room for one");
        pool.insert(blank(1, 0)).expect("Room for two");
        assert!(pool.is_full());
        let rejected = pool.insert(blank(2, 0)).expect_err("Pool is full");
        assert_eq!(rejected.coord(), GridCoord::new(2, 0));
        assert_eq!(pool.len(), 2);
        assert!(!pool.contains(GridCoord::new(2, 0)));
    }

    #[test]
    fn test_handles_are_stable() {
        let mut pool = ChunkPool::new(4);
        let a = pool.insert(blank(0, 0)).unwrap();
        let b = pool.insert(blank(5, -5)).unwrap();
        assert_eq!(pool.find_active(GridCoord::new(0, 0)), Some(a));
        assert_eq!(pool.find_active(GridCoord::new(5, -5)), Some(b));

        pool.get_mut(a).unwrap().bitmap_mut().fill(Rgba::RED);
        assert!(pool.get(a).unwrap().is_modified());
        assert!(!pool.get(b).unwrap().is_modified());
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let mut pool = ChunkPool::new(1);
        let old = pool.insert(blank(0, 0)).unwrap();
        let evicted = pool.evict(old).expect("Should evict");
        assert_eq!(evicted.coord(), GridCoord::new(0, 0));
        assert_eq!(pool.free_slots(), 1);

        let new = pool.insert(blank(9, 9)).unwrap();
        assert!(pool.get(old).is_none(), "The reused slot belongs to another chunk");
        assert!(pool.evict(old).is_none());
        assert!(pool.get(new).is_some());
    }
}
