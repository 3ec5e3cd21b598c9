//! Multi-chunk undo and redo.
//!
//! An [EditAction] holds the before-state of every chunk one logical edit touched.  Replaying an action swaps each
//! snapshot's bitmap with the chunk's current bitmap, so the displaced bitmaps form the mirror action for the opposite
//! stack without any extra copies.
use std::collections::VecDeque;

use log::*;
use smallvec::SmallVec;

use crate::*;

#[derive(Debug)]
pub struct ChunkSnapshot {
    coord: GridCoord,
    bitmap: Bitmap,
}

impl ChunkSnapshot {
    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

/// Snapshots with unique coordinates, in the order they were captured.
#[derive(Debug, Default)]
pub struct EditAction {
    snapshots: SmallVec<[ChunkSnapshot; 4]>,
}

impl EditAction {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.snapshots.iter().any(|s| s.coord == coord)
    }

    pub fn snapshots(&self) -> &[ChunkSnapshot] {
        &self.snapshots[..]
    }

    /// Bytes of pixel memory owned by this action.
    pub fn retained_bytes(&self) -> usize {
        self.snapshots.iter().map(|s| s.bitmap.byte_len()).sum()
    }
}

/// Apply `action` through the coordinator, returning the action which undoes the replay.
///
/// Either every chunk is restored or nothing is: if some chunk can't be activated, the action is handed back
/// untouched.
fn replay(
    action: EditAction,
    coordinator: &mut ChunkCoordinator,
) -> Result<EditAction, EditAction> {
    let handles = action
        .snapshots
        .iter()
        .map(|s| coordinator.get_or_activate(s.coord))
        .collect::<Option<SmallVec<[SlotHandle; 4]>>>();
    let handles = match handles {
        Some(h) => h,
        None => return Err(action),
    };

    let mut mirror = EditAction::default();
    for (snapshot, handle) in action.snapshots.into_iter().zip(handles) {
        let chunk = coordinator
            .chunk_mut(handle)
            .expect("Nothing can evict between activation and replay");
        let previous = chunk.replace_bitmap(snapshot.bitmap);
        mirror.snapshots.push(ChunkSnapshot {
            coord: snapshot.coord,
            bitmap: previous,
        });
    }

    Ok(mirror)
}

/// The undo and redo stacks plus the action currently being recorded.
pub struct UndoHistory {
    /// Oldest at the front.
    undo: VecDeque<EditAction>,
    redo: Vec<EditAction>,
    recording: Option<EditAction>,
    capacity: usize,
}

impl UndoHistory {
    /// Both stacks hold at most `capacity` actions.
    pub fn new(capacity: usize) -> UndoHistory {
        UndoHistory {
            undo: VecDeque::with_capacity(capacity),
            redo: Vec::new(),
            recording: None,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    fn all_actions(&self) -> impl Iterator<Item = &EditAction> {
        self.undo
            .iter()
            .chain(self.redo.iter())
            .chain(self.recording.iter())
    }

    /// Snapshots held by both stacks and the open action.
    pub fn snapshot_count(&self) -> usize {
        self.all_actions().map(|a| a.len()).sum()
    }

    pub fn retained_bytes(&self) -> usize {
        self.all_actions().map(|a| a.retained_bytes()).sum()
    }

    pub fn begin_action(&mut self) {
        if self.recording.is_some() {
            warn!("Starting an edit while another is still open; closing the old one");
            self.end_action();
        }

        self.recording = Some(EditAction::default());
    }

    /// Record the current state of a chunk which is about to be drawn into.
    ///
    /// Returns whether the chunk is captured in the open action afterwards.  Does nothing without an open action, and
    /// only the first capture of a coordinate within an action counts.
    pub fn capture_chunk(&mut self, coordinator: &mut ChunkCoordinator, coord: GridCoord) -> bool {
        let action = match self.recording.as_mut() {
            Some(a) => a,
            None => return false,
        };

        if action.contains(coord) {
            return true;
        }

        let bitmap = match coordinator
            .get_or_activate(coord)
            .and_then(|h| coordinator.chunk(h))
        {
            Some(c) => c.bitmap().clone(),
            None => {
                warn!("Cannot capture chunk {}: the pool is full", coord);
                return false;
            }
        };

        action.snapshots.push(ChunkSnapshot { coord, bitmap });
        true
    }

    /// Close the open action, committing it if it captured anything.
    ///
    /// Returns whether an action was committed.  Committing clears the redo stack.
    pub fn end_action(&mut self) -> bool {
        let action = match self.recording.take() {
            Some(a) if !a.is_empty() => a,
            _ => return false,
        };

        if self.undo.len() >= self.capacity {
            let oldest = self.undo.pop_front();
            debug!(
                "Undo stack is full; forgetting the oldest edit ({} chunks)",
                oldest.map(|a| a.len()).unwrap_or(0)
            );
        }

        debug!("Committed an edit of {} chunks", action.len());
        self.undo.push_back(action);
        self.redo.clear();
        true
    }

    fn close_before_replay(&mut self) {
        if self.recording.is_some() {
            warn!("Edit still open at undo or redo; closing it");
            self.end_action();
        }
    }

    /// Undo the most recent edit.  Returns whether anything changed.
    pub fn perform_undo(&mut self, coordinator: &mut ChunkCoordinator) -> bool {
        self.close_before_replay();
        let action = match self.undo.pop_back() {
            Some(a) => a,
            None => return false,
        };

        match replay(action, coordinator) {
            Ok(mirror) => {
                if self.redo.len() >= self.capacity {
                    warn!("Redo stack is full; this undo cannot be redone");
                } else {
                    self.redo.push(mirror);
                }
                true
            }
            Err(action) => {
                warn!(
                    "Not enough free chunk slots to undo an edit of {} chunks",
                    action.len()
                );
                self.undo.push_back(action);
                false
            }
        }
    }

    /// Redo the most recently undone edit.  Returns whether anything changed.
    pub fn perform_redo(&mut self, coordinator: &mut ChunkCoordinator) -> bool {
        self.close_before_replay();
        let action = match self.redo.pop() {
            Some(a) => a,
            None => return false,
        };

        match replay(action, coordinator) {
            Ok(mirror) => {
                if self.undo.len() >= self.capacity {
                    self.undo.pop_front();
                }
                self.undo.push_back(mirror);
                true
            }
            Err(action) => {
                warn!(
                    "Not enough free chunk slots to redo an edit of {} chunks",
                    action.len()
                );
                self.redo.push(action);
                false
            }
        }
    }

    /// Forget everything, including any open action.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.recording = None;
    }
}
