//! Saving and loading a canvas through `canvas_format`.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};

use camino::Utf8Path;
use canvas_format::{ReadOutcome, RecordReader, RecordWriter};
use log::*;

use crate::*;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct LoadReport {
    /// Chunks now in the cache.
    pub loaded: usize,

    /// Records for a coordinate seen earlier in the file.  The later record wins.
    pub duplicates: usize,

    /// The file ended partway through a record.
    pub truncated: bool,

    /// The file held more chunks than the cache can, and the rest were ignored.
    pub hit_capacity: bool,
}

impl Canvas {
    /// Write every modified active chunk and every cached chunk.  Returns the number of records written.
    pub fn save_to<W: Write>(&self, dest: W) -> Result<usize> {
        let coordinator = self.coordinator();
        let mut writer = RecordWriter::new(dest, coordinator.chunk_size())?;

        let active = coordinator
            .pool()
            .iter()
            .map(|(_, c)| c)
            .filter(|c| c.is_modified())
            .map(|c| (c.coord(), c.bitmap()));
        for (coord, bitmap) in active.chain(coordinator.cache().iter()) {
            writer.write_record(coord.x, coord.y, bitmap.as_bytes())?;
        }

        let written = writer.records_written();
        writer.finish()?;
        Ok(written)
    }

    pub fn save(&self, path: &Utf8Path) -> Result<usize> {
        let written = self.save_to(BufWriter::new(File::create(path)?))?;
        info!("Saved {} chunks to {}", written, path);
        Ok(written)
    }

    /// Replace the canvas with the contents of a file.
    ///
    /// The whole file is read before anything changes, so on error the canvas is exactly as it was.  On success every
    /// active and cached chunk and all undo history is discarded, and the file's chunks land in the cache, to be
    /// revived by the next reconcile.
    pub fn load_from<R: Read>(&mut self, source: R) -> Result<LoadReport> {
        let chunk_size = self.config().chunk_size;
        let capacity = self.config().max_cached_chunks;
        let mut reader = RecordReader::open(source, chunk_size)?;
        let mut staged: HashMap<GridCoord, Bitmap> = HashMap::new();
        let mut report = LoadReport::default();

        loop {
            let record = match reader.next_record()? {
                ReadOutcome::Record(r) => r,
                ReadOutcome::End => break,
                ReadOutcome::Truncated(_) => {
                    report.truncated = true;
                    break;
                }
            };

            let coord = GridCoord::new(record.x, record.y);
            let bitmap = Bitmap::from_bytes(chunk_size, record.pixels)?;
            if let Some(slot) = staged.get_mut(&coord) {
                report.duplicates += 1;
                *slot = bitmap;
                continue;
            }

            if staged.len() >= capacity {
                warn!(
                    "Canvas file has more chunks than the cache holds ({}); ignoring the rest",
                    capacity
                );
                report.hit_capacity = true;
                break;
            }

            staged.insert(coord, bitmap);
        }

        report.loaded = staged.len();
        let (coordinator, history) = self.parts_mut();
        coordinator.clear();
        history.clear();
        for (coord, bitmap) in staged {
            let installed = coordinator
                .install_cached(CachedChunk::new(coord, bitmap))
                .is_ok();
            debug_assert!(installed, "Staging never exceeds the cache's capacity");
        }

        Ok(report)
    }

    pub fn load(&mut self, path: &Utf8Path) -> Result<LoadReport> {
        let report = self.load_from(BufReader::new(File::open(path)?))?;
        info!("Loaded {} chunks from {}", report.loaded, path);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use canvas_format::{Header, MAGIC};
    use pretty_assertions::assert_eq;

    const SIZE: u32 = 2;

    fn canvas(max_cached_chunks: usize) -> Canvas {
        Canvas::new(CanvasConfig {
            chunk_size: SIZE,
            pool_radius: 1,
            load_padding: 0,
            max_cached_chunks,
            max_undo_actions: 4,
            background: Rgba::WHITE,
        })
        .unwrap()
    }

    fn file_of(records: &[(i32, i32, Rgba)]) -> Vec<u8> {
        let mut writer = RecordWriter::new(vec![], SIZE).unwrap();
        for (x, y, colour) in records {
            let bitmap = Bitmap::new_filled(SIZE, *colour);
            writer.write_record(*x, *y, bitmap.as_bytes()).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_only_modified_chunks_saved() {
        let mut canvas = canvas(4);
        canvas.activate(GridCoord::new(0, 0));
        canvas
            .surface_at(GridCoord::new(1, 1))
            .unwrap()
            .bitmap_mut()
            .fill(Rgba::RED);

        let mut data = vec![];
        assert_eq!(canvas.save_to(&mut data).unwrap(), 1);
        assert_eq!(data.len(), canvas_format::HEADER_SIZE + canvas_format::record_size(SIZE));
    }

    #[test]
    fn test_duplicates_and_capacity() {
        let data = file_of(&[
            (0, 0, Rgba::RED),
            (1, 0, Rgba::RED),
            (0, 0, Rgba::BLACK),
            (2, 0, Rgba::RED),
            (3, 0, Rgba::RED),
        ]);
        let mut canvas = canvas(2);
        let report = canvas.load_from(&data[..]).unwrap();
        assert_eq!(
            report,
            LoadReport {
                loaded: 2,
                duplicates: 1,
                truncated: false,
                hit_capacity: true,
            }
        );
        assert_eq!(canvas.sample(V2::new(0.0, 0.0)), Rgba::BLACK);
        assert_eq!(canvas.sample(V2::new(2.0, 0.0)), Rgba::RED);
        assert_eq!(canvas.sample(V2::new(4.0, 0.0)), Rgba::WHITE);
    }

    #[test]
    fn test_truncated_file_keeps_complete_records() {
        let mut data = file_of(&[(0, 0, Rgba::RED), (5, 5, Rgba::RED)]);
        data.truncate(data.len() - 3);
        let mut canvas = canvas(4);
        let report = canvas.load_from(&data[..]).unwrap();
        assert_eq!(report.loaded, 1);
        assert!(report.truncated);
        assert!(canvas.coordinator().cache().contains(GridCoord::new(0, 0)));
    }

    #[test]
    fn test_load_discards_history_and_pool() {
        let mut canvas = canvas(4);
        canvas.begin_action();
        canvas.capture_chunk(GridCoord::new(7, 7));
        canvas.end_action();
        canvas.begin_action();

        let data = file_of(&[(1, 1, Rgba::BLACK)]);
        canvas.load_from(&data[..]).unwrap();
        let stats = canvas.stats();
        assert_eq!(stats.active_chunks, 0);
        assert_eq!(stats.cached_chunks, 1);
        assert_eq!(stats.undo_depth, 0);
        assert!(!canvas.history().is_recording());
    }

    #[test]
    fn test_bad_version_rejected() {
        let mut data = vec![];
        Header {
            magic: MAGIC,
            version: 2,
        }
        .encode(&mut data);
        let mut canvas = canvas(4);
        canvas.activate(GridCoord::new(0, 0));
        assert!(matches!(
            canvas.load_from(&data[..]),
            Err(Error::Format(canvas_format::FormatError::UnsupportedVersion(2)))
        ));
        assert_eq!(canvas.stats().active_chunks, 1);
    }
}
