use std::io::{Result as IoResult, Write};

use log::*;

use crate::header::*;
use crate::record::*;

/// Writes a header and then chunk records to any [Write].
///
/// Wrap files in a [std::io::BufWriter]; this type writes each record with a couple of calls and does not buffer.
pub struct RecordWriter<W: Write> {
    inner: W,
    chunk_size: u32,
    scratch: Vec<u8>,
    records_written: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Create a writer, writing the header immediately.
    pub fn new(mut inner: W, chunk_size: u32) -> IoResult<RecordWriter<W>> {
        let mut scratch = Vec::with_capacity(HEADER_SIZE);
        Header::CURRENT.encode(&mut scratch);
        inner.write_all(&scratch[..])?;
        Ok(RecordWriter {
            inner,
            chunk_size,
            scratch,
            records_written: 0,
        })
    }

    /// Write one chunk.  `pixels` must be exactly [pixel_bytes] long for this writer's chunk size.
    pub fn write_record(&mut self, x: i32, y: i32, pixels: &[u8]) -> IoResult<()> {
        let expected = pixel_bytes(self.chunk_size);
        if pixels.len() != expected {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "chunk ({}, {}) has {} bytes of pixels but the chunk size needs {}",
                    x,
                    y,
                    pixels.len(),
                    expected
                ),
            ));
        }

        self.scratch.clear();
        encode_coords(&mut self.scratch, x, y);
        self.inner.write_all(&self.scratch[..])?;
        self.inner.write_all(pixels)?;
        self.records_written += 1;
        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> IoResult<W> {
        self.inner.flush()?;
        debug!("Finished canvas file with {} records", self.records_written);
        Ok(self.inner)
    }
}
