use std::io::{ErrorKind, Read};

use log::*;

use crate::errors::*;
use crate::header::*;
use crate::record::*;

/// Reads chunk records from any [Read].
///
/// To use, call [RecordReader::open], which validates the header before anything else is read, then call
/// [RecordReader::next_record] until it returns something other than a record.
pub struct RecordReader<R: Read> {
    inner: R,
    chunk_size: u32,
    buffer: Vec<u8>,
    finished: bool,
}

#[derive(Debug)]
pub enum ReadOutcome {
    Record(ChunkRecord),

    /// The file ended cleanly on a record boundary.
    End,

    /// The file ended partway through a record.  Contains the number of bytes of the partial record, which were
    /// discarded.
    Truncated(usize),
}

/// Read until `buf` is full or the reader is exhausted, returning how many bytes were read.
fn read_fully(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

impl<R: Read> RecordReader<R> {
    /// Read and validate the header.
    pub fn open(mut inner: R, chunk_size: u32) -> Result<RecordReader<R>> {
        let mut header_bytes = [0u8; HEADER_SIZE];
        let got = read_fully(&mut inner, &mut header_bytes[..])?;
        let header = Header::decode(&mut &header_bytes[..got])?;
        header.validate()?;

        Ok(RecordReader {
            inner,
            chunk_size,
            buffer: vec![0u8; record_size(chunk_size)],
            finished: false,
        })
    }

    /// Try to read the next record.
    ///
    /// After this returns [ReadOutcome::End] or [ReadOutcome::Truncated], all further calls return
    /// [ReadOutcome::End].
    pub fn next_record(&mut self) -> Result<ReadOutcome> {
        if self.finished {
            return Ok(ReadOutcome::End);
        }

        let got = read_fully(&mut self.inner, &mut self.buffer[..])?;
        if got == self.buffer.len() {
            let record = ChunkRecord::decode(&mut &self.buffer[..], self.chunk_size);
            return Ok(ReadOutcome::Record(record));
        }

        self.finished = true;
        if got == 0 {
            Ok(ReadOutcome::End)
        } else {
            warn!(
                "Canvas file ends {} bytes into a {} byte record; ignoring the partial record",
                got,
                self.buffer.len()
            );
            Ok(ReadOutcome::Truncated(got))
        }
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }
}
