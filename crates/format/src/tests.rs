//! Tests which aren't associated with a single component.
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::*;

const CHUNK_SIZE: u32 = 2;

#[derive(Clone, Debug, proptest_derive::Arbitrary)]
struct TestChunk {
    x: i32,
    y: i32,
    fill: u8,
}

impl TestChunk {
    fn pixels(&self) -> Vec<u8> {
        vec![self.fill; pixel_bytes(CHUNK_SIZE)]
    }
}

fn write_all(chunks: &[TestChunk]) -> Vec<u8> {
    let mut writer = RecordWriter::new(vec![], CHUNK_SIZE).expect("Should write header");
    for c in chunks {
        writer
            .write_record(c.x, c.y, &c.pixels()[..])
            .expect("Should write record");
    }
    assert_eq!(writer.records_written(), chunks.len());
    writer.finish().expect("Should finish")
}

/// Read records until the reader says to stop, returning them and how the file ended.
fn read_all(data: &[u8]) -> Result<(Vec<ChunkRecord>, ReadOutcome)> {
    let mut reader = RecordReader::open(data, CHUNK_SIZE)?;
    let mut records = vec![];
    loop {
        match reader.next_record()? {
            ReadOutcome::Record(r) => records.push(r),
            o => return Ok((records, o)),
        }
    }
}

#[test]
fn test_wrong_pixel_count_rejected() {
    let mut writer = RecordWriter::new(vec![], CHUNK_SIZE).expect("Should write header");
    let err = writer
        .write_record(0, 0, &[0u8; 3])
        .expect_err("Short pixel data should be refused");
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert_eq!(writer.records_written(), 0);
    assert_eq!(writer.finish().expect("Should finish").len(), HEADER_SIZE);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]
    // Cutting a file at any point past the header yields exactly the records which were completely written before the
    // cut, and reports whether the cut landed inside a record.
    #[test]
    fn fuzz_truncation(
        chunks in proptest::collection::vec(any::<TestChunk>(), 0..20),
        cut_fraction in 0.0..=1.0f64,
    ) {
        let data = write_all(&chunks[..]);
        let body = data.len() - HEADER_SIZE;
        let cut = HEADER_SIZE + (body as f64 * cut_fraction) as usize;
        let (records, outcome) = read_all(&data[..cut]).expect("Should read");

        let complete = (cut - HEADER_SIZE) / record_size(CHUNK_SIZE);
        let partial = (cut - HEADER_SIZE) % record_size(CHUNK_SIZE);
        prop_assert_eq!(records.len(), complete);
        for (r, c) in records.iter().zip(chunks.iter()) {
            prop_assert_eq!((r.x, r.y), (c.x, c.y));
            prop_assert_eq!(&r.pixels, &c.pixels());
        }

        match outcome {
            ReadOutcome::End => prop_assert_eq!(partial, 0),
            ReadOutcome::Truncated(n) => prop_assert_eq!(n, partial),
            ReadOutcome::Record(_) => unreachable!(),
        }
    }
}
