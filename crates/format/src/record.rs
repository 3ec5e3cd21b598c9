//! A single chunk record: a grid coordinate followed by the chunk's pixels.
use bytes::{Buf, BufMut};

/// Bytes used by the coordinate prefix of a record.
pub const COORD_SIZE: usize = 8;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Size of the pixel payload for a chunk of the given edge length.
pub fn pixel_bytes(chunk_size: u32) -> usize {
    let edge = chunk_size as usize;
    edge * edge * BYTES_PER_PIXEL
}

/// Size of one whole record for a chunk of the given edge length.
pub fn record_size(chunk_size: u32) -> usize {
    COORD_SIZE + pixel_bytes(chunk_size)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChunkRecord {
    pub x: i32,
    pub y: i32,
    /// Row-major RGBA8.
    pub pixels: Vec<u8>,
}

pub(crate) fn encode_coords(dest: &mut impl BufMut, x: i32, y: i32) {
    dest.put_i32_le(x);
    dest.put_i32_le(y);
}

impl ChunkRecord {
    /// Decode a record from a buffer holding exactly one record's worth of bytes (or more).
    ///
    /// The caller is responsible for ensuring that at least [record_size] bytes remain.
    pub(crate) fn decode(source: &mut impl Buf, chunk_size: u32) -> ChunkRecord {
        debug_assert!(source.remaining() >= record_size(chunk_size));
        let x = source.get_i32_le();
        let y = source.get_i32_le();
        let mut pixels = vec![0u8; pixel_bytes(chunk_size)];
        source.copy_to_slice(&mut pixels[..]);
        ChunkRecord { x, y, pixels }
    }

    pub fn encode(&self, dest: &mut impl BufMut) {
        encode_coords(dest, self.x, self.y);
        dest.put_slice(&self.pixels[..]);
    }
}
