//! This crate encodes and decodes canvas save files.  Write with a [RecordWriter] and read with a [RecordReader].
//!
//! A file is a fixed 8 byte header followed by zero or more chunk records:
//!
//! - Header: `magic: u32`, `version: u32`, both little endian.  The magic is `0x43414E56` ("CANV" when read as a
//!   big-endian word).
//! - Record: `x: i32`, `y: i32` (the grid coordinate, little endian), then `chunk_size * chunk_size` RGBA8 pixels in
//!   row-major order.
//!
//! There is no record count, checksum or compression: a reader stops at end of file.  The chunk size is not stored,
//! so both sides must agree on it.  This crate doesn't know what the pixels mean, just how to separate them into
//! records.
mod errors;
mod header;
mod reader;
mod record;
#[cfg(test)]
mod tests;
mod writer;

pub use errors::*;
pub use header::*;
pub use reader::*;
pub use record::*;
pub use writer::*;
