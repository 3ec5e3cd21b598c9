//! The file header: a magic number and a version, each a little-endian u32.
use bytes::{Buf, BufMut};

use crate::errors::*;

pub const MAGIC: u32 = 0x43414E56;
pub const VERSION: u32 = 1;

/// Size of the header on disk.
pub const HEADER_SIZE: usize = 8;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Header {
    pub magic: u32,
    pub version: u32,
}

impl Header {
    /// The header this crate writes.
    pub const CURRENT: Header = Header {
        magic: MAGIC,
        version: VERSION,
    };

    pub fn encode(&self, dest: &mut impl BufMut) {
        dest.put_u32_le(self.magic);
        dest.put_u32_le(self.version);
    }

    pub fn decode(source: &mut impl Buf) -> Result<Header> {
        if source.remaining() < HEADER_SIZE {
            return Err(FormatError::TruncatedHeader);
        }

        let magic = source.get_u32_le();
        let version = source.get_u32_le();
        Ok(Header { magic, version })
    }

    /// Check that this is a header we know how to read.  Magic is checked first.
    pub fn validate(&self) -> Result<()> {
        if self.magic != MAGIC {
            return Err(FormatError::BadMagic(self.magic));
        }

        if self.version != VERSION {
            return Err(FormatError::UnsupportedVersion(self.version));
        }

        Ok(())
    }
}
