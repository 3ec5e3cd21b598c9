//! Square RGBA8 pixel buffers, one per chunk.
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Rgba {
        Rgba { r, g, b, a }
    }

    /// The off-white a fresh canvas starts as.
    pub const PAPER: Rgba = Rgba::new(245, 245, 245, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const RED: Rgba = Rgba::new(255, 0, 0, 255);

    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_bytes(bytes: [u8; 4]) -> Rgba {
        Rgba::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// A square, row-major RGBA8 image.
///
/// Bitmaps are plain owned values: moving one between the pool, the cache and the undo stacks moves the pixels, and
/// dropping one frees them.
#[derive(Clone, Eq, PartialEq)]
pub struct Bitmap {
    size: u32,
    pixels: Box<[u8]>,
}

// Don't derive debug because nothing good can ever come from printing megabytes of pixels.
impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("size", &self.size)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

impl Bitmap {
    pub fn new_filled(size: u32, colour: Rgba) -> Bitmap {
        let pixel = colour.to_bytes();
        let pixels = std::iter::repeat(pixel)
            .take(size as usize * size as usize)
            .flatten()
            .collect::<Vec<u8>>()
            .into_boxed_slice();
        Bitmap { size, pixels }
    }

    /// Take ownership of raw row-major RGBA8 bytes.
    pub fn from_bytes(size: u32, bytes: Vec<u8>) -> Result<Bitmap> {
        let expected = canvas_format::pixel_bytes(size);
        if bytes.len() != expected {
            return Err(Error::ChunkSizeMismatch {
                chunk_size: size,
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Bitmap {
            size,
            pixels: bytes.into_boxed_slice(),
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels[..]
    }

    /// Bytes of pixel memory held by this bitmap.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.size || y >= self.size {
            return None;
        }

        Some((y as usize * self.size as usize + x as usize) * 4)
    }

    /// Read a pixel.  Returns `None` outside the bitmap.
    pub fn read(&self, x: u32, y: u32) -> Option<Rgba> {
        let off = self.offset(x, y)?;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[off..off + 4]);
        Some(Rgba::from_bytes(px))
    }

    /// Write a pixel, returning the old value, or `None` if the position is outside the bitmap.
    pub fn write(&mut self, x: u32, y: u32, value: Rgba) -> Option<Rgba> {
        let old = self.read(x, y)?;
        let off = self.offset(x, y)?;
        self.pixels[off..off + 4].copy_from_slice(&value.to_bytes());
        Some(old)
    }

    pub fn fill(&mut self, colour: Rgba) {
        let pixel = colour.to_bytes();
        for p in self.pixels.chunks_exact_mut(4) {
            p.copy_from_slice(&pixel);
        }
    }

    /// Fill the half-open pixel rectangle `[x0, x1) x [y0, y1)`, clipped to the bitmap.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, colour: Rgba) {
        let x1 = x1.min(self.size);
        let y1 = y1.min(self.size);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let pixel = colour.to_bytes();
        let row_bytes = self.size as usize * 4;
        for y in y0..y1 {
            let row = &mut self.pixels[y as usize * row_bytes..(y as usize + 1) * row_bytes];
            for p in row[x0 as usize * 4..x1 as usize * 4].chunks_exact_mut(4) {
                p.copy_from_slice(&pixel);
            }
        }
    }

    /// Whether every pixel is the given colour.
    pub fn is_uniform(&self, colour: Rgba) -> bool {
        let pixel = colour.to_bytes();
        self.pixels.chunks_exact(4).all(|p| p == &pixel[..])
    }
}
