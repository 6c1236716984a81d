//! RGBA frame buffers handed back by camera hosts.

use crate::{Result, RigError};

/// An 8-bit RGBA image, row-major.
///
/// A frame with an empty buffer means the camera has not rendered yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RgbaFrame {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data, 4 bytes per pixel.
    pub data: Vec<u8>,
}

impl RgbaFrame {
    /// Wraps a pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::BufferSizeMismatch`] if `data` is neither empty
    /// nor `width * height * 4` bytes long.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::buffer_len(width, height);
        if !data.is_empty() && data.len() != expected {
            return Err(RigError::buffer_mismatch(expected, data.len()));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with one color.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = Self::buffer_len(width, height) / 4;
        Self {
            width,
            height,
            data: rgba.repeat(pixels),
        }
    }

    /// Expected buffer length for a frame size.
    #[must_use]
    pub fn buffer_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }

    /// Whether the frame holds rendered pixels.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.data.is_empty() && self.data.len() == Self::buffer_len(self.width, self.height)
    }

    /// Pixel at `(x, y)`, or `None` out of bounds or when not ready.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if !self.is_ready() || x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Mutable access to the pixel at `(x, y)`.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8]> {
        if !self.is_ready() || x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get_mut(i..i + 4)
    }

    /// Pixel data with the alpha channel dropped.
    #[must_use]
    pub fn to_rgb(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }
}
