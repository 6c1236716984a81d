//! PNG frame output.

use std::path::Path;

use image::{ImageFormat, RgbImage};
use stereo_rig::RgbaFrame;

use crate::{DatasetError, Result};

/// Writes an RGBA frame as an RGB PNG, dropping alpha.
///
/// # Errors
///
/// Returns [`DatasetError::FrameNotReady`] (with `index`) for an empty frame,
/// or [`DatasetError::Image`] if encoding or writing fails.
pub fn write_rgb_png(path: &Path, frame: &RgbaFrame, index: usize) -> Result<()> {
    if !frame.is_ready() {
        return Err(DatasetError::FrameNotReady { index });
    }
    let image = RgbImage::from_raw(frame.width, frame.height, frame.to_rgb())
        .ok_or(DatasetError::FrameNotReady { index })?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| DatasetError::Image {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn drops_alpha() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("0000.png");
        let frame = RgbaFrame::filled(3, 2, [10, 20, 30, 128]);
        write_rgb_png(&path, &frame, 0).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.color(), image::ColorType::Rgb8);
        let rgb = loaded.to_rgb8();
        assert_eq!(rgb.dimensions(), (3, 2));
        assert_eq!(rgb.get_pixel(2, 1).0, [10, 20, 30]);
    }

    #[test]
    fn empty_frame_is_rejected() {
        let dir = tempdir().unwrap();
        let err = write_rgb_png(&dir.path().join("x.png"), &RgbaFrame::default(), 7).unwrap_err();
        assert!(matches!(err, DatasetError::FrameNotReady { index: 7 }));
    }
}
