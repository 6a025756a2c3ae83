//! I/O helpers for grayscale images, edge masks and JSON reports.
//!
//! - `load_grayscale_image`: read a PNG/JPEG/etc. into an owned 8-bit gray buffer.
//! - `load_normalized_image`: same, converted to `ImageF32` in `[0, 1]`.
//! - `load_mask`: read a reference mask (non-zero pixels are edges).
//! - `save_map_f32`: write a float map to a PNG, min–max scaled to 8 bits.
//! - `save_mask`: write an `EdgeMask` as a black/white PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{EdgeMask, ImageF32, ImageU8, ImageView};
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned 8-bit grayscale buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Construct an owned grayscale buffer given raw bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.into_raw();
    Ok(GrayImageU8::new(width, height, data))
}

/// Load an image as normalised single-channel intensities in `[0, 1]`.
pub fn load_normalized_image(path: &Path) -> Result<ImageF32, String> {
    let gray = load_grayscale_image(path)?;
    Ok(ImageF32::from_u8(&gray.as_view()))
}

/// Load a reference mask; any non-zero gray level counts as an edge.
pub fn load_mask(path: &Path) -> Result<EdgeMask, String> {
    let gray = load_grayscale_image(path)?;
    Ok(EdgeMask::from_gray(&gray.as_view()))
}

/// Save a float map as grayscale, stretching `[min, max]` onto `[0, 255]`.
///
/// A constant map is written as all black.
pub fn save_map_f32(map: &ImageF32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let (lo, hi) = map.min_max().unwrap_or((0.0, 0.0));
    let span = hi - lo;
    let mut out = GrayImage::new(map.w as u32, map.h as u32);
    for y in 0..map.h {
        for (x, &px) in map.row(y).iter().enumerate() {
            let v = if span > 0.0 {
                ((px - lo) / span * 255.0).clamp(0.0, 255.0)
            } else {
                0.0
            };
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a binary mask as a PNG with edges white (255) on black.
pub fn save_mask(mask: &EdgeMask, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(mask.width() as u32, mask.height() as u32);
    for y in 0..mask.height() {
        for (x, &v) in mask.row(y).iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Luma([v * 255]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
