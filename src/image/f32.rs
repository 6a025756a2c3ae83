//! Owned single-channel f32 image in row-major layout (stride == width).
//!
//! Used both for normalised input intensities and for every continuous map
//! the pipeline produces (directional responses, magnitudes).
use super::traits::{ImageView, ImageViewMut};
use super::u8::ImageU8;
use crate::error::{PbpError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Wrap an existing row-major buffer, checking that it is rectangular.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != w * h {
            return Err(PbpError::Buffer {
                width: w,
                height: h,
                len: data.len(),
            });
        }
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut img = Self::new(w, h);
        for y in 0..h {
            for (x, px) in img.row_mut(y).iter_mut().enumerate() {
                *px = f(x, y);
            }
        }
        img
    }

    /// Convert an 8-bit grayscale view to intensities in `[0, 1]`.
    pub fn from_u8(gray: &ImageU8<'_>) -> Self {
        let mut img = Self::new(gray.w, gray.h);
        for y in 0..gray.h {
            let src = gray.row(y);
            for (dst, &v) in img.row_mut(y).iter_mut().zip(src) {
                *dst = v as f32 / 255.0;
            }
        }
        img
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Smallest and largest sample, or `None` for an empty image.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
