//! Binary edge mask: one byte per pixel holding exactly 0 or 1.
//!
//! The mask is the final artifact of a run. Its buffer is private so a
//! produced mask cannot be edited in place; build a new one instead.
use super::traits::ImageView;
use super::u8::ImageU8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMask {
    w: usize,
    h: usize,
    data: Vec<u8>,
}

impl EdgeMask {
    /// Build a mask by evaluating `is_edge(x, y)` for every pixel.
    pub fn from_fn(w: usize, h: usize, mut is_edge: impl FnMut(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(is_edge(x, y) as u8);
            }
        }
        Self { w, h, data }
    }

    /// Binarise an 8-bit grayscale view: every non-zero sample is an edge.
    pub fn from_gray(gray: &ImageU8<'_>) -> Self {
        Self::from_fn(gray.w, gray.h, |x, y| gray.get(x, y) != 0)
    }

    pub(crate) fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), w * h);
        debug_assert!(data.iter().all(|&v| v <= 1));
        Self { w, h, data }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.get(x, y) != 0
    }

    /// Number of foreground (edge) pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Row-major 0/1 samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl ImageView for EdgeMask {
    type Pixel = u8;

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
        self.w
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}
