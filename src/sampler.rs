//! Neighbourhood sampling: window layouts, border policies and window views.
//!
//! A [`WindowLayout`] fixes the ordered list of non-centre offsets that become
//! Boolean variables. [`sample`] prepares the image once according to the
//! border policy (borrowing it for `skip`, building a padded copy for `pad`)
//! so that every [`Window`] is a plain view with no bounds special-casing.
//!
//! Padding modes
//! - `reflect`: mirror about the edge sample without repeating it (−1 → 1).
//! - `replicate`: clamp to the nearest edge sample (−1 → 0).
use crate::error::{PbpError, Result};
use crate::image::{ImageF32, ImageView, ImageViewMut};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Upper bound on variables per window; indicator sets are stored in a `u128`.
pub const MAX_VARIABLES: usize = 128;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowShape {
    /// Every offset of the `k × k` square.
    #[default]
    Square,
    /// Only the centre row and centre column.
    Cross,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderPolicy {
    /// Pixels without a full window get no indicators (response 0).
    Skip,
    /// Extend the image so every pixel gets a window.
    #[default]
    Pad,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PadMode {
    #[default]
    Reflect,
    Replicate,
}

/// Ordered variable offsets of an odd-sized window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowLayout {
    size: usize,
    shape: WindowShape,
    offsets: Vec<(i32, i32)>,
}

impl WindowLayout {
    /// Build the layout for a `size × size` window of the given shape.
    pub fn new(size: usize, shape: WindowShape) -> Result<Self> {
        if size < 3 || size % 2 == 0 {
            return Err(PbpError::config(
                "window_size",
                size,
                "must be an odd integer >= 3",
            ));
        }
        let too_large = || {
            PbpError::config(
                "window_size",
                size,
                format!("window has more than {MAX_VARIABLES} variables"),
            )
        };
        // Non-centre cells: k² − 1 for a square, 2(k − 1) for a cross.
        let variables = match shape {
            WindowShape::Square => size.checked_mul(size).map(|cells| cells - 1),
            WindowShape::Cross => (size - 1).checked_mul(2),
        };
        let Some(variables) = variables.filter(|&n| n <= MAX_VARIABLES) else {
            return Err(too_large());
        };
        let r = i32::try_from(size / 2).map_err(|_| too_large())?;
        let mut offsets = Vec::with_capacity(variables);
        for dy in -r..=r {
            for dx in -r..=r {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if shape == WindowShape::Cross && dx != 0 && dy != 0 {
                    continue;
                }
                offsets.push((dx, dy));
            }
        }
        Ok(Self {
            size,
            shape,
            offsets,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    #[inline]
    pub fn shape(&self) -> WindowShape {
        self.shape
    }

    /// Number of Boolean variables (non-centre positions).
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }

    /// Variable index of the offset `(dx, dy)`, if it belongs to the window.
    pub fn index_of(&self, dx: i32, dy: i32) -> Option<usize> {
        self.offsets.iter().position(|&o| o == (dx, dy))
    }
}

/// Image prepared for window extraction under a border policy.
#[derive(Clone, Debug)]
pub struct SampledImage<'a> {
    source: Cow<'a, ImageF32>,
    layout: WindowLayout,
    policy: BorderPolicy,
    /// Offset of original pixel (0, 0) inside `source`.
    origin: usize,
    w: usize,
    h: usize,
}

/// Read-only view of one window centred on a pixel.
#[derive(Clone, Copy, Debug)]
pub struct Window<'s> {
    source: &'s ImageF32,
    layout: &'s WindowLayout,
    cx: usize,
    cy: usize,
}

impl<'s> Window<'s> {
    #[inline]
    pub fn layout(&self) -> &'s WindowLayout {
        self.layout
    }

    #[inline]
    pub fn center(&self) -> f32 {
        self.source.get(self.cx, self.cy)
    }

    /// Intensity at the offset `(dx, dy)` from the centre.
    #[inline]
    pub fn at(&self, dx: i32, dy: i32) -> f32 {
        let x = (self.cx as i64 + dx as i64) as usize;
        let y = (self.cy as i64 + dy as i64) as usize;
        self.source.get(x, y)
    }

    /// Neighbour intensities in variable order.
    pub fn neighbors(&self) -> impl Iterator<Item = f32> + '_ {
        self.layout
            .offsets()
            .iter()
            .map(move |&(dx, dy)| self.at(dx, dy))
    }
}

/// Prepare `image` for window extraction.
///
/// Fails with [`PbpError::Dimension`] when either image dimension is smaller
/// than the window (this also rejects empty images).
pub fn sample<'a>(
    image: &'a ImageF32,
    layout: &WindowLayout,
    policy: BorderPolicy,
    pad_mode: PadMode,
) -> Result<SampledImage<'a>> {
    let size = layout.size();
    if image.w < size || image.h < size {
        return Err(PbpError::Dimension {
            width: image.w,
            height: image.h,
            window_size: size,
        });
    }
    let (source, origin) = match policy {
        BorderPolicy::Skip => (Cow::Borrowed(image), 0),
        BorderPolicy::Pad => {
            let r = layout.radius();
            (Cow::Owned(pad_image(image, r, pad_mode)), r)
        }
    };
    Ok(SampledImage {
        source,
        layout: layout.clone(),
        policy,
        origin,
        w: image.w,
        h: image.h,
    })
}

impl<'a> SampledImage<'a> {
    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn layout(&self) -> &WindowLayout {
        &self.layout
    }

    /// `true` when the pixel's full window lies inside the original image.
    #[inline]
    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        let r = self.layout.radius();
        x >= r && y >= r && x + r < self.w && y + r < self.h
    }

    /// Window centred on original pixel `(x, y)`; `None` for a skipped border pixel.
    #[inline]
    pub fn window(&self, x: usize, y: usize) -> Option<Window<'_>> {
        if self.policy == BorderPolicy::Skip && !self.is_interior(x, y) {
            return None;
        }
        Some(Window {
            source: &self.source,
            layout: &self.layout,
            cx: x + self.origin,
            cy: y + self.origin,
        })
    }

    /// Number of pixels that receive a window.
    pub fn window_count(&self) -> usize {
        match self.policy {
            BorderPolicy::Pad => self.w * self.h,
            BorderPolicy::Skip => {
                let r = self.layout.radius();
                (self.w - 2 * r) * (self.h - 2 * r)
            }
        }
    }
}

/// Map a possibly out-of-range coordinate into `[0, n)`.
#[inline]
fn border_index(i: isize, n: usize, mode: PadMode) -> usize {
    let last = n as isize - 1;
    match mode {
        PadMode::Replicate => i.clamp(0, last) as usize,
        PadMode::Reflect => {
            if last == 0 {
                return 0;
            }
            let period = 2 * last;
            let m = i.rem_euclid(period);
            (if m > last { period - m } else { m }) as usize
        }
    }
}

/// Extend `image` by `r` samples on every side.
pub fn pad_image(image: &ImageF32, r: usize, mode: PadMode) -> ImageF32 {
    let pw = image.w + 2 * r;
    let ph = image.h + 2 * r;
    let mut out = ImageF32::new(pw, ph);
    for py in 0..ph {
        let sy = border_index(py as isize - r as isize, image.h, mode);
        let src = image.row(sy);
        for (px, dst) in out.row_mut(py).iter_mut().enumerate() {
            let sx = border_index(px as isize - r as isize, image.w, mode);
            *dst = src[sx];
        }
    }
    out
}
