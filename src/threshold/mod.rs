//! Conversion of a magnitude map into a binary edge mask.
//!
//! The cutoff is either a fixed value or a percentile of the magnitude
//! distribution. The percentile is a global reduction over the whole map and
//! is always computed before any mask value is written.
//!
//! A pixel is an edge when `magnitude ≥ cutoff` and `magnitude > 0`; a zero
//! magnitude (flat region, skipped border) is never an edge, whatever the
//! cutoff.
pub mod nms;
pub mod percentile;

pub use nms::suppress_non_maxima;
pub use percentile::percentile;

use crate::error::{PbpError, Result};
use crate::image::{EdgeMask, ImageF32};
use crate::parallel::fill_rows;

/// Validated thresholding rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ThresholdPolicy {
    /// A single scalar cutoff (finite, ≥ 0).
    GlobalFixed(f32),
    /// Cutoff at this percentile (0–100) of the magnitude distribution.
    Percentile(f32),
}

impl ThresholdPolicy {
    pub fn validate(&self) -> Result<()> {
        match *self {
            ThresholdPolicy::GlobalFixed(v) if v.is_finite() && v >= 0.0 => Ok(()),
            ThresholdPolicy::GlobalFixed(v) => Err(PbpError::config(
                "threshold_value",
                v,
                "global-fixed cutoff must be finite and >= 0",
            )),
            ThresholdPolicy::Percentile(p) if (0.0..=100.0).contains(&p) => Ok(()),
            ThresholdPolicy::Percentile(p) => Err(PbpError::config(
                "threshold_value",
                p,
                "percentile must lie in [0, 100]",
            )),
        }
    }

    /// Resolve the cutoff for `map`.
    pub fn cutoff(&self, map: &ImageF32) -> f32 {
        match *self {
            ThresholdPolicy::GlobalFixed(v) => v,
            ThresholdPolicy::Percentile(p) => percentile(&map.data, p),
        }
    }
}

/// Binarise `map` at `cutoff`.
pub fn apply_cutoff(map: &ImageF32, cutoff: f32) -> EdgeMask {
    let mut data = vec![0u8; map.w * map.h];
    fill_rows(&mut data, map.w, |y, row| {
        let start = y * map.w;
        for (dst, &mag) in row.iter_mut().zip(&map.data[start..start + map.w]) {
            *dst = (mag > 0.0 && mag >= cutoff) as u8;
        }
    });
    EdgeMask::from_raw(map.w, map.h, data)
}
