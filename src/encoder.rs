//! Boolean encoding of windows into indicator variables.
//!
//! Each non-centre position of a window becomes one bit: `1` when the
//! neighbour intensity is at least the reference (the centre pixel, or a
//! fixed threshold). The centre's own indicator under the same rule is kept
//! alongside the bits; it defines the pattern a flat window would produce.
use crate::error::{PbpError, Result};
use crate::parallel::fill_rows;
use crate::sampler::{SampledImage, Window};

/// Comparison rule turning intensities into indicators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EncodingRule {
    /// Indicator = neighbour ≥ centre.
    CenterRelative,
    /// Indicator = neighbour ≥ threshold.
    FixedThreshold(f32),
}

impl EncodingRule {
    pub fn validate(&self) -> Result<()> {
        match *self {
            EncodingRule::CenterRelative => Ok(()),
            EncodingRule::FixedThreshold(t) if t.is_finite() => Ok(()),
            EncodingRule::FixedThreshold(t) => Err(PbpError::config(
                "encoding_threshold",
                t,
                "must be a finite intensity",
            )),
        }
    }

    #[inline]
    fn reference(&self, center: f32) -> f32 {
        match *self {
            EncodingRule::CenterRelative => center,
            EncodingRule::FixedThreshold(t) => t,
        }
    }
}

/// Indicator bits of one window, in layout order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BooleanVariableSet {
    bits: u128,
    len: u8,
    center: bool,
}

impl BooleanVariableSet {
    /// Set with no variables, used for pixels that have no window.
    pub const fn empty() -> Self {
        Self {
            bits: 0,
            len: 0,
            center: false,
        }
    }

    /// Build a set from explicit indicator values.
    ///
    /// Panics if more than 128 indicators are given.
    pub fn from_indicators(indicators: &[bool], center: bool) -> Self {
        assert!(indicators.len() <= 128, "at most 128 indicators");
        let bits = indicators
            .iter()
            .enumerate()
            .fold(0u128, |acc, (i, &b)| acc | ((b as u128) << i));
        Self {
            bits,
            len: indicators.len() as u8,
            center,
        }
    }

    /// The pattern of a flat window: every variable equals the centre indicator.
    pub fn flat(len: usize, center: bool) -> Self {
        let bits = if center { low_mask(len) } else { 0 };
        Self {
            bits,
            len: len as u8,
            center,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn bits(&self) -> u128 {
        self.bits
    }

    /// Indicator of the centre pixel under the encoding rule.
    #[inline]
    pub fn center(&self) -> bool {
        self.center
    }

    #[inline]
    pub fn get(&self, i: usize) -> bool {
        i < self.len() && (self.bits >> i) & 1 == 1
    }
}

#[inline]
fn low_mask(len: usize) -> u128 {
    if len >= 128 {
        u128::MAX
    } else {
        (1u128 << len) - 1
    }
}

/// Encode one window.
pub fn encode(window: &Window<'_>, rule: EncodingRule) -> BooleanVariableSet {
    let center = window.center();
    let reference = rule.reference(center);
    let mut bits = 0u128;
    for (i, v) in window.neighbors().enumerate() {
        if v >= reference {
            bits |= 1u128 << i;
        }
    }
    BooleanVariableSet {
        bits,
        len: window.layout().len() as u8,
        center: center >= reference,
    }
}

/// Indicator sets for every pixel of the image.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedMap {
    pub w: usize,
    pub h: usize,
    sets: Vec<BooleanVariableSet>,
}

impl EncodedMap {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &BooleanVariableSet {
        &self.sets[y * self.w + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[BooleanVariableSet] {
        &self.sets[y * self.w..(y + 1) * self.w]
    }

    /// Pixels that received a non-empty indicator set.
    pub fn encoded_count(&self) -> usize {
        self.sets.iter().filter(|s| !s.is_empty()).count()
    }
}

/// Encode every window of a sampled image; skipped pixels get an empty set.
pub fn encode_all(sampled: &SampledImage<'_>, rule: EncodingRule) -> EncodedMap {
    let w = sampled.width();
    let h = sampled.height();
    let mut sets = vec![BooleanVariableSet::empty(); w * h];
    fill_rows(&mut sets, w, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            if let Some(window) = sampled.window(x, y) {
                *out = encode(&window, rule);
            }
        }
    });
    EncodedMap { w, h, sets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageF32;
    use crate::sampler::{sample, BorderPolicy, PadMode, WindowLayout, WindowShape};

    fn patch() -> ImageF32 {
        // 0.1 0.5 0.9
        // 0.2 0.5 0.4
        // 0.6 0.7 0.3
        ImageF32::from_vec(3, 3, vec![0.1, 0.5, 0.9, 0.2, 0.5, 0.4, 0.6, 0.7, 0.3]).unwrap()
    }

    fn encode_center(img: &ImageF32, rule: EncodingRule) -> BooleanVariableSet {
        let layout = WindowLayout::new(3, WindowShape::Square).unwrap();
        let sampled = sample(img, &layout, BorderPolicy::Skip, PadMode::Reflect).unwrap();
        let window = sampled.window(1, 1).unwrap();
        encode(&window, rule)
    }

    #[test]
    fn center_relative_compares_against_center() {
        let set = encode_center(&patch(), EncodingRule::CenterRelative);
        let expected = [false, true, true, false, false, true, true, false];
        for (i, &e) in expected.iter().enumerate() {
            assert_eq!(set.get(i), e, "variable {i}");
        }
        assert!(set.center());
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn fixed_threshold_ignores_center() {
        let set = encode_center(&patch(), EncodingRule::FixedThreshold(0.6));
        let expected = [false, false, true, false, false, true, true, false];
        for (i, &e) in expected.iter().enumerate() {
            assert_eq!(set.get(i), e, "variable {i}");
        }
        assert!(!set.center());
    }

    #[test]
    fn encoding_is_deterministic() {
        let img = patch();
        let a = encode_center(&img, EncodingRule::CenterRelative);
        let b = encode_center(&img, EncodingRule::CenterRelative);
        assert_eq!(a, b);
    }

    #[test]
    fn flat_pattern_matches_constant_window() {
        let img = ImageF32::from_vec(3, 3, vec![0.4; 9]).unwrap();
        let set = encode_center(&img, EncodingRule::CenterRelative);
        assert_eq!(set, BooleanVariableSet::flat(8, true));
        let below = encode_center(&img, EncodingRule::FixedThreshold(0.5));
        assert_eq!(below, BooleanVariableSet::flat(8, false));
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        assert!(EncodingRule::FixedThreshold(f32::NAN).validate().is_err());
        assert!(EncodingRule::FixedThreshold(0.5).validate().is_ok());
    }
}
