//! Pixel-wise comparison of a predicted edge mask against a reference mask.
use crate::error::{PbpError, Result};
use crate::image::{EdgeMask, ImageView};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskComparison {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Intersection over union of the foreground sets.
    pub iou: f64,
}

/// Compare `predicted` with `reference`; both must have the same shape.
///
/// Ratios with an empty denominator are reported as 1.0 when both masks
/// agree on having no foreground there, and 0.0 otherwise.
pub fn compare_masks(predicted: &EdgeMask, reference: &EdgeMask) -> Result<MaskComparison> {
    if !predicted.same_shape(reference) {
        return Err(PbpError::Buffer {
            width: reference.width(),
            height: reference.height(),
            len: predicted.data().len(),
        });
    }
    let (mut tp, mut fp, mut fn_, mut tn) = (0usize, 0usize, 0usize, 0usize);
    for (&p, &r) in predicted.data().iter().zip(reference.data()) {
        match (p != 0, r != 0) {
            (true, true) => tp += 1,
            (true, false) => fp += 1,
            (false, true) => fn_ += 1,
            (false, false) => tn += 1,
        }
    }
    let ratio = |num: usize, den: usize| {
        if den == 0 {
            if num == 0 && fp + fn_ == 0 {
                1.0
            } else {
                0.0
            }
        } else {
            num as f64 / den as f64
        }
    };
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    let iou = ratio(tp, tp + fp + fn_);
    Ok(MaskComparison {
        true_positives: tp,
        false_positives: fp,
        false_negatives: fn_,
        true_negatives: tn,
        precision,
        recall,
        f1,
        iou,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_scores() {
        let pred = EdgeMask::from_fn(4, 1, |x, _| x < 2);
        let truth = EdgeMask::from_fn(4, 1, |x, _| x == 1 || x == 2);
        let cmp = compare_masks(&pred, &truth).unwrap();
        assert_eq!(
            (cmp.true_positives, cmp.false_positives, cmp.false_negatives, cmp.true_negatives),
            (1, 1, 1, 1)
        );
        assert_eq!(cmp.precision, 0.5);
        assert_eq!(cmp.recall, 0.5);
        assert_eq!(cmp.f1, 0.5);
        assert!((cmp.iou - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_masks_agree_perfectly() {
        let a = EdgeMask::from_fn(3, 3, |_, _| false);
        let cmp = compare_masks(&a, &a).unwrap();
        assert_eq!(cmp.f1, 1.0);
        assert_eq!(cmp.iou, 1.0);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let a = EdgeMask::from_fn(3, 3, |_, _| false);
        let b = EdgeMask::from_fn(3, 2, |_, _| false);
        assert!(compare_masks(&a, &b).is_err());
    }
}
