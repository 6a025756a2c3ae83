mod common;

use common::synthetic_image::{disc, step_image, uniform_image};
use pbp_edges::image::{ImageF32, ImageView};
use pbp_edges::params::{EncodingRuleKind, ThresholdPolicyKind};
use pbp_edges::pipeline::Pipeline;
use pbp_edges::polynomial::PolynomialTerm;
use pbp_edges::sampler::{BorderPolicy, PadMode};
use pbp_edges::{detect_edges, Direction, PbpDetector, PbpError, PbpParams};
use std::collections::BTreeMap;

fn horizontal_only(terms: Vec<PolynomialTerm>) -> PbpParams {
    PbpParams {
        window_size: 3,
        border_policy: BorderPolicy::Skip,
        directions: vec![Direction::Horizontal],
        polynomial_terms: BTreeMap::from([(Direction::Horizontal, terms)]),
        threshold_policy: ThresholdPolicyKind::GlobalFixed,
        threshold_value: 0.5,
        ..Default::default()
    }
}

fn left_right_pair() -> Vec<PolynomialTerm> {
    vec![PolynomialTerm::new(1.0, [[-1, 0], [1, 0]])]
}

#[test]
fn step_edge_response_isolates_one_column() {
    let _ = env_logger::builder().is_test(true).try_init();
    // Left two columns 0, right three columns 1.
    let image = step_image(5, 5, 2, 0.0, 1.0);
    let detection = detect_edges(&image, &horizontal_only(left_right_pair())).unwrap();

    let mag = &detection.magnitude;
    let step = mag.get(2, 2);
    assert!(step > 0.0, "expected a response next to the step");
    for y in 0..5 {
        for x in 0..5 {
            let expected = if x == 2 && (1..4).contains(&y) { step } else { 0.0 };
            assert_eq!(mag.get(x, y), expected, "magnitude at ({x}, {y})");
            assert_eq!(
                detection.mask.is_edge(x, y),
                expected > 0.0,
                "mask at ({x}, {y})"
            );
        }
    }
    assert_eq!(detection.mask.count(), 3);
}

#[test]
fn step_edge_with_threshold_encoding_marks_both_sides() {
    // Fixed-threshold encoding with an antisymmetric left/right polynomial
    // responds equally on both pixel columns adjacent to the step.
    let image = step_image(5, 5, 2, 0.0, 1.0);
    let params = PbpParams {
        encoding_rule: EncodingRuleKind::FixedThreshold,
        encoding_threshold: Some(0.5),
        ..horizontal_only(vec![
            PolynomialTerm::new(1.0, [[1, 0]]),
            PolynomialTerm::new(-1.0, [[-1, 0]]),
        ])
    };
    let detection = detect_edges(&image, &params).unwrap();
    let mag = &detection.magnitude;
    for y in 1..4 {
        assert_eq!(mag.get(1, y), 1.0);
        assert_eq!(mag.get(2, y), 1.0);
        assert_eq!(mag.get(3, y), 0.0);
    }
    assert_eq!(detection.mask.count(), 6);
}

#[test]
fn skip_border_leaves_border_magnitudes_at_zero() {
    let image = disc(24, 20, 6.0);
    let params = PbpParams {
        border_policy: BorderPolicy::Skip,
        ..Default::default()
    };
    let detection = detect_edges(&image, &params).unwrap();
    let mag = &detection.magnitude;
    for x in 0..mag.width() {
        assert_eq!(mag.get(x, 0), 0.0);
        assert_eq!(mag.get(x, mag.height() - 1), 0.0);
    }
    for y in 0..mag.height() {
        assert_eq!(mag.get(0, y), 0.0);
        assert_eq!(mag.get(mag.width() - 1, y), 0.0);
    }
    assert!(mag.max() > 0.0);
}

#[test]
fn reflect_padding_matches_interior_computation_at_border() {
    let image = step_image(5, 5, 2, 0.0, 1.0);
    let params = PbpParams {
        border_policy: BorderPolicy::Pad,
        pad_mode: PadMode::Reflect,
        ..horizontal_only(left_right_pair())
    };
    let detection = detect_edges(&image, &params).unwrap();
    let mag = &detection.magnitude;
    let interior = mag.get(2, 2);
    assert!(interior > 0.0);
    for y in [0, 4] {
        let border = mag.get(2, y);
        assert!(border.is_finite());
        assert_eq!(border, interior, "border row {y}");
    }
    assert_eq!(detection.mask.count(), 5);
}

#[test]
fn replicate_padding_covers_every_pixel() {
    let image = disc(16, 16, 5.0);
    let params = PbpParams {
        border_policy: BorderPolicy::Pad,
        pad_mode: PadMode::Replicate,
        ..Default::default()
    };
    let detector = PbpDetector::new(&params).unwrap();
    let detection = detector.detect(&image).unwrap();
    assert!(detection
        .magnitude
        .magnitude
        .data
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0));
    assert!(detection.mask.count() > 0);
}

#[test]
fn percentile_100_keeps_only_global_maxima() {
    let image = disc(32, 32, 9.0);
    let params = PbpParams {
        threshold_policy: ThresholdPolicyKind::Percentile,
        threshold_value: 100.0,
        ..Default::default()
    };
    let detection = detect_edges(&image, &params).unwrap();
    let max = detection.magnitude.max();
    assert!(max > 0.0);
    assert_eq!(detection.cutoff, max);
    let maxima = detection
        .magnitude
        .magnitude
        .data
        .iter()
        .filter(|&&v| v == max)
        .count();
    assert_eq!(detection.mask.count(), maxima);
    for y in 0..32 {
        for x in 0..32 {
            if detection.mask.is_edge(x, y) {
                assert_eq!(detection.magnitude.get(x, y), max);
            }
        }
    }
}

#[test]
fn percentile_cutoff_tracks_distribution() {
    let image = disc(32, 32, 9.0);
    let mut counts = Vec::new();
    for p in [50.0, 90.0, 99.0] {
        let params = PbpParams {
            threshold_policy: ThresholdPolicyKind::Percentile,
            threshold_value: p,
            ..Default::default()
        };
        counts.push(detect_edges(&image, &params).unwrap().mask.count());
    }
    assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{counts:?}");
}

#[test]
fn nms_thins_edges() {
    let image = disc(40, 40, 12.0);
    let params = PbpParams {
        threshold_value: 0.5,
        ..Default::default()
    };
    let thick = detect_edges(&image, &params).unwrap();
    let thin = detect_edges(
        &image,
        &PbpParams {
            nms_enabled: true,
            ..params
        },
    )
    .unwrap();
    assert!(thin.thinned.is_some());
    assert!(thick.thinned.is_none());
    assert!(thin.mask.count() > 0);
    assert!(thin.mask.count() <= thick.mask.count());
    // Thinning only removes pixels.
    for y in 0..40 {
        for x in 0..40 {
            if thin.mask.is_edge(x, y) {
                assert!(thick.mask.is_edge(x, y), "({x}, {y})");
            }
        }
    }
}

#[test]
fn nms_thins_equal_valued_step_edge_to_single_pixel() {
    // Both columns next to the step respond with the same magnitude.
    let image = step_image(7, 5, 3, 0.0, 1.0);
    let params = PbpParams {
        encoding_rule: EncodingRuleKind::FixedThreshold,
        encoding_threshold: Some(0.5),
        nms_enabled: true,
        ..horizontal_only(vec![
            PolynomialTerm::new(1.0, [[1, 0]]),
            PolynomialTerm::new(-1.0, [[-1, 0]]),
        ])
    };
    let detection = detect_edges(&image, &params).unwrap();
    assert_eq!(detection.magnitude.get(2, 2), detection.magnitude.get(3, 2));
    for y in 1..4 {
        let row: Vec<bool> = (0..7).map(|x| detection.mask.is_edge(x, y)).collect();
        assert_eq!(row.iter().filter(|&&e| e).count(), 1, "row {y}: {row:?}");
        assert!(detection.mask.is_edge(3, y));
    }
    assert_eq!(detection.mask.count(), 3);
}

#[test]
fn image_smaller_than_window_fails_before_processing() {
    let image = uniform_image(4, 4, 0.5);
    let params = PbpParams {
        window_size: 5,
        ..Default::default()
    };
    let err = detect_edges(&image, &params).unwrap_err();
    assert_eq!(
        err,
        PbpError::Dimension {
            width: 4,
            height: 4,
            window_size: 5
        }
    );

    let empty = ImageF32::new(0, 0);
    assert!(matches!(
        detect_edges(&empty, &PbpParams::default()),
        Err(PbpError::Dimension { .. })
    ));
}

#[test]
fn invalid_configuration_fails_before_processing() {
    let image = disc(16, 16, 5.0);
    let params = PbpParams {
        threshold_policy: ThresholdPolicyKind::Percentile,
        threshold_value: 120.0,
        ..Default::default()
    };
    let err = detect_edges(&image, &params).unwrap_err();
    assert!(matches!(err, PbpError::Configuration { ref field, .. } if field == "threshold_value"));
}

#[test]
fn stages_expose_intermediate_maps() {
    let image = disc(20, 20, 6.0);
    let params = PbpParams {
        border_policy: BorderPolicy::Skip,
        ..Default::default()
    }
    .compile()
    .unwrap();

    let sampled = Pipeline::new(&image, &params).sample().unwrap();
    assert_eq!(sampled.sampled().window_count(), 18 * 18);
    let encoded = sampled.encode();
    assert_eq!(encoded.encoded().encoded_count(), 18 * 18);
    assert!(encoded.encoded().get(0, 0).is_empty());
    let evaluated = encoded.evaluate();
    assert_eq!(evaluated.responses().len(), 4);
    let directions: Vec<_> = evaluated.responses().iter().map(|r| r.direction).collect();
    assert_eq!(directions, Direction::ALL.to_vec());
    let aggregated = evaluated.aggregate();
    let max = aggregated.magnitude().max();
    let thresholded = aggregated.threshold();
    assert_eq!(thresholded.cutoff(), 1.0);
    let detection = thresholded.finish();
    assert_eq!(detection.magnitude.max(), max);
    assert!(detection.timings.stage_ms("evaluate").is_some());
    assert_eq!(detection.timings.stages.len(), 5);

    let direct = Pipeline::run(&image, &params).unwrap();
    assert_eq!(direct.mask, detection.mask);
}

#[test]
fn repeated_runs_are_independent_and_leave_input_untouched() {
    let image = disc(24, 24, 7.0);
    let before = image.clone();
    let detector = PbpDetector::new(&PbpParams::default()).unwrap();
    assert_eq!(detector.params(), &PbpParams::default().compile().unwrap());
    let a = detector.detect(&image).unwrap();
    let b = detector.detect(&image).unwrap();
    assert_eq!(image, before);
    assert_eq!(a.mask, b.mask);
    assert_eq!(a.magnitude, b.magnitude);
    assert_eq!(a.mask.width(), image.width());
    assert_eq!(a.mask.height(), image.height());
}
