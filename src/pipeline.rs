//! Stage-by-stage driver of the edge pipeline.
//!
//! Stages run strictly in order and each one consumes the previous state:
//!
//! ```text
//! Initialized → Sampled → Encoded → Evaluated → Aggregated → Thresholded → Done
//! ```
//!
//! Every state owns the maps produced so far and exposes them read-only, so a
//! caller can stop at any stage to inspect intermediates. The only fallible
//! transition is [`Initialized::sample`], which checks the image against the
//! window before any map is produced; parameters are validated earlier by
//! [`PbpParams::compile`].
//!
//! ```no_run
//! use pbp_edges::image::ImageF32;
//! use pbp_edges::pipeline::Pipeline;
//! use pbp_edges::PbpParams;
//!
//! # fn main() -> Result<(), pbp_edges::PbpError> {
//! let params = PbpParams::default().compile()?;
//! let image = ImageF32::new(64, 64);
//! let evaluated = Pipeline::new(&image, &params).sample()?.encode().evaluate();
//! println!("{} directional maps", evaluated.responses().len());
//! let detection = evaluated.aggregate().threshold().finish();
//! println!("{} edge pixels", detection.mask.count());
//! # Ok(())
//! # }
//! ```
use crate::aggregate::{aggregate, EdgeMagnitudeMap};
use crate::encoder::{encode_all, EncodedMap};
use crate::error::Result;
use crate::image::{EdgeMask, ImageF32};
use crate::params::{CompiledParams, PbpParams};
use crate::polynomial::{evaluate_all, ResponseMap};
use crate::sampler::{sample, SampledImage};
use crate::threshold::{apply_cutoff, suppress_non_maxima};
use crate::timing::TimingBreakdown;
use log::debug;
use std::time::Instant;

/// Entry point of the typestate pipeline.
pub struct Pipeline;

impl Pipeline {
    #[allow(clippy::new_ret_no_self)]
    pub fn new<'a>(image: &'a ImageF32, params: &'a CompiledParams) -> Initialized<'a> {
        Initialized {
            image,
            params,
            started: Instant::now(),
        }
    }

    /// Run every stage and return the final detection.
    pub fn run(image: &ImageF32, params: &CompiledParams) -> Result<EdgeDetection> {
        Ok(Self::new(image, params)
            .sample()?
            .encode()
            .evaluate()
            .aggregate()
            .threshold()
            .finish())
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Image and parameters bound, nothing computed yet.
#[must_use = "pipeline stages are consumed by advancing — call .sample() to continue"]
pub struct Initialized<'a> {
    image: &'a ImageF32,
    params: &'a CompiledParams,
    started: Instant,
}

impl<'a> Initialized<'a> {
    pub fn image(&self) -> &ImageF32 {
        self.image
    }

    /// Prepare windows under the border policy.
    ///
    /// Fails with a dimension error when the image is smaller than the window.
    pub fn sample(self) -> Result<Sampled<'a>> {
        let start = Instant::now();
        let sampled = sample(
            self.image,
            &self.params.layout,
            self.params.border_policy,
            self.params.pad_mode,
        )?;
        let mut timings = TimingBreakdown::default();
        let ms = elapsed_ms(start);
        timings.push("sample", ms);
        debug!(
            "sample: {}x{} image, {} windows of {} variables ({:.3} ms)",
            sampled.width(),
            sampled.height(),
            sampled.window_count(),
            sampled.layout().len(),
            ms
        );
        Ok(Sampled {
            params: self.params,
            sampled,
            started: self.started,
            timings,
        })
    }
}

/// Windows available for every pixel that has one.
#[must_use = "pipeline stages are consumed by advancing — call .encode() to continue"]
pub struct Sampled<'a> {
    params: &'a CompiledParams,
    sampled: SampledImage<'a>,
    started: Instant,
    timings: TimingBreakdown,
}

impl<'a> Sampled<'a> {
    pub fn sampled(&self) -> &SampledImage<'a> {
        &self.sampled
    }

    /// Encode every window into indicator variables.
    pub fn encode(self) -> Encoded<'a> {
        let start = Instant::now();
        let encoded = encode_all(&self.sampled, self.params.encoding);
        let mut timings = self.timings;
        let ms = elapsed_ms(start);
        timings.push("encode", ms);
        debug!(
            "encode: {} indicator sets ({:?}, {:.3} ms)",
            encoded.encoded_count(),
            self.params.encoding,
            ms
        );
        Encoded {
            params: self.params,
            encoded,
            started: self.started,
            timings,
        }
    }
}

/// Indicator sets for every pixel.
#[must_use = "pipeline stages are consumed by advancing — call .evaluate() to continue"]
pub struct Encoded<'a> {
    params: &'a CompiledParams,
    encoded: EncodedMap,
    started: Instant,
    timings: TimingBreakdown,
}

impl<'a> Encoded<'a> {
    pub fn encoded(&self) -> &EncodedMap {
        &self.encoded
    }

    /// Evaluate the polynomial of every enabled direction.
    pub fn evaluate(self) -> Evaluated<'a> {
        let start = Instant::now();
        let responses = evaluate_all(&self.encoded, &self.params.polynomials);
        let mut timings = self.timings;
        let ms = elapsed_ms(start);
        timings.push("evaluate", ms);
        debug!(
            "evaluate: {} directional maps ({:.3} ms)",
            responses.len(),
            ms
        );
        Evaluated {
            params: self.params,
            responses,
            started: self.started,
            timings,
        }
    }
}

/// One response map per enabled direction.
#[must_use = "pipeline stages are consumed by advancing — call .aggregate() to continue"]
pub struct Evaluated<'a> {
    params: &'a CompiledParams,
    responses: Vec<ResponseMap>,
    started: Instant,
    timings: TimingBreakdown,
}

impl<'a> Evaluated<'a> {
    pub fn responses(&self) -> &[ResponseMap] {
        &self.responses
    }

    /// Combine the directional responses into the magnitude map.
    pub fn aggregate(self) -> Aggregated<'a> {
        let start = Instant::now();
        let magnitude = aggregate(&self.responses, self.params.aggregation);
        let mut timings = self.timings;
        let ms = elapsed_ms(start);
        timings.push("aggregate", ms);
        debug!(
            "aggregate: {:?}, max magnitude {:.4} ({:.3} ms)",
            self.params.aggregation,
            magnitude.max(),
            ms
        );
        Aggregated {
            params: self.params,
            responses: self.responses,
            magnitude,
            started: self.started,
            timings,
        }
    }
}

/// Edge magnitude and dominant direction per pixel.
#[must_use = "pipeline stages are consumed by advancing — call .threshold() to continue"]
pub struct Aggregated<'a> {
    params: &'a CompiledParams,
    responses: Vec<ResponseMap>,
    magnitude: EdgeMagnitudeMap,
    started: Instant,
    timings: TimingBreakdown,
}

impl<'a> Aggregated<'a> {
    pub fn magnitude(&self) -> &EdgeMagnitudeMap {
        &self.magnitude
    }

    pub fn responses(&self) -> &[ResponseMap] {
        &self.responses
    }

    /// Optionally thin the magnitude map, resolve the cutoff, and binarise.
    pub fn threshold(self) -> Thresholded {
        let start = Instant::now();
        let thinned = self
            .params
            .nms
            .then(|| suppress_non_maxima(&self.magnitude));
        let source = thinned.as_ref().unwrap_or(&self.magnitude.magnitude);
        // Percentile cutoffs are a full reduction over the map; it completes
        // before any mask value is written.
        let cutoff = self.params.threshold.cutoff(source);
        let mask = apply_cutoff(source, cutoff);
        let mut timings = self.timings;
        let ms = elapsed_ms(start);
        timings.push("threshold", ms);
        debug!(
            "threshold: {:?} -> cutoff {:.4}, nms={}, {} edge pixels ({:.3} ms)",
            self.params.threshold,
            cutoff,
            self.params.nms,
            mask.count(),
            ms
        );
        Thresholded {
            responses: self.responses,
            magnitude: self.magnitude,
            thinned,
            cutoff,
            mask,
            started: self.started,
            timings,
        }
    }
}

/// Binary mask produced; call [`finish`](Self::finish) for the result bundle.
#[must_use = "call .finish() to obtain the detection"]
pub struct Thresholded {
    responses: Vec<ResponseMap>,
    magnitude: EdgeMagnitudeMap,
    thinned: Option<ImageF32>,
    cutoff: f32,
    mask: EdgeMask,
    started: Instant,
    timings: TimingBreakdown,
}

impl Thresholded {
    pub fn mask(&self) -> &EdgeMask {
        &self.mask
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Close the run and stamp the total elapsed time.
    pub fn finish(self) -> EdgeDetection {
        let mut timings = self.timings;
        timings.total_ms = elapsed_ms(self.started);
        EdgeDetection {
            mask: self.mask,
            magnitude: self.magnitude,
            thinned: self.thinned,
            responses: self.responses,
            cutoff: self.cutoff,
            timings,
        }
    }
}

/// Final artifacts of one run (the `Done` state).
#[derive(Clone, Debug)]
pub struct EdgeDetection {
    /// Binary edge mask, same shape as the input.
    pub mask: EdgeMask,
    /// Edge magnitude and dominant direction per pixel.
    pub magnitude: EdgeMagnitudeMap,
    /// Magnitude after non-maximum suppression, when enabled.
    pub thinned: Option<ImageF32>,
    /// Directional response maps in configured order.
    pub responses: Vec<ResponseMap>,
    /// Cutoff the mask was thresholded at.
    pub cutoff: f32,
    pub timings: TimingBreakdown,
}

/// Detector holding compiled parameters for repeated runs.
///
/// Each call to [`detect`](Self::detect) is independent and leaves the input
/// untouched, so one detector per parameter set serves a whole sweep.
#[derive(Clone, Debug)]
pub struct PbpDetector {
    params: CompiledParams,
}

impl PbpDetector {
    /// Validate `params`; fails before any image is processed.
    pub fn new(params: &PbpParams) -> Result<Self> {
        Ok(Self {
            params: params.compile()?,
        })
    }

    pub fn params(&self) -> &CompiledParams {
        &self.params
    }

    pub fn detect(&self, image: &ImageF32) -> Result<EdgeDetection> {
        Pipeline::run(image, &self.params)
    }
}

/// Validate `params` and run the full pipeline once.
pub fn detect_edges(image: &ImageF32, params: &PbpParams) -> Result<EdgeDetection> {
    PbpDetector::new(params)?.detect(image)
}
