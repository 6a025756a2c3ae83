#![doc = include_str!("../README.md")]

// Core pipeline stages, leaf-first.
pub mod sampler;
pub mod encoder;
pub mod polynomial;
pub mod aggregate;
pub mod threshold;
pub mod pipeline;

// Supporting types and configuration.
pub mod direction;
pub mod error;
pub mod image;
pub mod params;

// Tooling around the core: timings, mask comparison, tool configuration.
pub mod config;
pub mod metrics;
pub mod timing;

mod parallel;

// --- High-level re-exports -------------------------------------------------

pub use crate::direction::Direction;
pub use crate::error::PbpError;
pub use crate::params::{CompiledParams, PbpParams};
pub use crate::pipeline::{detect_edges, EdgeDetection, PbpDetector, Pipeline};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use pbp_edges::prelude::*;
///
/// # fn main() -> Result<(), PbpError> {
/// let (w, h) = (64usize, 48usize);
/// let image = ImageF32::from_fn(w, h, |x, _| if x < w / 2 { 0.0 } else { 1.0 });
///
/// let detector = PbpDetector::new(&PbpParams::default())?;
/// let detection = detector.detect(&image)?;
/// println!("edges={} cutoff={:.3}", detection.mask.count(), detection.cutoff);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{EdgeMask, ImageF32};
    pub use crate::polynomial::PolynomialTerm;
    pub use crate::{Direction, EdgeDetection, PbpDetector, PbpError, PbpParams};
}
