//! Error type shared by every stage of the edge pipeline.
//!
//! All failures are validation failures: the core performs no I/O, so an
//! error is always raised before any output map is produced.

/// Errors reported while validating parameters or input images.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PbpError {
    /// A parameter is out of range or inconsistent with the rest of the set.
    #[error("invalid configuration `{field}` = {value}: {reason}")]
    Configuration {
        field: String,
        value: String,
        reason: String,
    },

    /// The image is too small for the configured window.
    #[error("image {width}x{height} is too small for a {window_size}x{window_size} window")]
    Dimension {
        width: usize,
        height: usize,
        window_size: usize,
    },

    /// A pixel buffer does not describe a `width × height` grid.
    #[error("buffer of {len} samples does not match a {width}x{height} grid")]
    Buffer {
        width: usize,
        height: usize,
        len: usize,
    },
}

impl PbpError {
    pub(crate) fn config(
        field: impl Into<String>,
        value: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PbpError>;
