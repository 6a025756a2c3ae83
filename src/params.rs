//! Parameter record of one detection run and its validated, compiled form.
//!
//! [`PbpParams`] is the flat configuration record read from parameter-set
//! files (snake_case fields, kebab-case enum values). [`PbpParams::compile`]
//! checks every field before any pixel is touched and produces
//! [`CompiledParams`], which stays fixed for the whole run.
//!
//! ```json
//! {
//!   "window_size": 3,
//!   "border_policy": "skip",
//!   "encoding_rule": "center-relative",
//!   "directions": ["horizontal"],
//!   "polynomial_terms": {
//!     "horizontal": [
//!       { "coefficient": 1.0, "variables": [[1, 0]] },
//!       { "coefficient": -1.0, "variables": [[-1, 0]] }
//!     ]
//!   },
//!   "aggregation_rule": "max",
//!   "threshold_policy": "global-fixed",
//!   "threshold_value": 0.5,
//!   "nms_enabled": false
//! }
//! ```
use crate::aggregate::AggregationRule;
use crate::direction::Direction;
use crate::encoder::EncodingRule;
use crate::error::{PbpError, Result};
use crate::polynomial::{default_terms, DirectionalPolynomial, PolynomialTerm};
use crate::sampler::{BorderPolicy, PadMode, WindowLayout, WindowShape};
use crate::threshold::ThresholdPolicy;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncodingRuleKind {
    #[default]
    CenterRelative,
    FixedThreshold,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdPolicyKind {
    #[default]
    GlobalFixed,
    Percentile,
}

/// Configuration of one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PbpParams {
    /// Odd window side length (≥ 3).
    pub window_size: usize,
    pub window_shape: WindowShape,
    pub border_policy: BorderPolicy,
    /// Extension used when `border_policy` is `pad`.
    pub pad_mode: PadMode,
    pub encoding_rule: EncodingRuleKind,
    /// Required for `fixed-threshold`, rejected otherwise.
    pub encoding_threshold: Option<f32>,
    /// Enabled scan directions, in aggregation order.
    pub directions: Vec<Direction>,
    pub polynomial_terms: BTreeMap<Direction, Vec<PolynomialTerm>>,
    pub aggregation_rule: AggregationRule,
    pub threshold_policy: ThresholdPolicyKind,
    /// Cutoff for `global-fixed`, percentile (0–100) for `percentile`.
    pub threshold_value: f32,
    pub nms_enabled: bool,
}

impl Default for PbpParams {
    fn default() -> Self {
        Self {
            window_size: 3,
            window_shape: WindowShape::Square,
            border_policy: BorderPolicy::Pad,
            pad_mode: PadMode::Reflect,
            encoding_rule: EncodingRuleKind::CenterRelative,
            encoding_threshold: None,
            directions: Direction::ALL.to_vec(),
            polynomial_terms: Direction::ALL
                .iter()
                .map(|&d| (d, default_terms(d)))
                .collect(),
            aggregation_rule: AggregationRule::L2,
            threshold_policy: ThresholdPolicyKind::GlobalFixed,
            threshold_value: 1.0,
            nms_enabled: false,
        }
    }
}

impl PbpParams {
    /// Parse a parameter set from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate every field and compile the polynomials.
    pub fn compile(&self) -> Result<CompiledParams> {
        let layout = WindowLayout::new(self.window_size, self.window_shape)?;

        let encoding = match (self.encoding_rule, self.encoding_threshold) {
            (EncodingRuleKind::CenterRelative, None) => EncodingRule::CenterRelative,
            (EncodingRuleKind::CenterRelative, Some(t)) => {
                return Err(PbpError::config(
                    "encoding_threshold",
                    t,
                    "only applies to the fixed-threshold encoding rule",
                ))
            }
            (EncodingRuleKind::FixedThreshold, Some(t)) => EncodingRule::FixedThreshold(t),
            (EncodingRuleKind::FixedThreshold, None) => {
                return Err(PbpError::config(
                    "encoding_threshold",
                    "null",
                    "required by the fixed-threshold encoding rule",
                ))
            }
        };
        encoding.validate()?;

        if self.directions.is_empty() {
            return Err(PbpError::config(
                "directions",
                "[]",
                "at least one direction is required",
            ));
        }
        let mut polynomials = Vec::with_capacity(self.directions.len());
        for (i, &direction) in self.directions.iter().enumerate() {
            if self.directions[..i].contains(&direction) {
                return Err(PbpError::config(
                    "directions",
                    direction,
                    "direction listed more than once",
                ));
            }
            let terms = self.polynomial_terms.get(&direction).ok_or_else(|| {
                PbpError::config(
                    format!("polynomial_terms.{direction}"),
                    "missing",
                    "every enabled direction needs a polynomial",
                )
            })?;
            polynomials.push(DirectionalPolynomial::compile(direction, terms, &layout)?);
        }
        for direction in self.polynomial_terms.keys() {
            if !self.directions.contains(direction) {
                warn!("polynomial for disabled direction {direction} is ignored");
            }
        }

        let threshold = match self.threshold_policy {
            ThresholdPolicyKind::GlobalFixed => ThresholdPolicy::GlobalFixed(self.threshold_value),
            ThresholdPolicyKind::Percentile => ThresholdPolicy::Percentile(self.threshold_value),
        };
        threshold.validate()?;

        Ok(CompiledParams {
            layout,
            border_policy: self.border_policy,
            pad_mode: self.pad_mode,
            encoding,
            polynomials,
            aggregation: self.aggregation_rule,
            threshold,
            nms: self.nms_enabled,
        })
    }
}

/// Validated parameters, immutable for the duration of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledParams {
    pub layout: WindowLayout,
    pub border_policy: BorderPolicy,
    pub pad_mode: PadMode,
    pub encoding: EncodingRule,
    /// One polynomial per enabled direction, in configured order.
    pub polynomials: Vec<DirectionalPolynomial>,
    pub aggregation: AggregationRule,
    pub threshold: ThresholdPolicy,
    pub nms: bool,
}

impl CompiledParams {
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.polynomials.iter().map(DirectionalPolynomial::direction)
    }
}
