//! Pseudo-Boolean polynomial responses over window indicator variables.
//!
//! A directional polynomial is a weighted sum of monomials, each monomial a
//! product of indicator variables:
//!
//! ```text
//! P(x) = Σ_t  c_t · Π_{v ∈ S_t} x_v        x_v ∈ {0, 1}
//! ```
//!
//! Terms are configured as `(coefficient, [offsets])` and compiled once per
//! run into bitmasks over the window layout, so evaluating a monomial is a
//! single mask test (`bits & mask == mask`). Compilation also brings the
//! polynomial to a canonical form: terms are sorted by `(mask, coefficient)`
//! and like terms are merged, which makes the evaluated value independent of
//! the order in which terms were listed.
//!
//! The directional response reported to the aggregator is measured against
//! the flat pattern of the window, `P(x) − P(x_flat)`, where `x_flat` sets
//! every variable to the centre's own indicator. A window whose neighbours
//! all compare like its centre therefore responds with exactly 0, whatever
//! the coefficients.
mod defaults;

pub use defaults::default_terms;

use crate::direction::Direction;
use crate::encoder::{BooleanVariableSet, EncodedMap};
use crate::error::{PbpError, Result};
use crate::image::ImageF32;
use crate::parallel::fill_rows;
use crate::sampler::WindowLayout;
use serde::{Deserialize, Serialize};

/// One configured monomial: a coefficient and the offsets `[dx, dy]` of its variables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolynomialTerm {
    pub coefficient: f32,
    pub variables: Vec<[i32; 2]>,
}

impl PolynomialTerm {
    pub fn new(coefficient: f32, variables: impl IntoIterator<Item = [i32; 2]>) -> Self {
        Self {
            coefficient,
            variables: variables.into_iter().collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CompiledTerm {
    mask: u128,
    coefficient: f64,
}

/// Compiled polynomial for one scan direction.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalPolynomial {
    direction: Direction,
    /// Variable count of the layout the terms were compiled against.
    variables: usize,
    terms: Vec<CompiledTerm>,
    /// `P(1, …, 1)`, the value of the all-ones pattern.
    flat_sum: f64,
}

impl DirectionalPolynomial {
    /// Validate `terms` against `layout` and compile them.
    pub fn compile(
        direction: Direction,
        terms: &[PolynomialTerm],
        layout: &WindowLayout,
    ) -> Result<Self> {
        if terms.is_empty() {
            return Err(PbpError::config(
                format!("polynomial_terms.{direction}"),
                "[]",
                "an enabled direction needs at least one term",
            ));
        }

        let mut compiled = Vec::with_capacity(terms.len());
        for (i, term) in terms.iter().enumerate() {
            let field = || format!("polynomial_terms.{direction}[{i}]");
            if !term.coefficient.is_finite() {
                return Err(PbpError::config(
                    field(),
                    term.coefficient,
                    "coefficient must be finite",
                ));
            }
            if term.variables.is_empty() {
                return Err(PbpError::config(
                    field(),
                    "[]",
                    "a term needs at least one variable",
                ));
            }
            let mut mask = 0u128;
            for &[dx, dy] in &term.variables {
                let idx = layout.index_of(dx, dy).ok_or_else(|| {
                    let reason = if dx == 0 && dy == 0 {
                        "the centre pixel is not a variable".to_string()
                    } else {
                        format!(
                            "offset is not part of the {size}x{size} {shape:?} window",
                            size = layout.size(),
                            shape = layout.shape()
                        )
                    };
                    PbpError::config(field(), format!("[{dx}, {dy}]"), reason)
                })?;
                let bit = 1u128 << idx;
                if mask & bit != 0 {
                    return Err(PbpError::config(
                        field(),
                        format!("[{dx}, {dy}]"),
                        "variable repeated within one term",
                    ));
                }
                mask |= bit;
            }
            compiled.push(CompiledTerm {
                mask,
                coefficient: term.coefficient as f64,
            });
        }

        let terms = canonicalize(compiled);
        let flat_sum = terms.iter().map(|t| t.coefficient).sum();
        Ok(Self {
            direction,
            variables: layout.len(),
            terms,
            flat_sum,
        })
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of monomials after merging like terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Highest monomial degree (0 for a polynomial whose terms all cancelled).
    pub fn degree(&self) -> u32 {
        self.terms
            .iter()
            .map(|t| t.mask.count_ones())
            .max()
            .unwrap_or(0)
    }

    /// Plain evaluation `Σ c_t · Π x_v`; 0 for a set of the wrong length.
    #[inline]
    pub fn evaluate(&self, vars: &BooleanVariableSet) -> f64 {
        if vars.len() != self.variables {
            return 0.0;
        }
        let bits = vars.bits();
        self.terms
            .iter()
            .filter(|t| bits & t.mask == t.mask)
            .map(|t| t.coefficient)
            .sum()
    }

    /// Directional response relative to the flat pattern.
    #[inline]
    pub fn response(&self, vars: &BooleanVariableSet) -> f32 {
        if vars.len() != self.variables {
            return 0.0;
        }
        // x_flat is all zeros when the centre indicator is 0, and every
        // monomial is non-empty, so P(x_flat) is 0 in that case.
        let flat = if vars.center() { self.flat_sum } else { 0.0 };
        (self.evaluate(vars) - flat) as f32
    }
}

fn canonicalize(mut terms: Vec<CompiledTerm>) -> Vec<CompiledTerm> {
    terms.sort_by(|a, b| {
        a.mask
            .cmp(&b.mask)
            .then(a.coefficient.total_cmp(&b.coefficient))
    });
    let mut merged: Vec<CompiledTerm> = Vec::with_capacity(terms.len());
    for term in terms {
        match merged.last_mut() {
            Some(last) if last.mask == term.mask => last.coefficient += term.coefficient,
            _ => merged.push(term),
        }
    }
    merged.retain(|t| t.coefficient != 0.0);
    merged
}

/// Response map of one direction.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseMap {
    pub direction: Direction,
    pub response: ImageF32,
}

/// Evaluate every directional polynomial at every pixel.
pub fn evaluate_all(encoded: &EncodedMap, polynomials: &[DirectionalPolynomial]) -> Vec<ResponseMap> {
    polynomials
        .iter()
        .map(|poly| {
            let mut response = ImageF32::new(encoded.w, encoded.h);
            fill_rows(&mut response.data, encoded.w, |y, row| {
                for (out, vars) in row.iter_mut().zip(encoded.row(y)) {
                    *out = poly.response(vars);
                }
            });
            ResponseMap {
                direction: poly.direction(),
                response,
            }
        })
        .collect()
}
