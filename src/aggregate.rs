//! Combination of directional responses into a per-pixel edge magnitude.
//!
//! Besides the magnitude, the aggregator records the locally dominant
//! direction (largest absolute response, earliest configured direction on
//! ties). Non-maximum suppression uses it to pick comparison neighbours.
use crate::direction::Direction;
use crate::image::ImageF32;
use crate::parallel::fill_rows;
use crate::polynomial::ResponseMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationRule {
    /// Largest absolute directional response.
    Max,
    /// Euclidean norm of the directional responses.
    #[default]
    L2,
    /// Sum of absolute directional responses.
    SumAbs,
}

impl AggregationRule {
    /// Combine the responses of one pixel. The result is never negative.
    pub fn combine(self, responses: impl IntoIterator<Item = f32>) -> f32 {
        let values = responses.into_iter().map(|r| r as f64);
        let combined = match self {
            AggregationRule::Max => values.fold(0.0, |acc: f64, r| acc.max(r.abs())),
            AggregationRule::L2 => values.map(|r| r * r).sum::<f64>().sqrt(),
            AggregationRule::SumAbs => values.map(f64::abs).sum(),
        };
        combined as f32
    }
}

/// Edge magnitude per pixel plus the direction that dominated it.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeMagnitudeMap {
    pub magnitude: ImageF32,
    dominant: Vec<Option<Direction>>,
}

impl EdgeMagnitudeMap {
    #[inline]
    pub fn width(&self) -> usize {
        self.magnitude.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.magnitude.h
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.magnitude.get(x, y)
    }

    /// Dominant direction at `(x, y)`; `None` where every response is zero.
    #[inline]
    pub fn dominant(&self, x: usize, y: usize) -> Option<Direction> {
        self.dominant[y * self.magnitude.w + x]
    }

    /// Largest magnitude in the map (0 for an empty map).
    pub fn max(&self) -> f32 {
        self.magnitude.data.iter().copied().fold(0.0, f32::max)
    }
}

/// Combine per-direction response maps with `rule`.
///
/// All maps must share one shape; an empty slice yields an empty map.
pub fn aggregate(responses: &[ResponseMap], rule: AggregationRule) -> EdgeMagnitudeMap {
    let (w, h) = responses
        .first()
        .map(|r| (r.response.w, r.response.h))
        .unwrap_or((0, 0));
    debug_assert!(responses
        .iter()
        .all(|r| r.response.w == w && r.response.h == h));

    let mut cells: Vec<(f32, Option<Direction>)> = vec![(0.0, None); w * h];
    fill_rows(&mut cells, w, |y, row| {
        let start = y * w;
        for (x, cell) in row.iter_mut().enumerate() {
            let idx = start + x;
            let magnitude = rule.combine(responses.iter().map(|r| r.response.data[idx]));
            let mut dominant = None;
            let mut best = 0.0f32;
            for r in responses {
                let a = r.response.data[idx].abs();
                if a > best {
                    best = a;
                    dominant = Some(r.direction);
                }
            }
            *cell = (magnitude, dominant);
        }
    });

    let (data, dominant): (Vec<f32>, Vec<Option<Direction>>) = cells.into_iter().unzip();
    EdgeMagnitudeMap {
        magnitude: ImageF32 {
            w,
            h,
            stride: w,
            data,
        },
        dominant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(direction: Direction, values: &[f32]) -> ResponseMap {
        ResponseMap {
            direction,
            response: ImageF32::from_vec(values.len(), 1, values.to_vec()).unwrap(),
        }
    }

    #[test]
    fn combination_rules() {
        let r = [3.0f32, -4.0];
        assert_eq!(AggregationRule::Max.combine(r), 4.0);
        assert_eq!(AggregationRule::L2.combine(r), 5.0);
        assert_eq!(AggregationRule::SumAbs.combine(r), 7.0);
        for rule in [AggregationRule::Max, AggregationRule::L2, AggregationRule::SumAbs] {
            assert_eq!(rule.combine(std::iter::empty()), 0.0);
            assert!(rule.combine([-1.0, -2.0]) >= 0.0);
        }
    }

    #[test]
    fn aggregate_tracks_dominant_direction() {
        let maps = [
            response(Direction::Horizontal, &[0.0, 2.0, -1.0, 1.0]),
            response(Direction::Vertical, &[0.0, 1.0, -3.0, -1.0]),
        ];
        let agg = aggregate(&maps, AggregationRule::Max);
        assert_eq!(agg.magnitude.data, vec![0.0, 2.0, 3.0, 1.0]);
        assert_eq!(agg.dominant(0, 0), None);
        assert_eq!(agg.dominant(1, 0), Some(Direction::Horizontal));
        assert_eq!(agg.dominant(2, 0), Some(Direction::Vertical));
        // ties keep the first configured direction
        assert_eq!(agg.dominant(3, 0), Some(Direction::Horizontal));
        assert_eq!(agg.max(), 3.0);
    }
}
