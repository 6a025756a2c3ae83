//! Stage timings and a named registry of timing samples.
//!
//! [`TimingBreakdown`] travels with every detection result. [`Timers`]
//! accumulates samples across runs (e.g. a parameter sweep over a directory)
//! and answers summary statistics per name. [`Timer`] is a stopwatch that
//! logs its elapsed time when stopped.
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Timing entry describing a single stage of the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one pipeline run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Elapsed time of the first stage with `label`.
    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

/// Named collections of timing samples (milliseconds).
#[derive(Clone, Debug, Default)]
pub struct Timers {
    samples: BTreeMap<String, Vec<f64>>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample under `name`.
    pub fn add(&mut self, name: impl Into<String>, elapsed_ms: f64) {
        self.samples.entry(name.into()).or_default().push(elapsed_ms);
    }

    /// Record every stage of a breakdown plus its total under `"total"`.
    pub fn record(&mut self, breakdown: &TimingBreakdown) {
        for stage in &breakdown.stages {
            self.add(stage.label.clone(), stage.elapsed_ms);
        }
        self.add("total", breakdown.total_ms);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    fn get(&self, name: &str) -> Option<&[f64]> {
        self.samples.get(name).map(Vec::as_slice)
    }

    pub fn count(&self, name: &str) -> Option<usize> {
        self.get(name).map(<[f64]>::len)
    }

    pub fn total(&self, name: &str) -> Option<f64> {
        self.get(name).map(|v| v.iter().sum())
    }

    pub fn min(&self, name: &str) -> Option<f64> {
        self.get(name).map(|v| v.iter().copied().fold(f64::INFINITY, f64::min))
    }

    pub fn max(&self, name: &str) -> Option<f64> {
        self.get(name)
            .map(|v| v.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    pub fn mean(&self, name: &str) -> Option<f64> {
        self.get(name).map(|v| v.iter().sum::<f64>() / v.len() as f64)
    }

    pub fn median(&self, name: &str) -> Option<f64> {
        self.get(name).map(|v| {
            let mut sorted = v.to_vec();
            sorted.sort_by(f64::total_cmp);
            let mid = sorted.len() / 2;
            if sorted.len() % 2 == 0 {
                0.5 * (sorted[mid - 1] + sorted[mid])
            } else {
                sorted[mid]
            }
        })
    }

    /// Sample standard deviation; NaN with fewer than two samples.
    pub fn stdev(&self, name: &str) -> Option<f64> {
        self.get(name).map(|v| {
            if v.len() < 2 {
                return f64::NAN;
            }
            let mean = v.iter().sum::<f64>() / v.len() as f64;
            let var = v.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (v.len() - 1) as f64;
            var.sqrt()
        })
    }
}

/// Stopwatch started on construction.
#[derive(Debug)]
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Stop and log the elapsed time at debug level.
    pub fn stop(self) -> f64 {
        let elapsed_ms = self.elapsed_ms();
        debug!("{}: {:.3} ms", self.name, elapsed_ms);
        elapsed_ms
    }

    /// Stop, log, and record the sample in `timers` under the timer's name.
    pub fn stop_into(self, timers: &mut Timers) -> f64 {
        let name = self.name.clone();
        let elapsed_ms = self.stop();
        timers.add(name, elapsed_ms);
        elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_summarise_samples() {
        let mut timers = Timers::new();
        for v in [4.0, 1.0, 3.0, 2.0] {
            timers.add("encode", v);
        }
        assert_eq!(timers.count("encode"), Some(4));
        assert_eq!(timers.total("encode"), Some(10.0));
        assert_eq!(timers.min("encode"), Some(1.0));
        assert_eq!(timers.max("encode"), Some(4.0));
        assert_eq!(timers.mean("encode"), Some(2.5));
        assert_eq!(timers.median("encode"), Some(2.5));
        let sd = timers.stdev("encode").unwrap();
        assert!((sd - 1.290_994_4).abs() < 1e-6);
        assert_eq!(timers.count("missing"), None);
    }

    #[test]
    fn stdev_needs_two_samples() {
        let mut timers = Timers::new();
        timers.add("one", 1.0);
        assert!(timers.stdev("one").unwrap().is_nan());
        timers.clear();
        assert_eq!(timers.names().count(), 0);
    }

    #[test]
    fn record_breakdown_and_timer() {
        let mut breakdown = TimingBreakdown::with_total(3.0);
        breakdown.push("sample", 1.0);
        breakdown.push("encode", 2.0);
        assert_eq!(breakdown.stage_ms("encode"), Some(2.0));

        let mut timers = Timers::new();
        timers.record(&breakdown);
        timers.record(&breakdown);
        assert_eq!(timers.count("sample"), Some(2));
        assert_eq!(timers.total("total"), Some(6.0));

        let elapsed = Timer::start("sweep").stop_into(&mut timers);
        assert!(elapsed >= 0.0);
        assert_eq!(timers.count("sweep"), Some(1));
    }
}
