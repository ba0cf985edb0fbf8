// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains helpers
//! that are shared by all tests of the crate.
//!
//! - free functions for creating raw samples and state records tersely.
//! - the `TelemetryBuilder`, which produces a stream of raw samples and
//!   state records with increasing timestamps.

use chrono::{DateTime, Utc};

use crate::{
    bounds::RawBounds,
    sample::{RawAggregatedMetricSample, RawSimpleMetricSample},
    ComponentErrorCode, ComponentStateCode, Metric, RawComponentState, RawMetricSample,
};

/// Returns a timestamp `secs` seconds after a fixed reference time.
pub(crate) fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
}

/// Creates a raw simple sample without bounds.
pub(crate) fn simple(metric: Metric, secs: i64, value: f32) -> RawMetricSample {
    RawMetricSample {
        metric,
        simple: Some(RawSimpleMetricSample {
            sampled_at: Some(ts(secs)),
            value,
            bounds: vec![],
        }),
        aggregated: None,
    }
}

/// Creates a raw aggregated sample without raw values or bounds.
pub(crate) fn aggregated(
    metric: Metric,
    secs: i64,
    avg_value: f32,
    min_value: Option<f32>,
    max_value: Option<f32>,
) -> RawMetricSample {
    RawMetricSample {
        metric,
        simple: None,
        aggregated: Some(RawAggregatedMetricSample {
            sampled_at: Some(ts(secs)),
            avg_value,
            min_value,
            max_value,
            raw_values: vec![],
            bounds: vec![],
        }),
    }
}

/// Replaces the bounds of whichever payload is set on the given sample.
pub(crate) fn with_bounds(
    mut raw: RawMetricSample,
    bounds: &[(Option<f32>, Option<f32>)],
) -> RawMetricSample {
    let bounds = bounds
        .iter()
        .map(|&(lower, upper)| RawBounds { lower, upper })
        .collect::<Vec<_>>();
    if let Some(s) = raw.simple.as_mut() {
        s.bounds = bounds.clone();
    }
    if let Some(a) = raw.aggregated.as_mut() {
        a.bounds = bounds;
    }
    raw
}

/// Creates a raw state record without warnings.
pub(crate) fn state(
    secs: i64,
    states: &[ComponentStateCode],
    errors: &[ComponentErrorCode],
) -> RawComponentState {
    RawComponentState {
        sampled_at: Some(ts(secs)),
        states: states.to_vec(),
        warnings: vec![],
        errors: errors.to_vec(),
    }
}

/// A builder for streams of raw telemetry, for use in tests.
///
/// Every added sample or state record is one second newer than the previous
/// one.
pub(crate) struct TelemetryBuilder {
    samples: Vec<RawMetricSample>,
    states: Vec<RawComponentState>,
    clock: i64,
}

impl TelemetryBuilder {
    /// Creates a new `TelemetryBuilder`.
    pub(crate) fn new() -> Self {
        Self {
            samples: Vec::new(),
            states: Vec::new(),
            clock: 0,
        }
    }

    fn tick(&mut self) -> i64 {
        self.clock += 1;
        self.clock
    }

    /// Adds a simple sample of the given metric.
    pub(crate) fn sample(&mut self, metric: Metric, value: f32) -> &mut Self {
        let secs = self.tick();
        self.samples.push(simple(metric, secs, value));
        self
    }

    /// Adds a state record with the given states and errors.
    pub(crate) fn state(
        &mut self,
        states: &[ComponentStateCode],
        errors: &[ComponentErrorCode],
    ) -> &mut Self {
        let secs = self.tick();
        self.states.push(state(secs, states, errors));
        self
    }

    /// Returns the samples and state records added so far.
    pub(crate) fn build(&self) -> (Vec<RawMetricSample>, Vec<RawComponentState>) {
        (self.samples.clone(), self.states.clone())
    }
}
