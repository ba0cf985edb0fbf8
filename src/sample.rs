// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Metric samples, in their raw form as received from a telemetry source, and
//! in their normalized form.

mod normalization;
pub use normalization::{normalize, normalize_batch, NormalizedBatch};

use chrono::{DateTime, Utc};

use crate::{bounds::RawBounds, satisfies, Bounds, Metric};

/// A single instantaneous reading, as received from a telemetry source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSimpleMetricSample {
    pub sampled_at: Option<DateTime<Utc>>,
    pub value: f32,
    pub bounds: Vec<RawBounds>,
}

/// A reading aggregated over a period, as received from a telemetry source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawAggregatedMetricSample {
    pub sampled_at: Option<DateTime<Utc>>,
    pub avg_value: f32,
    pub min_value: Option<f32>,
    pub max_value: Option<f32>,
    pub raw_values: Vec<f32>,
    pub bounds: Vec<RawBounds>,
}

/// A metric sample as received from a telemetry source.
///
/// Exactly one of `simple` and `aggregated` is expected to be set.  This is
/// checked by [`normalize`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMetricSample {
    pub metric: Metric,
    pub simple: Option<RawSimpleMetricSample>,
    pub aggregated: Option<RawAggregatedMetricSample>,
}

/// A validated instantaneous reading.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleMetricSample {
    sampled_at: DateTime<Utc>,
    value: f32,
    bounds: Vec<Bounds>,
}

impl SimpleMetricSample {
    /// Returns the time at which the value was sampled.
    pub fn sampled_at(&self) -> DateTime<Utc> {
        self.sampled_at
    }

    /// Returns the sampled value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Returns the bounds that were in effect when the value was sampled.
    pub fn bounds(&self) -> &[Bounds] {
        &self.bounds
    }
}

/// A validated aggregated reading.
///
/// When present, `min_value <= avg_value <= max_value`, and all raw values
/// are between `min_value` and `max_value`.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedMetricSample {
    sampled_at: DateTime<Utc>,
    avg_value: f32,
    min_value: Option<f32>,
    max_value: Option<f32>,
    raw_values: Vec<f32>,
    bounds: Vec<Bounds>,
}

impl AggregatedMetricSample {
    /// Returns the time at which the values were aggregated.
    pub fn sampled_at(&self) -> DateTime<Utc> {
        self.sampled_at
    }

    /// Returns the average of the values over the aggregation period.
    pub fn avg_value(&self) -> f32 {
        self.avg_value
    }

    /// Returns the smallest value over the aggregation period, if known.
    pub fn min_value(&self) -> Option<f32> {
        self.min_value
    }

    /// Returns the largest value over the aggregation period, if known.
    pub fn max_value(&self) -> Option<f32> {
        self.max_value
    }

    /// Returns the values the aggregation was calculated from, if the source
    /// provided them.
    pub fn raw_values(&self) -> &[f32] {
        &self.raw_values
    }

    /// Returns the bounds that were in effect when the values were sampled.
    pub fn bounds(&self) -> &[Bounds] {
        &self.bounds
    }
}

/// Either a simple or an aggregated sample.
#[derive(Clone, Debug, PartialEq)]
pub enum MetricSampleVariant {
    Simple(SimpleMetricSample),
    Aggregated(AggregatedMetricSample),
}

impl MetricSampleVariant {
    /// Returns the time at which the sample was taken.
    pub fn sampled_at(&self) -> DateTime<Utc> {
        match self {
            Self::Simple(s) => s.sampled_at,
            Self::Aggregated(a) => a.sampled_at,
        }
    }

    /// Returns the value that is checked against the bounds: the value of a
    /// simple sample, or the average of an aggregated sample.
    pub fn primary_value(&self) -> f32 {
        match self {
            Self::Simple(s) => s.value,
            Self::Aggregated(a) => a.avg_value,
        }
    }

    /// Returns the bounds of the sample, whichever variant it is.
    pub fn bounds(&self) -> &[Bounds] {
        match self {
            Self::Simple(s) => &s.bounds,
            Self::Aggregated(a) => &a.bounds,
        }
    }
}

/// A normalized metric sample.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricSample {
    metric: Metric,
    variant: MetricSampleVariant,
    within_bounds: bool,
}

impl MetricSample {
    pub(crate) fn new(metric: Metric, variant: MetricSampleVariant) -> Self {
        let within_bounds = satisfies(variant.primary_value(), variant.bounds());
        Self {
            metric,
            variant,
            within_bounds,
        }
    }

    /// Returns the metric that was sampled.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the sample.
    pub fn variant(&self) -> &MetricSampleVariant {
        &self.variant
    }

    /// Returns the time at which the sample was taken.
    pub fn sampled_at(&self) -> DateTime<Utc> {
        self.variant.sampled_at()
    }

    /// Returns true if the primary value of the sample satisfies its bounds.
    pub fn within_bounds(&self) -> bool {
        self.within_bounds
    }
}
