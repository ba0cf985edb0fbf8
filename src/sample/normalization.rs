// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for turning [`RawMetricSample`]s into validated [`MetricSample`]s.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{bounds::RawBounds, AggregatorConfig, Bounds, Error, Metric};

use super::{
    AggregatedMetricSample, MetricSample, MetricSampleVariant, RawAggregatedMetricSample,
    RawMetricSample, RawSimpleMetricSample, SimpleMetricSample,
};

/// Validates the given raw sample and returns it as a [`MetricSample`].
///
/// Returns an error if:
/// - none or both of the simple and aggregated payloads are set,
/// - the metric is unspecified,
/// - the timestamp is missing,
/// - any value is NaN,
/// - any of the bounds are invalid,
/// - the values of an aggregated sample are inconsistent with each other.
///
/// The ordering of samples is only checked by [`normalize_batch`].
pub fn normalize(raw: &RawMetricSample) -> Result<MetricSample, Error> {
    let metric = raw.metric;
    if metric == Metric::Unspecified {
        return Err(Error::malformed_sample("Metric not specified for sample."));
    }

    let variant = match (&raw.simple, &raw.aggregated) {
        (Some(simple), None) => MetricSampleVariant::Simple(simple_sample(metric, simple)?),
        (None, Some(aggregated)) => {
            MetricSampleVariant::Aggregated(aggregated_sample(metric, aggregated)?)
        }
        (Some(_), Some(_)) => {
            return Err(Error::malformed_sample(format!(
                "Sample for {metric} has both a simple and an aggregated value."
            )));
        }
        (None, None) => {
            return Err(Error::malformed_sample(format!(
                "Sample for {metric} has neither a simple nor an aggregated value."
            )));
        }
    };

    Ok(MetricSample::new(metric, variant))
}

/// The outcome of normalizing a batch of raw samples.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedBatch {
    /// The accepted samples, in input order.
    pub samples: Vec<MetricSample>,
    /// The input positions of the rejected samples, with the reason.
    pub rejected: Vec<(usize, Error)>,
    /// Problems that were tolerated because of the configuration.
    pub warnings: Vec<String>,
}

/// Normalizes a batch of raw samples with [`normalize`], and additionally
/// checks that the samples of each metric are not older than the previously
/// accepted sample of the same metric.
///
/// Rejected samples don't affect the remaining samples of the batch.
pub fn normalize_batch(
    raws: impl IntoIterator<Item = RawMetricSample>,
    config: &AggregatorConfig,
) -> NormalizedBatch {
    let mut normalizer = BatchNormalizer {
        config,
        latest: HashMap::new(),
        batch: NormalizedBatch::default(),
    };
    for (index, raw) in raws.into_iter().enumerate() {
        if let Err(err) = normalizer.push(&raw) {
            normalizer.batch.rejected.push((index, err));
        }
    }
    normalizer.batch
}

struct BatchNormalizer<'a> {
    config: &'a AggregatorConfig,
    latest: HashMap<Metric, DateTime<Utc>>,
    batch: NormalizedBatch,
}

impl BatchNormalizer<'_> {
    fn push(&mut self, raw: &RawMetricSample) -> Result<(), Error> {
        let sample = normalize(raw)?;
        let metric = sample.metric();
        let sampled_at = sample.sampled_at();

        match self.latest.get(&metric).copied() {
            Some(previous) if sampled_at < previous => {
                let desc = format!(
                    "Sample for {metric} at {sampled_at} is older than the previous sample at {previous}."
                );
                if !self.config.allow_out_of_order_samples {
                    return Err(Error::malformed_sample(desc));
                }
                tracing::warn!("{desc} Accepting it anyway.");
                self.batch.warnings.push(desc);
            }
            _ => {
                self.latest.insert(metric, sampled_at);
            }
        }

        self.batch.samples.push(sample);
        Ok(())
    }
}

fn simple_sample(metric: Metric, raw: &RawSimpleMetricSample) -> Result<SimpleMetricSample, Error> {
    let sampled_at = ensure_timestamp(metric, raw.sampled_at)?;
    ensure_number(metric, "value", raw.value)?;

    Ok(SimpleMetricSample {
        sampled_at,
        value: raw.value,
        bounds: validated_bounds(metric, &raw.bounds)?,
    })
}

fn aggregated_sample(
    metric: Metric,
    raw: &RawAggregatedMetricSample,
) -> Result<AggregatedMetricSample, Error> {
    let sampled_at = ensure_timestamp(metric, raw.sampled_at)?;
    ensure_number(metric, "avg_value", raw.avg_value)?;
    if let Some(min) = raw.min_value {
        ensure_number(metric, "min_value", min)?;
        if min > raw.avg_value {
            return Err(Error::malformed_sample(format!(
                "Sample for {metric} has min_value {min} greater than avg_value {}.",
                raw.avg_value
            )));
        }
    }
    if let Some(max) = raw.max_value {
        ensure_number(metric, "max_value", max)?;
        if raw.avg_value > max {
            return Err(Error::malformed_sample(format!(
                "Sample for {metric} has avg_value {} greater than max_value {max}.",
                raw.avg_value
            )));
        }
    }
    for &value in &raw.raw_values {
        ensure_number(metric, "raw_values", value)?;
        let below_min = raw.min_value.is_some_and(|min| value < min);
        let above_max = raw.max_value.is_some_and(|max| value > max);
        if below_min || above_max {
            return Err(Error::malformed_sample(format!(
                "Sample for {metric} has raw value {value} outside of [{}, {}].",
                raw.min_value.map_or("-inf".to_string(), |v| v.to_string()),
                raw.max_value.map_or("inf".to_string(), |v| v.to_string()),
            )));
        }
    }

    Ok(AggregatedMetricSample {
        sampled_at,
        avg_value: raw.avg_value,
        min_value: raw.min_value,
        max_value: raw.max_value,
        raw_values: raw.raw_values.clone(),
        bounds: validated_bounds(metric, &raw.bounds)?,
    })
}

fn ensure_timestamp(
    metric: Metric,
    sampled_at: Option<DateTime<Utc>>,
) -> Result<DateTime<Utc>, Error> {
    sampled_at
        .ok_or_else(|| Error::malformed_sample(format!("Sample for {metric} has no timestamp.")))
}

fn ensure_number(metric: Metric, field: &str, value: f32) -> Result<(), Error> {
    if value.is_nan() {
        return Err(Error::nan_value(format!(
            "Sample for {metric} has a NaN {field}."
        )));
    }
    Ok(())
}

fn validated_bounds(metric: Metric, raw: &[RawBounds]) -> Result<Vec<Bounds>, Error> {
    raw.iter()
        .map(|b| {
            Bounds::try_from(*b)
                .map_err(|e| e.with_prefix(format!("Sample for {metric} has invalid bounds: ")))
        })
        .collect()
}
