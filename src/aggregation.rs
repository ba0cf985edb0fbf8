// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Aggregation of metric samples and state records of a component into a
//! [`ComponentData`] snapshot.

mod states;

use crate::iterators::MetricSamples;
use crate::sample::{normalize_batch, MetricSample, RawMetricSample};
use crate::{AggregatorConfig, ComponentState, Error, Metric, RawComponentState};

use states::StateAggregator;

/// A snapshot of the metric samples and states of a component.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentData {
    component_id: u64,
    metric_samples: Vec<MetricSample>,
    states: Vec<ComponentState>,
}

impl ComponentData {
    /// Returns the ID of the component the data belongs to.
    pub fn component_id(&self) -> u64 {
        self.component_id
    }

    /// Returns the metric samples, in the order they were received.
    pub fn metric_samples(&self) -> &[MetricSample] {
        &self.metric_samples
    }

    /// Returns the state records, in chronological order.
    pub fn states(&self) -> &[ComponentState] {
        &self.states
    }

    /// Returns an iterator over the samples of the given metric.
    pub fn samples(&self, metric: Metric) -> MetricSamples<'_> {
        MetricSamples {
            metric,
            iter: self.metric_samples.iter(),
        }
    }

    /// Returns the most recent state record, if any.
    pub fn latest_state(&self) -> Option<&ComponentState> {
        self.states.last()
    }

    /// Returns true if the most recent state record signals an error.
    pub fn has_errors(&self) -> bool {
        self.latest_state().is_some_and(|s| s.has_error_state())
    }
}

/// The kind of input record a [`Rejection`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordSource {
    MetricSample,
    ComponentState,
}

/// An input record that was left out of the aggregated [`ComponentData`].
#[derive(Clone, Debug, PartialEq)]
pub struct Rejection {
    /// Which of the inputs the record was part of.
    pub source: RecordSource,
    /// The position of the record in its input.
    pub index: usize,
    /// Why the record was rejected.
    pub error: Error,
}

/// The outcome of [`aggregate`].
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregation {
    /// The data built from all the valid records.
    pub data: ComponentData,
    /// The records that were rejected.
    pub rejected: Vec<Rejection>,
    /// Problems that were tolerated because of the configuration.
    pub warnings: Vec<String>,
}

impl Aggregation {
    /// Returns the aggregated data if no record was rejected, and the error
    /// of the first rejected record otherwise.
    pub fn into_result(self) -> Result<ComponentData, Error> {
        match self.rejected.into_iter().next() {
            Some(rejection) => Err(rejection.error),
            None => Ok(self.data),
        }
    }
}

/// Normalizes the given metric samples and validates the given state records
/// of a component, and combines them into a [`ComponentData`] snapshot.
///
/// Invalid records are reported in [`Aggregation::rejected`] and don't affect
/// the valid ones.
///
/// State records:
/// - have their states, warnings and errors deduplicated,
/// - must have the `Error` state if they have errors, unless
///   [`lenient`][AggregatorConfig::lenient] is set,
/// - are sorted by `sampled_at`, with exact duplicates dropped and
///   conflicting records for the same timestamp rejected.
pub fn aggregate(
    component_id: u64,
    metric_samples: impl IntoIterator<Item = RawMetricSample>,
    state_records: impl IntoIterator<Item = RawComponentState>,
    config: &AggregatorConfig,
) -> Aggregation {
    let batch = normalize_batch(metric_samples, config);
    let mut rejected = batch
        .rejected
        .into_iter()
        .map(|(index, error)| Rejection {
            source: RecordSource::MetricSample,
            index,
            error,
        })
        .collect::<Vec<_>>();
    let mut warnings = batch.warnings;

    let mut state_aggregator = StateAggregator::new(config);
    for (index, raw) in state_records.into_iter().enumerate() {
        state_aggregator.push(index, &raw);
    }
    let states = state_aggregator.finish();
    rejected.extend(states.rejected.into_iter().map(|(index, error)| Rejection {
        source: RecordSource::ComponentState,
        index,
        error,
    }));
    warnings.extend(states.warnings);

    Aggregation {
        data: ComponentData {
            component_id,
            metric_samples: batch.samples,
            states: states.states,
        },
        rejected,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{simple, state, ts, TelemetryBuilder};
    use crate::{ComponentErrorCode as E, ComponentStateCode as S, ErrorKind};

    #[test]
    fn test_chronological_states() -> Result<(), Error> {
        let config = AggregatorConfig::default();
        let records = vec![
            state(20, &[S::Error], &[E::BatteryRelayError]),
            state(10, &[S::Charging], &[]),
        ];

        let data = aggregate(1, vec![], records, &config).into_result()?;

        assert_eq!(data.component_id(), 1);
        assert_eq!(
            data.states()
                .iter()
                .map(|s| s.sampled_at())
                .collect::<Vec<_>>(),
            vec![ts(10), ts(20)]
        );
        assert!(data.states()[0].states().iter().eq(&[S::Charging]));
        assert!(data.states()[0].errors().is_empty());
        assert!(data.states()[1].states().iter().eq(&[S::Error]));
        assert!(data.states()[1].errors().iter().eq(&[E::BatteryRelayError]));
        assert!(data.has_errors());

        Ok(())
    }

    #[test]
    fn test_errors_without_error_state() {
        let records = vec![state(1, &[S::Ready], &[E::BatteryRelayError])];

        let strict = aggregate(1, vec![], records.clone(), &AggregatorConfig::default());
        assert!(strict.data.states().is_empty());
        assert_eq!(strict.rejected.len(), 1);
        assert_eq!(strict.rejected[0].source, RecordSource::ComponentState);
        assert_eq!(strict.rejected[0].index, 0);
        assert_eq!(strict.rejected[0].error.kind(), ErrorKind::InvariantViolation);
        assert!(strict
            .into_result()
            .is_err_and(|e| e.kind() == ErrorKind::InvariantViolation));

        let config = AggregatorConfig {
            lenient: true,
            ..Default::default()
        };
        let lenient = aggregate(1, vec![], records, &config);
        assert!(lenient.rejected.is_empty());
        assert_eq!(lenient.data.states().len(), 1);
        assert_eq!(lenient.warnings.len(), 1);
        assert!(!lenient.data.has_errors());
    }

    #[test]
    fn test_partial_batch() {
        let config = AggregatorConfig::default();
        let (mut samples, mut records) = TelemetryBuilder::new()
            .sample(Metric::DcPower, 100.0)
            .state(&[S::Ready], &[])
            .sample(Metric::DcPower, 200.0)
            .state(&[S::Standby], &[E::Overcurrent])
            .state(&[S::Charging], &[])
            .build();
        samples.push(simple(Metric::Unspecified, 99, 1.0));
        records.push(state(99, &[S::Unspecified], &[]));

        let aggregation = aggregate(7, samples, records, &config);

        assert_eq!(aggregation.data.metric_samples().len(), 2);
        assert_eq!(aggregation.data.states().len(), 2);
        assert_eq!(
            aggregation
                .rejected
                .iter()
                .map(|r| (r.source, r.index, r.error.kind()))
                .collect::<Vec<_>>(),
            vec![
                (RecordSource::MetricSample, 2, ErrorKind::MalformedSample),
                (RecordSource::ComponentState, 1, ErrorKind::InvariantViolation),
                (RecordSource::ComponentState, 3, ErrorKind::MalformedSample),
            ]
        );
        assert!(aggregation
            .data
            .latest_state()
            .is_some_and(|s| s.states().contains(&S::Charging)));
    }

    #[test]
    fn test_samples_by_metric() -> Result<(), Error> {
        let config = AggregatorConfig::default();
        let (samples, records) = TelemetryBuilder::new()
            .sample(Metric::DcPower, 1.0)
            .sample(Metric::DcVoltage, 400.0)
            .sample(Metric::DcPower, 2.0)
            .build();

        let data = aggregate(3, samples, records, &config).into_result()?;

        assert_eq!(data.metric_samples().len(), 3);
        assert!(data
            .samples(Metric::DcPower)
            .map(|s| s.variant().primary_value())
            .eq([1.0, 2.0]));
        assert_eq!(data.samples(Metric::AcFrequency).count(), 0);
        assert!(data.latest_state().is_none());
        assert!(!data.has_errors());

        Ok(())
    }

    #[test]
    fn test_outputs_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<ComponentData>();
        assert_send_sync::<Aggregation>();
        assert_send_sync::<MetricSample>();
        assert_send_sync::<AggregatorConfig>();
        assert_send_sync::<crate::Paginator>();
    }
}
