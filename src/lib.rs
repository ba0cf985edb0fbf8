// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Frequenz Microgrid Component Data

This is a library for validating and aggregating the telemetry of microgrid
components: metric samples with their bounds, and the states and errors the
components report.

## Raw inputs

The library doesn't know about the types generated from the microgrid API
definitions.  Instead, telemetry has to be converted into the plain raw types
[`RawMetricSample`] and [`RawComponentState`], whose fields mirror the API
messages.  All validation happens when these are turned into the validated
types, which can't be constructed in an invalid state.

## Bounds

[`satisfies`] checks a value against a list of [`Bounds`].  The list is a
union: a value is allowed if it is inside any of the bounds, so that gaps
between bounds act as disallowed zones.  NaN never satisfies any bounds.

## Normalization

[`normalize`] turns a [`RawMetricSample`] into a [`MetricSample`], checking
that:

- exactly one of the simple and aggregated payloads is set,
- the sample has a timestamp,
- the values aren't NaN and the bounds are valid,
- the minimum, average, maximum and raw values of aggregated samples are
  consistent.

[`normalize_batch`] additionally rejects samples that are older than the
previous sample of the same metric in the batch.

## Aggregation

[`aggregate`] combines the metric samples and state records of a component
into a [`ComponentData`] snapshot.  Invalid records are rejected one by one,
and reported next to the snapshot built from the valid ones.  State records
with error codes must have the `Error` state, unless the aggregator is
configured to be [`lenient`][AggregatorConfig::lenient].

## Pagination

[`paginate`] returns pages of any ordered result sequence, with opaque page
tokens for resuming from where the previous page ended.  A [`Paginator`]
signs the tokens with a caller provided key.

```
use frequenz_microgrid_component_data::{paginate, PaginationParams};

let items = [1, 2, 3, 4, 5];
let (page, info) = paginate(&items, &PaginationParams::first_page(2)).unwrap();
assert_eq!(page, &[1, 2]);

let token = info.next_page_token.unwrap();
let (page, _) = paginate(&items, &PaginationParams::next_page(token)).unwrap();
assert_eq!(page, &[3, 4]);
```
*/

mod bounds;
pub use bounds::{satisfies, Bounds, RawBounds};

mod metric;
pub use metric::Metric;

mod component_state;
pub use component_state::{
    ComponentErrorCode, ComponentState, ComponentStateCode, RawComponentState,
};

mod sample;
pub use sample::{
    normalize, normalize_batch, AggregatedMetricSample, MetricSample, MetricSampleVariant,
    NormalizedBatch, RawAggregatedMetricSample, RawMetricSample, RawSimpleMetricSample,
    SimpleMetricSample,
};

mod aggregation;
pub use aggregation::{aggregate, Aggregation, ComponentData, RecordSource, Rejection};

mod pagination;
pub use pagination::{paginate, PaginationInfo, PaginationParams, Paginator, DEFAULT_PAGE_SIZE};

pub mod iterators;

mod config;
pub use config::AggregatorConfig;

mod error;
pub use error::{Error, ErrorKind};

#[cfg(test)]
mod test_utils;
