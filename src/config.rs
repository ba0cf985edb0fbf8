// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for the aggregator.

/// Configuration options for [`aggregate`][crate::aggregate] and
/// [`normalize_batch`][crate::normalize_batch].
#[derive(Clone, Default, Debug)]
pub struct AggregatorConfig {
    /// Whether to accept state records that carry error codes without the
    /// `Error` state.  When this is `true`, such records are kept and a
    /// warning is logged and reported instead of rejecting them.
    pub lenient: bool,

    /// Whether to accept metric samples that are older than the previous
    /// sample of the same metric in a batch.  When this is `true`, they are
    /// kept and a warning is logged and reported.
    pub allow_out_of_order_samples: bool,
}
