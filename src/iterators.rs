// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Iterators over the contents of a [`ComponentData`][crate::ComponentData].

use crate::{Metric, MetricSample};

/// An iterator over the samples of a single metric in a `ComponentData`.
pub struct MetricSamples<'a> {
    pub(crate) metric: Metric,
    pub(crate) iter: std::slice::Iter<'a, MetricSample>,
}

impl<'a> Iterator for MetricSamples<'a> {
    type Item = &'a MetricSample;

    fn next(&mut self) -> Option<Self::Item> {
        let metric = self.metric;
        self.iter.by_ref().find(|s| s.metric() == metric)
    }
}
