// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Validation, deduplication and ordering of component state records.

use std::fmt::Display;

use crate::{
    AggregatorConfig, ComponentErrorCode, ComponentState, ComponentStateCode, Error,
    RawComponentState,
};

pub(super) struct StateAggregator<'a> {
    config: &'a AggregatorConfig,
    accepted: Vec<Accepted>,
    rejected: Vec<(usize, Error)>,
}

/// A record that passed validation, with the warning to report if it ends up
/// in the snapshot.
struct Accepted {
    index: usize,
    state: ComponentState,
    warning: Option<String>,
}

/// The state records of a batch, after validation.
pub(super) struct AggregatedStates {
    pub(super) states: Vec<ComponentState>,
    pub(super) rejected: Vec<(usize, Error)>,
    pub(super) warnings: Vec<String>,
}

impl<'a> StateAggregator<'a> {
    pub(super) fn new(config: &'a AggregatorConfig) -> Self {
        Self {
            config,
            accepted: vec![],
            rejected: vec![],
        }
    }

    /// Validates the given raw record and keeps it, or records why it was
    /// rejected.
    pub(super) fn push(&mut self, index: usize, raw: &RawComponentState) {
        match self.validate(raw) {
            Ok((state, warning)) => self.accepted.push(Accepted {
                index,
                state,
                warning,
            }),
            Err(err) => self.rejected.push((index, err)),
        }
    }

    /// Returns the accepted records sorted by `sampled_at`.
    ///
    /// Records that are exact duplicates of a previous record are dropped,
    /// and records that have the same `sampled_at` as a previous record but
    /// different contents are rejected.  Only the kept records contribute
    /// warnings, and rejections are ordered by input position.
    pub(super) fn finish(mut self) -> AggregatedStates {
        self.accepted.sort_by(|a, b| {
            a.state
                .sampled_at
                .cmp(&b.state.sampled_at)
                .then(a.index.cmp(&b.index))
        });

        let mut states: Vec<ComponentState> = Vec::with_capacity(self.accepted.len());
        let mut warnings = vec![];
        for Accepted {
            index,
            state,
            warning,
        } in self.accepted
        {
            let same_as_previous = states
                .last()
                .filter(|previous| previous.sampled_at == state.sampled_at)
                .map(|previous| *previous == state);
            match same_as_previous {
                None => {
                    if let Some(warning) = warning {
                        tracing::warn!("{warning} Accepting it because lenient mode is enabled.");
                        warnings.push(warning);
                    }
                    states.push(state);
                }
                Some(true) => {
                    tracing::debug!("Dropping duplicate state record at {}.", state.sampled_at);
                }
                Some(false) => {
                    self.rejected.push((
                        index,
                        Error::invariant_violation(format!(
                            "State record at {} conflicts with another record with the same timestamp.",
                            state.sampled_at
                        )),
                    ));
                }
            }
        }

        self.rejected.sort_by_key(|(index, _)| *index);

        AggregatedStates {
            states,
            rejected: self.rejected,
            warnings,
        }
    }

    fn validate(
        &self,
        raw: &RawComponentState,
    ) -> Result<(ComponentState, Option<String>), Error> {
        let Some(sampled_at) = raw.sampled_at else {
            return Err(Error::malformed_sample("State record has no timestamp."));
        };
        if raw.states.contains(&ComponentStateCode::Unspecified) {
            return Err(Error::malformed_sample(format!(
                "State record at {sampled_at} has an unspecified state."
            )));
        }
        if raw
            .warnings
            .iter()
            .chain(raw.errors.iter())
            .any(|c| *c == ComponentErrorCode::Unspecified)
        {
            return Err(Error::malformed_sample(format!(
                "State record at {sampled_at} has an unspecified error code."
            )));
        }

        let state = ComponentState {
            sampled_at,
            states: raw.states.iter().copied().collect(),
            warnings: raw.warnings.iter().copied().collect(),
            errors: raw.errors.iter().copied().collect(),
        };

        let mut warning = None;
        if !state.errors.is_empty() && !state.has_error_state() {
            let desc = format!(
                "State record at {sampled_at} has errors [{}] without an Error state. Found states: [{}].",
                join(&state.errors),
                join(&state.states),
            );
            if !self.config.lenient {
                return Err(Error::invariant_violation(desc));
            }
            warning = Some(desc);
        }

        Ok((state, warning))
    }
}

fn join<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
