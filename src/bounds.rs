// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Bounds` struct and the [`satisfies`] function,
//! which checks a value against a set of allowed ranges.

use std::fmt::Display;

use crate::Error;

/// Bounds as received from a telemetry source, before validation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawBounds {
    pub lower: Option<f32>,
    pub upper: Option<f32>,
}

/// A range of allowed values for a metric.
///
/// Either side may be missing, in which case the range is unbounded on that
/// side.  Bounds without either side don't constrain the value at all.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    lower: Option<f32>,
    upper: Option<f32>,
}

impl Bounds {
    /// Creates new [`Bounds`].
    ///
    /// Returns an error if either side is NaN, or if `lower` is greater than
    /// `upper`.
    pub fn try_new(lower: Option<f32>, upper: Option<f32>) -> Result<Self, Error> {
        for side in [lower, upper].into_iter().flatten() {
            if side.is_nan() {
                return Err(Error::nan_value(format!(
                    "Bounds can't have NaN limits. Found lower: {lower:?}, upper: {upper:?}."
                )));
            }
        }
        if let (Some(l), Some(u)) = (lower, upper) {
            if l > u {
                return Err(Error::invalid_bounds(format!(
                    "Lower bound {l} is greater than upper bound {u}."
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    /// Creates [`Bounds`] that don't constrain the value.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Returns the lower bound, if any.
    pub fn lower(&self) -> Option<f32> {
        self.lower
    }

    /// Returns the upper bound, if any.
    pub fn upper(&self) -> Option<f32> {
        self.upper
    }

    /// Returns true if the value is inside the bounds.  NaN is never inside.
    pub fn contains(&self, value: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        self.lower.map_or(true, |l| value >= l) && self.upper.map_or(true, |u| value <= u)
    }
}

impl TryFrom<RawBounds> for Bounds {
    type Error = Error;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Self::try_new(raw.lower, raw.upper)
    }
}

impl Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.lower {
            Some(l) => write!(f, "[{l}, ")?,
            None => write!(f, "[-inf, ")?,
        }
        match self.upper {
            Some(u) => write!(f, "{u}]"),
            None => write!(f, "inf]"),
        }
    }
}

/// Returns true if `value` is within any of the given `bounds`.
///
/// The bounds are treated as a union: gaps between them are disallowed
/// zones.  An empty list of bounds allows every value except NaN, which never
/// satisfies any bounds.
pub fn satisfies(value: f32, bounds: &[Bounds]) -> bool {
    if value.is_nan() {
        return false;
    }
    bounds.is_empty() || bounds.iter().any(|b| b.contains(value))
}
