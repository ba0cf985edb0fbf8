// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `ComponentStateCode` and `ComponentErrorCode`
//! enums, and the `ComponentState` record that groups them for a point in
//! time.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Represents an operational state of a component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentStateCode {
    #[default]
    Unspecified,
    Unknown,
    Unavailable,
    SwitchingOff,
    Off,
    SwitchingOn,
    Standby,
    Ready,
    Charging,
    Discharging,
    Error,
    EvChargingCableUnplugged,
    EvChargingCablePluggedAtStation,
    EvChargingCablePluggedAtEv,
    EvChargingCableLockedAtStation,
    EvChargingCableLockedAtEv,
    RelayOpen,
    RelayClosed,
    PrechargerOpen,
    PrechargerPrecharging,
    PrechargerClosed,
}

impl ComponentStateCode {
    /// Returns true if the state signals an error condition, which is a
    /// requirement for a state record to carry error codes.
    pub fn is_error(&self) -> bool {
        *self == ComponentStateCode::Error
    }
}

impl Display for ComponentStateCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComponentStateCode::Unspecified => "Unspecified",
            ComponentStateCode::Unknown => "Unknown",
            ComponentStateCode::Unavailable => "Unavailable",
            ComponentStateCode::SwitchingOff => "SwitchingOff",
            ComponentStateCode::Off => "Off",
            ComponentStateCode::SwitchingOn => "SwitchingOn",
            ComponentStateCode::Standby => "Standby",
            ComponentStateCode::Ready => "Ready",
            ComponentStateCode::Charging => "Charging",
            ComponentStateCode::Discharging => "Discharging",
            ComponentStateCode::Error => "Error",
            ComponentStateCode::EvChargingCableUnplugged => "EvChargingCableUnplugged",
            ComponentStateCode::EvChargingCablePluggedAtStation => {
                "EvChargingCablePluggedAtStation"
            }
            ComponentStateCode::EvChargingCablePluggedAtEv => "EvChargingCablePluggedAtEv",
            ComponentStateCode::EvChargingCableLockedAtStation => "EvChargingCableLockedAtStation",
            ComponentStateCode::EvChargingCableLockedAtEv => "EvChargingCableLockedAtEv",
            ComponentStateCode::RelayOpen => "RelayOpen",
            ComponentStateCode::RelayClosed => "RelayClosed",
            ComponentStateCode::PrechargerOpen => "PrechargerOpen",
            ComponentStateCode::PrechargerPrecharging => "PrechargerPrecharging",
            ComponentStateCode::PrechargerClosed => "PrechargerClosed",
        };
        write!(f, "{name}")
    }
}

/// Represents an error or warning code reported by a component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentErrorCode {
    #[default]
    Unspecified,
    Unknown,
    SwitchOnFault,
    Undervoltage,
    Overvoltage,
    Overcurrent,
    OvercurrentCharging,
    OvercurrentDischarging,
    Overtemperature,
    Undertemperature,
    HighHumidity,
    FuseError,
    PrechargeError,
    PlausibilityError,
    UndervoltageShutdown,
    EvUnexpectedPilotFailure,
    FaultCurrent,
    ShortCircuit,
    ConfigError,
    IllegalComponentStateCodeRequested,
    HardwareInaccessible,
    Internal,
    Overload,
    EvChargingCableUnpluggedFromStation,
    EvChargingCableUnpluggedFromEv,
    EvChargingCableLockFailed,
    EvChargingCableInvalid,
    EvConsumerIncompatible,
    BatteryImbalance,
    BatteryLowSoh,
    BatteryBlockError,
    BatteryControllerError,
    BatteryRelayError,
    BatteryCalibrationNeeded,
    RelayCycleLimitReached,
}

impl Display for ComponentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComponentErrorCode::Unspecified => "Unspecified",
            ComponentErrorCode::Unknown => "Unknown",
            ComponentErrorCode::SwitchOnFault => "SwitchOnFault",
            ComponentErrorCode::Undervoltage => "Undervoltage",
            ComponentErrorCode::Overvoltage => "Overvoltage",
            ComponentErrorCode::Overcurrent => "Overcurrent",
            ComponentErrorCode::OvercurrentCharging => "OvercurrentCharging",
            ComponentErrorCode::OvercurrentDischarging => "OvercurrentDischarging",
            ComponentErrorCode::Overtemperature => "Overtemperature",
            ComponentErrorCode::Undertemperature => "Undertemperature",
            ComponentErrorCode::HighHumidity => "HighHumidity",
            ComponentErrorCode::FuseError => "FuseError",
            ComponentErrorCode::PrechargeError => "PrechargeError",
            ComponentErrorCode::PlausibilityError => "PlausibilityError",
            ComponentErrorCode::UndervoltageShutdown => "UndervoltageShutdown",
            ComponentErrorCode::EvUnexpectedPilotFailure => "EvUnexpectedPilotFailure",
            ComponentErrorCode::FaultCurrent => "FaultCurrent",
            ComponentErrorCode::ShortCircuit => "ShortCircuit",
            ComponentErrorCode::ConfigError => "ConfigError",
            ComponentErrorCode::IllegalComponentStateCodeRequested => {
                "IllegalComponentStateCodeRequested"
            }
            ComponentErrorCode::HardwareInaccessible => "HardwareInaccessible",
            ComponentErrorCode::Internal => "Internal",
            ComponentErrorCode::Overload => "Overload",
            ComponentErrorCode::EvChargingCableUnpluggedFromStation => {
                "EvChargingCableUnpluggedFromStation"
            }
            ComponentErrorCode::EvChargingCableUnpluggedFromEv => "EvChargingCableUnpluggedFromEv",
            ComponentErrorCode::EvChargingCableLockFailed => "EvChargingCableLockFailed",
            ComponentErrorCode::EvChargingCableInvalid => "EvChargingCableInvalid",
            ComponentErrorCode::EvConsumerIncompatible => "EvConsumerIncompatible",
            ComponentErrorCode::BatteryImbalance => "BatteryImbalance",
            ComponentErrorCode::BatteryLowSoh => "BatteryLowSoh",
            ComponentErrorCode::BatteryBlockError => "BatteryBlockError",
            ComponentErrorCode::BatteryControllerError => "BatteryControllerError",
            ComponentErrorCode::BatteryRelayError => "BatteryRelayError",
            ComponentErrorCode::BatteryCalibrationNeeded => "BatteryCalibrationNeeded",
            ComponentErrorCode::RelayCycleLimitReached => "RelayCycleLimitReached",
        };
        write!(f, "{name}")
    }
}

/// A state record as received from a telemetry source, before validation.
///
/// The code lists may contain duplicates, which are collapsed during
/// aggregation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawComponentState {
    pub sampled_at: Option<DateTime<Utc>>,
    pub states: Vec<ComponentStateCode>,
    pub warnings: Vec<ComponentErrorCode>,
    pub errors: Vec<ComponentErrorCode>,
}

/// The validated states, warnings and errors of a component at a point in
/// time.
///
/// Instances are only created by [`aggregate`][crate::aggregate].
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentState {
    pub(crate) sampled_at: DateTime<Utc>,
    pub(crate) states: BTreeSet<ComponentStateCode>,
    pub(crate) warnings: BTreeSet<ComponentErrorCode>,
    pub(crate) errors: BTreeSet<ComponentErrorCode>,
}

impl ComponentState {
    /// Returns the time at which the states were sampled.
    pub fn sampled_at(&self) -> DateTime<Utc> {
        self.sampled_at
    }

    /// Returns the unique states of the component.
    pub fn states(&self) -> &BTreeSet<ComponentStateCode> {
        &self.states
    }

    /// Returns the unique warning codes of the component.
    pub fn warnings(&self) -> &BTreeSet<ComponentErrorCode> {
        &self.warnings
    }

    /// Returns the unique error codes of the component.
    pub fn errors(&self) -> &BTreeSet<ComponentErrorCode> {
        &self.errors
    }

    /// Returns true if any of the states signals an error condition.
    pub fn has_error_state(&self) -> bool {
        self.states.iter().any(|s| s.is_error())
    }
}
