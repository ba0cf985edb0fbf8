// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Metric` enum, which represents the physical
//! quantity a metric sample was taken for.

use std::fmt::Display;

/// Represents a measurable quantity of a microgrid component.
///
/// Values of the underlying generated `Metric` type need to be converted to
/// this type, so that samples can be normalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    #[default]
    Unspecified,
    DcVoltage,
    DcCurrent,
    DcPower,
    AcFrequency,
    AcVoltage,
    AcVoltagePhase1N,
    AcVoltagePhase2N,
    AcVoltagePhase3N,
    AcCurrent,
    AcCurrentPhase1,
    AcCurrentPhase2,
    AcCurrentPhase3,
    AcActivePower,
    AcActivePowerPhase1,
    AcActivePowerPhase2,
    AcActivePowerPhase3,
    AcReactivePower,
    AcApparentPower,
    AcPowerFactor,
    AcActiveEnergy,
    AcActiveEnergyConsumed,
    AcActiveEnergyDelivered,
    BatteryCapacity,
    BatterySocPct,
    BatteryTemperature,
    InverterTemperature,
    EvChargerTemperature,
    SensorWindDirection,
    SensorTemperature,
    SensorRelativeHumidity,
    SensorIrradiance,
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Metric::Unspecified => "Unspecified",
            Metric::DcVoltage => "DcVoltage",
            Metric::DcCurrent => "DcCurrent",
            Metric::DcPower => "DcPower",
            Metric::AcFrequency => "AcFrequency",
            Metric::AcVoltage => "AcVoltage",
            Metric::AcVoltagePhase1N => "AcVoltagePhase1N",
            Metric::AcVoltagePhase2N => "AcVoltagePhase2N",
            Metric::AcVoltagePhase3N => "AcVoltagePhase3N",
            Metric::AcCurrent => "AcCurrent",
            Metric::AcCurrentPhase1 => "AcCurrentPhase1",
            Metric::AcCurrentPhase2 => "AcCurrentPhase2",
            Metric::AcCurrentPhase3 => "AcCurrentPhase3",
            Metric::AcActivePower => "AcActivePower",
            Metric::AcActivePowerPhase1 => "AcActivePowerPhase1",
            Metric::AcActivePowerPhase2 => "AcActivePowerPhase2",
            Metric::AcActivePowerPhase3 => "AcActivePowerPhase3",
            Metric::AcReactivePower => "AcReactivePower",
            Metric::AcApparentPower => "AcApparentPower",
            Metric::AcPowerFactor => "AcPowerFactor",
            Metric::AcActiveEnergy => "AcActiveEnergy",
            Metric::AcActiveEnergyConsumed => "AcActiveEnergyConsumed",
            Metric::AcActiveEnergyDelivered => "AcActiveEnergyDelivered",
            Metric::BatteryCapacity => "BatteryCapacity",
            Metric::BatterySocPct => "BatterySocPct",
            Metric::BatteryTemperature => "BatteryTemperature",
            Metric::InverterTemperature => "InverterTemperature",
            Metric::EvChargerTemperature => "EvChargerTemperature",
            Metric::SensorWindDirection => "SensorWindDirection",
            Metric::SensorTemperature => "SensorTemperature",
            Metric::SensorRelativeHumidity => "SensorRelativeHumidity",
            Metric::SensorIrradiance => "SensorIrradiance",
        };
        write!(f, "{name}")
    }
}
