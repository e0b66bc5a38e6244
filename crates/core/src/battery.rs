//! Battery snapshot assembly from a device status list.
//!
//! A [`BatteryProfile`] knows which data point codes carry the percentage
//! and the pack voltage, how to scale the raw voltage, and how to turn a
//! voltage into a percentage. It is built once from configuration and
//! applied to every freshly fetched status list.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::soc::CalibrationRange;
use crate::telemetry::{find_data_point, DataPoint, VoltageScale};

/// Default code of the percentage data point.
pub const DEFAULT_SOC_CODE: &str = "battery_percentage";

/// Default code of the pack voltage data point.
pub const DEFAULT_VOLTAGE_CODE: &str = "battery_voltage";

/// Where the reported state of charge comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SocSource {
    /// Use the device's percentage data point only.
    Reported,
    /// Estimate from the voltage data point only.
    Voltage,
    /// Prefer the percentage data point, fall back to voltage estimation.
    #[default]
    Auto,
}

impl FromStr for SocSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reported" => Ok(Self::Reported),
            "voltage" => Ok(Self::Voltage),
            "auto" => Ok(Self::Auto),
            other => Err(CoreError::Validation(format!(
                "unknown SOC source '{other}' (expected reported, voltage or auto)"
            ))),
        }
    }
}

impl fmt::Display for SocSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reported => "reported",
            Self::Voltage => "voltage",
            Self::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// How the state of charge in a [`BatterySnapshot`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SocOrigin {
    Reported,
    Estimated,
}

/// Result of applying a [`BatteryProfile`] to one status list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatterySnapshot {
    pub soc: u8,
    pub soc_origin: SocOrigin,
    /// Pack voltage in volts, when the device reported a usable one.
    pub voltage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatteryProfile {
    pub soc_code: String,
    pub voltage_code: String,
    pub voltage_scale: VoltageScale,
    pub calibration: CalibrationRange,
    pub soc_source: SocSource,
}

impl Default for BatteryProfile {
    fn default() -> Self {
        Self {
            soc_code: DEFAULT_SOC_CODE.to_string(),
            voltage_code: DEFAULT_VOLTAGE_CODE.to_string(),
            voltage_scale: VoltageScale::default(),
            calibration: CalibrationRange::default(),
            soc_source: SocSource::default(),
        }
    }
}

impl BatteryProfile {
    /// Build a snapshot from the device's status list.
    ///
    /// A data point required by the configured [`SocSource`] that is missing
    /// yields [`CoreError::DataPointNotFound`]; one that is present but not
    /// numeric yields [`CoreError::InvalidDataPoint`]. The voltage is
    /// informational in `reported` mode, so a malformed voltage there is
    /// dropped rather than failing the snapshot.
    pub fn snapshot(&self, points: &[DataPoint]) -> Result<BatterySnapshot, CoreError> {
        let voltage = self.voltage(points);

        let (soc, soc_origin, voltage) = match self.soc_source {
            SocSource::Reported => {
                let soc = self.require_reported(points)?;
                (soc, SocOrigin::Reported, voltage.and_then(Result::ok))
            }
            SocSource::Voltage => {
                let volts = voltage
                    .ok_or_else(|| CoreError::DataPointNotFound(self.voltage_code.clone()))??;
                (self.calibration.estimate(volts), SocOrigin::Estimated, Some(volts))
            }
            SocSource::Auto => match (self.reported(points), voltage) {
                (Some(reported), voltage) => {
                    (reported?, SocOrigin::Reported, voltage.and_then(Result::ok))
                }
                (None, Some(volts)) => {
                    let volts = volts?;
                    (self.calibration.estimate(volts), SocOrigin::Estimated, Some(volts))
                }
                (None, None) => {
                    return Err(CoreError::DataPointNotFound(format!(
                        "{} or {}",
                        self.soc_code, self.voltage_code
                    )))
                }
            },
        };

        Ok(BatterySnapshot {
            soc,
            soc_origin,
            voltage,
        })
    }

    /// Reported percentage, rounded and clamped to `0..=100`.
    fn reported(&self, points: &[DataPoint]) -> Option<Result<u8, CoreError>> {
        find_data_point(points, &self.soc_code)
            .map(|dp| dp.as_f64().map(|v| v.round().clamp(0.0, 100.0) as u8))
    }

    fn require_reported(&self, points: &[DataPoint]) -> Result<u8, CoreError> {
        self.reported(points)
            .ok_or_else(|| CoreError::DataPointNotFound(self.soc_code.clone()))?
    }

    /// Pack voltage in volts.
    fn voltage(&self, points: &[DataPoint]) -> Option<Result<f64, CoreError>> {
        find_data_point(points, &self.voltage_code)
            .map(|dp| dp.as_f64().map(|raw| self.voltage_scale.to_volts(raw)))
    }
}
