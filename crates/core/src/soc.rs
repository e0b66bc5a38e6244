//! Voltage-based state-of-charge estimation.
//!
//! Linear interpolation between the voltage at 0% and the voltage at 100%,
//! clamped at both ends. Rounding is half away from zero (`f64::round`), so
//! an exact 12.5% becomes 13.

use crate::error::CoreError;

/// Voltage at 0% charge for the default 48V pack.
pub const DEFAULT_VOLTAGE_MIN: f64 = 42.0;

/// Voltage at 100% charge for the default 48V pack.
pub const DEFAULT_VOLTAGE_MAX: f64 = 54.6;

/// Voltage pair defining 0% and 100% charge for one battery pack.
///
/// Only constructible through [`CalibrationRange::new`], so `min < max`
/// always holds and [`CalibrationRange::estimate`] never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRange {
    min: f64,
    max: f64,
}

impl CalibrationRange {
    /// Validate and build a calibration range.
    ///
    /// Both bounds must be finite and `max` must be strictly greater than
    /// `min`.
    pub fn new(min: f64, max: f64) -> Result<Self, CoreError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(CoreError::Validation(format!(
                "calibration voltages must be finite (min={min}, max={max})"
            )));
        }
        if max <= min {
            return Err(CoreError::Validation(format!(
                "calibration max voltage ({max}) must be greater than min voltage ({min})"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Estimate the state of charge (0..=100) for a voltage in volts.
    pub fn estimate(&self, voltage: f64) -> u8 {
        if voltage >= self.max {
            return 100;
        }
        if voltage <= self.min {
            return 0;
        }
        let fraction = (voltage - self.min) / (self.max - self.min);
        // NaN lands here and saturates to 0.
        (fraction * 100.0).round() as u8
    }
}

impl Default for CalibrationRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_VOLTAGE_MIN,
            max: DEFAULT_VOLTAGE_MAX,
        }
    }
}

/// Free-function form of [`CalibrationRange::estimate`].
pub fn estimate_soc(voltage: f64, range: &CalibrationRange) -> u8 {
    range.estimate(voltage)
}
