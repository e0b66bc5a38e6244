//! Device data points and raw voltage scaling.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One entry of a device status list, e.g. `{"code": "battery_percentage", "value": 87}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub code: String,
    pub value: serde_json::Value,
}

impl DataPoint {
    pub fn new(code: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            code: code.into(),
            value: value.into(),
        }
    }

    /// Read the value as a number.
    ///
    /// Accepts JSON numbers and strings holding a number (some devices
    /// report numeric DPs as strings). Booleans, objects and non-numeric
    /// strings are rejected.
    pub fn as_f64(&self) -> Result<f64, CoreError> {
        let parsed = match &self.value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .filter(|v| v.is_finite())
            .ok_or_else(|| CoreError::InvalidDataPoint {
                code: self.code.clone(),
                reason: format!("expected a number, got {}", self.value),
            })
    }
}

/// Find the first data point with the given code.
pub fn find_data_point<'a>(points: &'a [DataPoint], code: &str) -> Option<&'a DataPoint> {
    points.iter().find(|p| p.code == code)
}

/// Divisor that turns a raw reported voltage into volts.
///
/// Device specific: one pack reports hundredths of a volt (`100`), another
/// tenths (`10`). [`VoltageScale::UNIT`] means the device reports volts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageScale(f64);

impl VoltageScale {
    pub const UNIT: VoltageScale = VoltageScale(1.0);

    pub fn new(divisor: f64) -> Result<Self, CoreError> {
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(CoreError::Validation(format!(
                "voltage scale must be a positive number, got {divisor}"
            )));
        }
        Ok(Self(divisor))
    }

    pub fn divisor(&self) -> f64 {
        self.0
    }

    pub fn to_volts(&self, raw: f64) -> f64 {
        raw / self.0
    }
}

impl Default for VoltageScale {
    fn default() -> Self {
        Self::UNIT
    }
}
