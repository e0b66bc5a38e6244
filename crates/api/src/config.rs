use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use socbridge_core::battery::{BatteryProfile, SocSource, DEFAULT_SOC_CODE, DEFAULT_VOLTAGE_CODE};
use socbridge_core::soc::{CalibrationRange, DEFAULT_VOLTAGE_MAX, DEFAULT_VOLTAGE_MIN};
use socbridge_core::telemetry::VoltageScale;
use socbridge_tuya::client::DEFAULT_ENDPOINT;
use socbridge_tuya::TuyaConfig;

/// Errors raised while loading configuration. Any of these aborts startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Server configuration loaded from environment variables.
///
/// Server and battery settings have defaults suitable for local
/// development; the Tuya credentials and device id are required.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// The one device this bridge reports on.
    pub device_id: String,
    /// Tuya cloud project credentials and endpoint.
    pub tuya: TuyaConfig,
    /// Data point codes, voltage scaling and calibration.
    pub battery: BatteryProfile,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                        |
    /// |------------------------|--------------------------------|
    /// | `HOST`                 | `0.0.0.0`                      |
    /// | `PORT`                 | `3000`                         |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`        |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                           |
    /// | `TUYA_API_ENDPOINT`    | `https://openapi.tuyaus.com`   |
    /// | `TUYA_ACCESS_ID`       | required                       |
    /// | `TUYA_ACCESS_KEY`      | required                       |
    /// | `TUYA_DEVICE_ID`       | required                       |
    /// | `TUYA_TIMEOUT_SECS`    | `10`                           |
    /// | `SOC_SOURCE`           | `auto`                         |
    /// | `SOC_DP_CODE`          | `battery_percentage`           |
    /// | `VOLTAGE_DP_CODE`      | `battery_voltage`              |
    /// | `VOLTAGE_SCALE`        | `1`                            |
    /// | `BATTERY_VOLTAGE_MIN`  | `42.0`                         |
    /// | `BATTERY_VOLTAGE_MAX`  | `54.6`                         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let host = vars.string_or("HOST", "0.0.0.0");
        let port: u16 = vars.parse_or("PORT", 3000)?;
        let cors_origins = parse_origins(&vars.string_or("CORS_ORIGINS", "http://localhost:5173"))?;
        let request_timeout_secs: u64 = vars.parse_or("REQUEST_TIMEOUT_SECS", 30)?;

        let mut tuya = TuyaConfig::new(
            vars.string_or("TUYA_API_ENDPOINT", DEFAULT_ENDPOINT),
            vars.required("TUYA_ACCESS_ID")?,
            vars.required("TUYA_ACCESS_KEY")?,
        );
        tuya.timeout = Duration::from_secs(vars.parse_or("TUYA_TIMEOUT_SECS", 10)?);
        let device_id = vars.required("TUYA_DEVICE_ID")?;

        let soc_source: SocSource = vars.parse_or("SOC_SOURCE", SocSource::Auto)?;
        let voltage_scale = VoltageScale::new(vars.parse_or("VOLTAGE_SCALE", 1.0)?)
            .map_err(|e| invalid("VOLTAGE_SCALE", e))?;
        let calibration = CalibrationRange::new(
            vars.parse_or("BATTERY_VOLTAGE_MIN", DEFAULT_VOLTAGE_MIN)?,
            vars.parse_or("BATTERY_VOLTAGE_MAX", DEFAULT_VOLTAGE_MAX)?,
        )
        .map_err(|e| invalid("BATTERY_VOLTAGE_MIN/BATTERY_VOLTAGE_MAX", e))?;

        let battery = BatteryProfile {
            soc_code: vars.string_or("SOC_DP_CODE", DEFAULT_SOC_CODE),
            voltage_code: vars.string_or("VOLTAGE_DP_CODE", DEFAULT_VOLTAGE_CODE),
            voltage_scale,
            calibration,
            soc_source,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            device_id,
            tuya,
            battery,
        })
    }

    /// Whether CORS should allow any origin.
    pub fn cors_allows_any(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Trimmed value, treating empty as unset.
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn string_or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn parse_or<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(name) {
            Some(raw) => raw.parse().map_err(|e| invalid(name, e)),
            None => Ok(default),
        }
    }
}

fn invalid(name: &'static str, reason: impl Display) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.to_string(),
    }
}

fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    for origin in &origins {
        if origin != "*" {
            HeaderValue::from_str(origin)
                .map_err(|e| invalid("CORS_ORIGINS", format!("'{origin}': {e}")))?;
        }
    }
    Ok(origins)
}
