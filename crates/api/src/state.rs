use std::sync::Arc;

use socbridge_tuya::DeviceStatusSource;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, including the device id and battery profile.
    pub config: Arc<ServerConfig>,
    /// Where device data points come from (the Tuya client in production).
    pub source: Arc<dyn DeviceStatusSource>,
}
