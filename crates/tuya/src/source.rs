use async_trait::async_trait;
use socbridge_core::telemetry::DataPoint;

use crate::client::TuyaOpenApi;
use crate::error::TuyaError;

/// Anything that can report the current data points of a device.
///
/// The HTTP layer holds an `Arc<dyn DeviceStatusSource>` so tests can swap
/// the cloud client for a canned status list.
#[async_trait]
pub trait DeviceStatusSource: Send + Sync {
    async fn device_status(&self, device_id: &str) -> Result<Vec<DataPoint>, TuyaError>;
}

#[async_trait]
impl DeviceStatusSource for TuyaOpenApi {
    async fn device_status(&self, device_id: &str) -> Result<Vec<DataPoint>, TuyaError> {
        TuyaOpenApi::device_status(self, device_id).await
    }
}
