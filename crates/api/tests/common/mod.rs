#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use socbridge_core::battery::{BatteryProfile, SocSource};
use socbridge_core::telemetry::{DataPoint, VoltageScale};
use socbridge_tuya::{DeviceStatusSource, TuyaConfig, TuyaError};
use tower::ServiceExt;

use socbridge_api::config::ServerConfig;
use socbridge_api::router::build_app_router;
use socbridge_api::state::AppState;

pub const DEVICE_ID: &str = "bat001";

/// Canned device status used instead of the Tuya cloud.
pub struct FakeSource {
    response: Result<Vec<DataPoint>, (i64, String)>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_points(points: Vec<DataPoint>) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(points),
            calls: AtomicUsize::new(0),
        })
    }

    /// Every call fails with a vendor API error.
    pub fn failing(code: i64, msg: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err((code, msg.to_string())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceStatusSource for FakeSource {
    async fn device_status(&self, device_id: &str) -> Result<Vec<DataPoint>, TuyaError> {
        assert_eq!(device_id, DEVICE_ID, "handler asked for the wrong device");
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(points) => Ok(points.clone()),
            Err((code, msg)) => Err(TuyaError::Api {
                code: *code,
                msg: msg.clone(),
            }),
        }
    }
}

/// The status list of a typical 48V pack reporting hundredths of a volt.
pub fn pack_points() -> Vec<DataPoint> {
    vec![
        DataPoint::new("battery_percentage", 87),
        DataPoint::new("battery_voltage", 5289),
        DataPoint::new("switch", true),
    ]
}

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// the 42.0V..54.6V calibration, and a voltage scale of 100.
pub fn test_config(soc_source: SocSource) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        device_id: DEVICE_ID.to_string(),
        tuya: TuyaConfig::new("http://tuya.invalid", "test_access_id", "test_secret"),
        battery: BatteryProfile {
            voltage_scale: VoltageScale::new(100.0).unwrap(),
            soc_source,
            ..BatteryProfile::default()
        },
    }
}

/// Build the full application router (same middleware stack as production)
/// around the given status source.
pub fn build_test_app(source: Arc<FakeSource>, soc_source: SocSource) -> Router {
    let config = test_config(soc_source);
    let state = AppState {
        config: Arc::new(config.clone()),
        source,
    };
    build_app_router(state, &config)
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
