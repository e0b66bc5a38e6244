//! Handlers for battery telemetry endpoints.
//!
//! Every request performs one fresh device status fetch; nothing but the
//! vendor access token survives between requests.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use socbridge_core::battery::BatterySnapshot;
use socbridge_core::telemetry::DataPoint;

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SocResponse {
    pub soc: u8,
}

#[derive(Debug, Serialize)]
pub struct DataPointsResponse {
    pub device_id: String,
    pub data_points: Vec<DataPoint>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/soc
///
/// State of charge as `{"soc": 86}`.
pub async fn get_soc(State(state): State<AppState>) -> AppResult<Json<SocResponse>> {
    let snapshot = fetch_snapshot(&state).await?;
    Ok(Json(SocResponse { soc: snapshot.soc }))
}

/// GET /api/battery
///
/// State of charge with its origin and the pack voltage when available.
pub async fn get_battery(State(state): State<AppState>) -> AppResult<Json<BatterySnapshot>> {
    let snapshot = fetch_snapshot(&state).await?;
    Ok(Json(snapshot))
}

/// GET /api/datapoints
///
/// The device's raw status list, for finding the right DP codes.
pub async fn list_data_points(
    State(state): State<AppState>,
) -> AppResult<Json<DataPointsResponse>> {
    let device_id = state.config.device_id.clone();
    let data_points = state.source.device_status(&device_id).await?;
    Ok(Json(DataPointsResponse {
        device_id,
        data_points,
    }))
}

async fn fetch_snapshot(state: &AppState) -> AppResult<BatterySnapshot> {
    let points = state.source.device_status(&state.config.device_id).await?;
    let snapshot = state.config.battery.snapshot(&points)?;
    tracing::debug!(
        soc = snapshot.soc,
        origin = ?snapshot.soc_origin,
        voltage = ?snapshot.voltage,
        "Battery snapshot",
    );
    Ok(snapshot)
}
