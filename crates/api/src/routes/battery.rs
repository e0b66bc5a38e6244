//! Route definitions for battery telemetry endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::battery;
use crate::state::AppState;

/// Routes mounted at `/api`.
///
/// ```text
/// GET /soc          -> get_soc
/// GET /battery      -> get_battery
/// GET /datapoints   -> list_data_points
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/soc", get(battery::get_soc))
        .route("/battery", get(battery::get_battery))
        .route("/datapoints", get(battery::list_data_points))
}
