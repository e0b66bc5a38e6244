pub mod battery;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /soc                 state of charge only
/// /battery             state of charge, its origin, and pack voltage
/// /datapoints          raw device data points
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(battery::router())
}
