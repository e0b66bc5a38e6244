//! Integration tests for the battery telemetry endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, pack_points, FakeSource, DEVICE_ID};
use socbridge_core::battery::SocSource;
use socbridge_core::telemetry::DataPoint;

// ---------------------------------------------------------------------------
// GET /api/soc
// ---------------------------------------------------------------------------

#[tokio::test]
async fn soc_returns_reported_percentage() {
    let app = build_test_app(FakeSource::with_points(pack_points()), SocSource::Auto);

    let response = get(app, "/api/soc").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({"soc": 87}));
}

#[tokio::test]
async fn soc_estimates_from_voltage_in_voltage_mode() {
    let app = build_test_app(FakeSource::with_points(pack_points()), SocSource::Voltage);

    let json = body_json(get(app, "/api/soc").await).await;

    // 52.89V on the 42.0V..54.6V pack.
    assert_eq!(json["soc"], 86);
}

#[tokio::test]
async fn soc_falls_back_to_voltage_when_percentage_missing() {
    let points = vec![DataPoint::new("battery_voltage", 4830)];
    let app = build_test_app(FakeSource::with_points(points), SocSource::Auto);

    let json = body_json(get(app, "/api/soc").await).await;

    assert_eq!(json["soc"], 50);
}

#[tokio::test]
async fn soc_clamps_out_of_range_voltage() {
    let points = vec![DataPoint::new("battery_voltage", 6000)];
    let app = build_test_app(FakeSource::with_points(points), SocSource::Voltage);

    let json = body_json(get(app, "/api/soc").await).await;

    assert_eq!(json["soc"], 100);
}

#[tokio::test]
async fn soc_missing_data_point_returns_404() {
    let points = vec![DataPoint::new("switch", true)];
    let app = build_test_app(FakeSource::with_points(points), SocSource::Reported);

    let response = get(app, "/api/soc").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DATA_POINT_NOT_FOUND");
    assert_eq!(json["error"], "Battery DP not found: battery_percentage");
}

#[tokio::test]
async fn soc_malformed_data_point_returns_502() {
    let points = vec![DataPoint::new("battery_voltage", "unknown")];
    let app = build_test_app(FakeSource::with_points(points), SocSource::Voltage);

    let response = get(app, "/api/soc").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "INVALID_DATA_POINT");
}

#[tokio::test]
async fn soc_upstream_failure_returns_500() {
    let app = build_test_app(FakeSource::failing(1106, "permission deny"), SocSource::Auto);

    let response = get(app, "/api/soc").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert_eq!(json["error"], "Failed to fetch data from Tuya API");
}

#[tokio::test]
async fn every_request_fetches_fresh_status() {
    let source = FakeSource::with_points(pack_points());

    for _ in 0..2 {
        let app = build_test_app(Arc::clone(&source), SocSource::Auto);
        assert_eq!(get(app, "/api/soc").await.status(), StatusCode::OK);
    }

    assert_eq!(source.calls(), 2);
}

// ---------------------------------------------------------------------------
// GET /api/battery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn battery_returns_snapshot_with_voltage() {
    let app = build_test_app(FakeSource::with_points(pack_points()), SocSource::Voltage);

    let response = get(app, "/api/battery").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["soc"], 86);
    assert_eq!(json["soc_origin"], "estimated");
    assert_eq!(json["voltage"], 52.89);
}

#[tokio::test]
async fn battery_without_voltage_reports_null() {
    let points = vec![DataPoint::new("battery_percentage", 64)];
    let app = build_test_app(FakeSource::with_points(points), SocSource::Auto);

    let json = body_json(get(app, "/api/battery").await).await;

    assert_eq!(json["soc"], 64);
    assert_eq!(json["soc_origin"], "reported");
    assert!(json["voltage"].is_null());
}

// ---------------------------------------------------------------------------
// GET /api/datapoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn datapoints_lists_raw_status() {
    let app = build_test_app(FakeSource::with_points(pack_points()), SocSource::Auto);

    let response = get(app, "/api/datapoints").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["device_id"], DEVICE_ID);
    let points = json["data_points"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[1]["code"], "battery_voltage");
    assert_eq!(points[1]["value"], 5289);
}

#[tokio::test]
async fn datapoints_upstream_failure_returns_500() {
    let app = build_test_app(FakeSource::failing(1010, "token invalid"), SocSource::Auto);

    let response = get(app, "/api/datapoints").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
