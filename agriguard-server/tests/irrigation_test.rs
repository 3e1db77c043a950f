use agriguard_api::models::IrrigationState;
use agriguard_server::tests::create_test_reading;
use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::mock_app::{MockApp, read_json};

#[tokio::test]
async fn test_get_irrigation_state() {
    let app = MockApp::new().await;

    let response = app.request(Method::GET, "/api/irrigation", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let state = read_json(response).await;
    assert_eq!(state, json!({ "auto_mode": true, "pump_on": false, "threshold": 45 }));
}

#[tokio::test]
async fn test_manual_toggle_rejected_in_auto_mode() {
    let app = MockApp::new().await;

    let response = app.request(Method::POST, "/api/irrigation/pump/toggle", None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], json!(409));

    let state = app.services.irrigation_service.state().await;
    assert!(state.auto_mode);
    assert!(!state.pump_on);
}

#[tokio::test]
async fn test_manual_toggle_in_manual_mode() {
    let app = MockApp::new().await.with_irrigation(
        vec![create_test_reading("Mon", 50.0, 60.0)],
        IrrigationState {
            auto_mode: false,
            pump_on: false,
            threshold: 45,
        },
    );

    let response = app.request(Method::POST, "/api/irrigation/pump/toggle", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["pump_on"], json!(true));

    let response = app.request(Method::POST, "/api/irrigation/pump/toggle", None).await;
    assert_eq!(read_json(response).await["pump_on"], json!(false));
}

#[tokio::test]
async fn test_toggle_auto_mode_stops_pump() {
    let app = MockApp::new().await.with_irrigation(
        vec![create_test_reading("Mon", 20.0, 60.0)],
        IrrigationState {
            auto_mode: true,
            pump_on: true,
            threshold: 45,
        },
    );

    let response = app.request(Method::POST, "/api/irrigation/auto/toggle", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!({ "auto_mode": false, "pump_on": false, "threshold": 45 })
    );

    // switching back on also starts from a stopped pump
    app.request(Method::POST, "/api/irrigation/pump/toggle", None).await;
    let response = app.request(Method::POST, "/api/irrigation/auto/toggle", None).await;
    assert_eq!(
        read_json(response).await,
        json!({ "auto_mode": true, "pump_on": false, "threshold": 45 })
    );
}

#[tokio::test]
async fn test_update_threshold() {
    let app = MockApp::new().await;

    let response = app
        .request(Method::PUT, "/api/irrigation", Some(json!({ "threshold": 60 })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["threshold"], json!(60));

    let response = app
        .request(Method::PUT, "/api/irrigation", Some(json!({ "threshold": 5, "auto_mode": false })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let state = app.services.irrigation_service.state().await;
    assert_eq!(state.threshold, 60);
    assert!(state.auto_mode);
}

#[tokio::test]
async fn test_tick_drives_pump_in_auto_mode() {
    let app = MockApp::new().await.with_irrigation(
        vec![create_test_reading("Sun", 44.0, 50.0)],
        IrrigationState::default(),
    );

    let reading = app.services.irrigation_service.tick().await.unwrap();
    assert_eq!(reading.moisture, 43.9);

    let response = app.request(Method::GET, "/api/irrigation", None).await;
    assert_eq!(read_json(response).await["pump_on"], json!(true));
}
