mod common;

use actix_web::{http::header, test};
use serde_json::json;
use serial_test::serial;

use common::{auth_token, TestApp};

#[actix_rt::test]
#[serial]
async fn test_translate_requires_text_and_target_language() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = auth_token("user");

    let req = test::TestRequest::post()
        .uri("/api/utils/translate")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(&json!({ "text": "Hello" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("'text' and 'target_language'"));
}

#[actix_rt::test]
#[serial]
async fn test_translate_rejects_unknown_language_codes() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = auth_token("user");

    let req = test::TestRequest::post()
        .uri("/api/utils/translate")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(&json!({ "text": "Hello", "target_language": "xx" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid target_language code"));
}

#[actix_rt::test]
#[serial]
async fn test_start_conversation_requires_service_and_body() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = auth_token("user");

    let req = test::TestRequest::post()
        .uri("/api/messaging/conversations")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(&json!({ "body": "Is this available in July?" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "service_id and body are required.");
}

#[actix_rt::test]
#[serial]
async fn test_start_conversation_rejects_malformed_service_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = auth_token("user");

    let req = test::TestRequest::post()
        .uri("/api/messaging/conversations")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(&json!({ "service_id": "not-an-id", "body": "Hello" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_send_message_rejects_malformed_conversation_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = auth_token("user");

    let req = test::TestRequest::post()
        .uri("/api/messaging/conversations/not-an-id/messages")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(&json!({ "body": "Hello" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_create_booking_rejects_malformed_service_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = auth_token("user");

    let req = test::TestRequest::post()
        .uri("/api/vendors/bookings")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(&json!({
            "service_id": "not-an-id",
            "service_start_date": "2026-09-01"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_get_itinerary_rejects_malformed_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = auth_token("user");

    let req = test::TestRequest::get()
        .uri("/api/planner/itineraries/not-an-id")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_delete_item_rejects_malformed_itinerary_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = auth_token("user");

    let req = test::TestRequest::delete()
        .uri("/api/planner/itineraries/not-an-id/items/also-not-an-id")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_malformed_json_in_booking() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;
    let token = auth_token("user");

    let req = test::TestRequest::post()
        .uri("/api/vendors/bookings")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{ invalid json")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}
