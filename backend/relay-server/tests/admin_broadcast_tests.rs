mod common;

use common::{
    TEST_MAX_BODY_BYTES, TEST_TOKEN, add_subscriber, create_test_admin_state, create_test_server,
};

use relay_auth::ADMIN_TOKEN_HEADER;
use relay_server::admin::broadcast_handler;

use axum::{
    body::Body,
    extract::{State, ws::Message},
    http::{Extensions, HeaderMap, HeaderValue},
};
use bytes::Bytes;
use googletest::prelude::*;
use http::StatusCode;
use serde_json::{Value, json};

const TOKEN_HEADER: &str = "X-WS-TOKEN";

#[tokio::test]
async fn given_correct_token_and_two_subscribers_when_broadcast_then_delivered_to_two() {
    // Given
    let (server, state) = create_test_server();
    let mut first = add_subscriber(&state, 7).await;
    let mut second = add_subscriber(&state, 7).await;
    let body = json!({"institution_id": 7, "type": "update"});

    // When
    let response = server
        .post("/admin/broadcast")
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&body)
        .await;

    // Then
    assert_that!(response.status_code(), eq(StatusCode::OK));
    assert_that!(
        response.json::<Value>(),
        eq(&json!({"ok": true, "delivered_to": 2}))
    );
    for rx in [&mut first, &mut second] {
        match rx.try_recv() {
            Ok(Message::Text(text)) => {
                let received: Value = serde_json::from_str(text.as_str()).expect("json frame");
                assert_that!(received, eq(&body));
            }
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn given_wrong_token_when_broadcast_then_unauthorized_and_nothing_delivered() {
    // Given
    let (server, state) = create_test_server();
    let mut subscriber = add_subscriber(&state, 7).await;

    // When
    let response = server
        .post("/admin/broadcast")
        .add_header(TOKEN_HEADER, "wrong-token")
        .json(&json!({"institution_id": 7, "type": "update"}))
        .await;

    // Then
    assert_that!(response.status_code(), eq(StatusCode::UNAUTHORIZED));
    assert_that!(
        response.json::<Value>(),
        eq(&json!({"ok": false, "error": "unauthorized"}))
    );
    assert_that!(subscriber.try_recv().is_err(), eq(true));
}

#[tokio::test]
async fn given_missing_token_when_broadcast_then_unauthorized() {
    let (server, _state) = create_test_server();

    let response = server
        .post("/admin/broadcast")
        .json(&json!({"institution_id": 7}))
        .await;

    assert_that!(response.status_code(), eq(StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn given_wrong_token_and_oversized_body_when_broadcast_then_unauthorized_first() {
    let (server, _state) = create_test_server();

    let response = server
        .post("/admin/broadcast")
        .add_header(TOKEN_HEADER, "wrong-token")
        .text("x".repeat(TEST_MAX_BODY_BYTES * 2))
        .await;

    assert_that!(response.status_code(), eq(StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn given_oversized_body_when_broadcast_then_payload_too_large() {
    // Given
    let (server, state) = create_test_server();
    let mut subscriber = add_subscriber(&state, 7).await;
    let padding = "x".repeat(TEST_MAX_BODY_BYTES);

    // When
    let response = server
        .post("/admin/broadcast")
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&json!({"institution_id": 7, "padding": padding}))
        .await;

    // Then
    assert_that!(response.status_code(), eq(StatusCode::PAYLOAD_TOO_LARGE));
    assert_that!(
        response.json::<Value>(),
        eq(&json!({"ok": false, "error": "payload too large"}))
    );
    assert_that!(subscriber.try_recv().is_err(), eq(true));
}

#[tokio::test]
async fn given_malformed_json_when_broadcast_then_invalid_json() {
    let (server, _state) = create_test_server();

    let response = server
        .post("/admin/broadcast")
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .text("{\"institution_id\": 7,")
        .await;

    assert_that!(response.status_code(), eq(StatusCode::BAD_REQUEST));
    assert_that!(
        response.json::<Value>(),
        eq(&json!({"ok": false, "error": "invalid json"}))
    );
}

#[tokio::test]
async fn given_non_object_json_when_broadcast_then_invalid_payload() {
    let (server, _state) = create_test_server();

    for body in [json!([7]), json!("update"), json!(7)] {
        let response = server
            .post("/admin/broadcast")
            .add_header(TOKEN_HEADER, TEST_TOKEN)
            .json(&body)
            .await;

        assert_that!(response.status_code(), eq(StatusCode::BAD_REQUEST));
        assert_that!(
            response.json::<Value>(),
            eq(&json!({"ok": false, "error": "invalid payload"}))
        );
    }
}

#[tokio::test]
async fn given_bad_institution_id_when_broadcast_then_invalid_institution_id() {
    let (server, _state) = create_test_server();

    for body in [
        json!({"type": "update"}),
        json!({"institution_id": 0}),
        json!({"institution_id": -7}),
        json!({"institution_id": "7"}),
        json!({"institution_id": 7.5}),
        json!({"institution_id": true}),
    ] {
        let response = server
            .post("/admin/broadcast")
            .add_header(TOKEN_HEADER, TEST_TOKEN)
            .json(&body)
            .await;

        assert_that!(response.status_code(), eq(StatusCode::BAD_REQUEST));
        assert_that!(
            response.json::<Value>(),
            eq(&json!({"ok": false, "error": "invalid institution_id"}))
        );
    }
}

#[tokio::test]
async fn given_no_subscribers_when_broadcast_then_delivered_to_zero() {
    let (server, _state) = create_test_server();

    let response = server
        .post("/admin/broadcast")
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&json!({"institution_id": 12}))
        .await;

    assert_that!(response.status_code(), eq(StatusCode::OK));
    assert_that!(
        response.json::<Value>(),
        eq(&json!({"ok": true, "delivered_to": 0}))
    );
}

#[tokio::test]
async fn given_dead_subscriber_when_broadcast_then_evicted_and_not_counted() {
    // Given
    let (server, state) = create_test_server();
    let _live = add_subscriber(&state, 3).await;
    drop(add_subscriber(&state, 3).await);

    // When
    let response = server
        .post("/admin/broadcast")
        .add_header(TOKEN_HEADER, TEST_TOKEN)
        .json(&json!({"institution_id": 3}))
        .await;

    // Then
    assert_that!(
        response.json::<Value>(),
        eq(&json!({"ok": true, "delivered_to": 1}))
    );
    assert_that!(state.registry.total_connections().await, eq(1));
}

#[tokio::test]
async fn given_streamed_body_without_content_length_over_limit_when_broadcast_then_413() {
    // Given
    let state = create_test_admin_state();
    let mut rx = add_subscriber(&state, 7).await;
    let mut headers = HeaderMap::new();
    headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_static(TEST_TOKEN));
    let padding = "x".repeat(TEST_MAX_BODY_BYTES);
    let chunks = vec![
        Ok::<_, std::io::Error>(Bytes::from_static(b"{\"institution_id\": 7, \"pad\": \"")),
        Ok(Bytes::from(padding)),
        Ok(Bytes::from_static(b"\"}")),
    ];
    let body = Body::from_stream(futures::stream::iter(chunks));

    // When
    let result = broadcast_handler(State(state), headers, Extensions::new(), body).await;

    // Then
    let err = result.expect_err("oversized streamed body rejected");
    assert_that!(err.status(), eq(StatusCode::PAYLOAD_TOO_LARGE));
    assert_that!(rx.try_recv().is_err(), eq(true));
}

#[tokio::test]
async fn given_streamed_body_within_limit_when_broadcast_then_delivered() {
    let state = create_test_admin_state();
    let mut rx = add_subscriber(&state, 7).await;
    let mut headers = HeaderMap::new();
    headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_static(TEST_TOKEN));
    let chunks = vec![
        Ok::<_, std::io::Error>(Bytes::from_static(b"{\"institution_id\": ")),
        Ok(Bytes::from_static(b"7}")),
    ];
    let body = Body::from_stream(futures::stream::iter(chunks));

    let response = broadcast_handler(State(state), headers, Extensions::new(), body)
        .await
        .expect("accepted");

    assert_that!(response.0.delivered_to, eq(1));
    assert_that!(rx.try_recv().is_ok(), eq(true));
}
