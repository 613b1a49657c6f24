#![allow(dead_code)]

use crate::common::test_server::TEST_ORIGIN;

use axum_test::{TestServer, TestWebSocket, WsMessage};
use bytes::Bytes;

/// Subscriber test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
    pub institution_id: u64,
}

impl WsTestClient {
    /// Connect as a subscriber of `institution_id` from the default origin
    pub async fn connect(server: &TestServer, institution_id: u64) -> Self {
        let ws = open(server, &institution_id.to_string(), Some(TEST_ORIGIN)).await;
        Self { ws, institution_id }
    }

    /// Receive one text frame
    pub async fn receive_text(&mut self) -> String {
        self.ws.receive_text().await
    }

    /// Receive one frame parsed as JSON
    pub async fn receive_json(&mut self) -> serde_json::Value {
        self.ws.receive_json().await
    }

    /// Send a text frame (subscribers' frames are discarded by the relay)
    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    pub async fn send_binary(&mut self, data: impl Into<Bytes>) {
        self.ws.send_message(WsMessage::Binary(data.into())).await;
    }

    /// Close the WebSocket connection
    pub async fn close(self) {
        self.ws.close().await;
    }

    /// Get mutable reference to underlying TestWebSocket for advanced usage
    pub fn ws_mut(&mut self) -> &mut TestWebSocket {
        &mut self.ws
    }
}

/// Open a raw subscriber socket with explicit query value and origin
pub async fn open(server: &TestServer, institution_id: &str, origin: Option<&str>) -> TestWebSocket {
    let mut request = server.get_websocket(&format!("/ws?institution_id={institution_id}"));
    if let Some(origin) = origin {
        request = request.add_header("Origin", origin.to_string());
    }
    request.await.into_websocket().await
}

/// Expect the next frame to be a close frame; returns its code and reason
pub async fn expect_close(ws: &mut TestWebSocket) -> (u16, String) {
    match ws.receive_message().await {
        WsMessage::Close(Some(frame)) => (u16::from(frame.code), frame.reason.to_string()),
        other => panic!("expected close frame, got {other:?}"),
    }
}

/// Create multiple subscribers for the same institution
pub async fn create_clients_for_institution(
    server: &TestServer,
    institution_id: u64,
    count: usize,
) -> Vec<WsTestClient> {
    let mut clients = Vec::with_capacity(count);
    for _ in 0..count {
        clients.push(WsTestClient::connect(server, institution_id).await);
    }
    clients
}
