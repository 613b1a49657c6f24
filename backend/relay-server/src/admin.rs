use crate::{AdminError, AdminResult, AdminState};

use relay_auth::ADMIN_TOKEN_HEADER;
use relay_ws::{EVENTS_TARGET, InstitutionId, peer_descriptor};

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Extensions, HeaderMap, header},
};
use bytes::Bytes;
use http_body_util::LengthLimitError;
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

/// Successful broadcast response
#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub ok: bool,
    pub delivered_to: usize,
}

/// POST /admin/broadcast
///
/// Checks run in a fixed order: token, declared length, streamed length,
/// JSON syntax, object shape, `institution_id`. The validated object is
/// forwarded unchanged.
pub async fn broadcast_handler(
    State(state): State<AdminState>,
    headers: HeaderMap,
    extensions: Extensions,
    body: Body,
) -> AdminResult<Json<BroadcastResponse>> {
    let presented = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    if let Err(e) = state.validator.validate(presented) {
        warn!(
            target: EVENTS_TARGET,
            "event=admin_auth_failed remote={} reason={}",
            peer_descriptor(&extensions),
            e.error_code()
        );
        state.metrics.error_occurred("admin_auth");
        return Err(AdminError::unauthorized());
    }

    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());
    if declared.is_some_and(|length| length > state.max_body_bytes as u64) {
        return Err(AdminError::payload_too_large(state.max_body_bytes));
    }

    let bytes = read_body(body, state.max_body_bytes).await?;

    let message: Value =
        serde_json::from_slice(&bytes).map_err(|e| AdminError::invalid_json(e.to_string()))?;
    if !message.is_object() {
        return Err(AdminError::invalid_payload());
    }
    let institution_id =
        InstitutionId::from_message(&message).ok_or_else(AdminError::invalid_institution_id)?;

    let delivered_to = state.dispatcher.broadcast(&message).await;
    info!(
        target: EVENTS_TARGET,
        "event=admin_broadcast institution_id={institution_id} delivered_to={delivered_to} remote={}",
        peer_descriptor(&extensions)
    );

    Ok(Json(BroadcastResponse {
        ok: true,
        delivered_to,
    }))
}

/// Read the body, enforcing `limit` while streaming (chunked bodies carry no
/// Content-Length).
async fn read_body(body: Body, limit: usize) -> AdminResult<Bytes> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        let inner = e.into_inner();
        if inner.is::<LengthLimitError>() {
            AdminError::payload_too_large(limit)
        } else {
            AdminError::invalid_json(inner.to_string())
        }
    })
}
