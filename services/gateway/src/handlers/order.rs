use crate::error::AppError;
use crate::kraken::ADD_ORDER_PATH;
use crate::models::OrderRequest;
use crate::state::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header::CONTENT_TYPE},
};
use kraken_signing::signing::NONCE_FIELD;
use kraken_signing::{FormParams, SignedEnvelope};
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use types::envelope::ResultEnvelope;
use uuid::Uuid;

pub const VALIDATED_MESSAGE: &str = "Credentials validated with Kraken (no order executed).";
pub const ACCEPTED_MESSAGE: &str = "Order accepted by Kraken.";

const KEY_PREFIX_LEN: usize = 4;

/// `POST /api/kraken/connect`
pub async fn connect(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ResultEnvelope>, AppError> {
    // No body, or a body that is not JSON, reads as an empty object
    let payload = if body.is_empty() || !has_json_content_type(&headers) {
        Value::Object(Map::new())
    } else {
        let Json(value) = Json::<Value>::from_bytes(&body)
            .map_err(|e| AppError::InvalidPayload(e.body_text()))?;
        value
    };
    let request = OrderRequest::from_json(payload)?;

    submit_order(&state, request).await.map(Json)
}

/// Sign the order with the caller's credentials and relay it to Kraken.
#[tracing::instrument(
    skip_all,
    fields(
        request_id = %Uuid::now_v7(),
        api_key = %key_prefix(&request.api_key),
        pair = %request.params.pair,
        side = %request.params.side,
        validate_only = request.params.validate_only,
    )
)]
pub async fn submit_order(
    state: &AppState,
    request: OrderRequest,
) -> Result<ResultEnvelope, AppError> {
    let nonce = state.nonces.issue();

    let mut params = FormParams::new();
    params.append(NONCE_FIELD, nonce.to_string());
    for (key, value) in request.params.wire_fields() {
        params.append(key, value);
    }

    let envelope = SignedEnvelope::seal(
        ADD_ORDER_PATH,
        &params,
        request.api_secret.expose_secret(),
    )?;
    tracing::debug!(nonce, "Submitting AddOrder");

    let reply = state.kraken.add_order(&request.api_key, &envelope).await?;

    let message = if request.params.validate_only {
        VALIDATED_MESSAGE
    } else {
        ACCEPTED_MESSAGE
    };
    tracing::info!("{message}");

    Ok(ResultEnvelope::success(message, reply.result))
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}

/// Enough of the key to correlate log lines, never the whole key.
fn key_prefix(api_key: &str) -> String {
    let prefix: String = api_key.chars().take(KEY_PREFIX_LEN).collect();
    format!("{prefix}...")
}
