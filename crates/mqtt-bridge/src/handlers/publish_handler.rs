use crate::errors::BridgeError;
use crate::observability::metrics::record_publish;
use crate::repositories::MessageQueueRepository;
use axum::{
    extract::State,
    http::{header, HeaderMap},
};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;

/// Body of every successful publish response.
pub const SUCCESS_BODY: &str = "ok";

/// Application state shared across handlers
pub struct AppState {
    pub repository: MessageQueueRepository,
}

/// Handle a publish request
///
/// POST /api/v1/publish
///
/// The raw request body is forwarded as the message payload. Every failure
/// is reported as the same 500 `"error"`; the cause only goes to the logs.
///
/// Whether a zero-length body counts as a payload depends on the request
/// framing. With `Content-Length: 0` (or chunked encoding) an empty message
/// is published. Without either header there is no body at all and the
/// request fails before the broker is contacted. Some clients, `reqwest`
/// with `.body("")` among them, send an empty POST without `Content-Length`
/// and so land in the second case.
#[tracing::instrument(skip_all, name = "bridge.handler.publish")]
pub async fn handle_publish(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, BridgeError> {
    let start = Instant::now();

    let result = match request_payload(&headers, &body) {
        Ok(payload) => state.repository.write_to_queue(payload).await,
        Err(e) => Err(e),
    };

    match &result {
        Ok(()) => record_publish("success", None, start.elapsed()),
        Err(e) => {
            tracing::error!(
                target: "bridge.handler.publish",
                error = %e,
                stage = e.stage(),
                "Publish failed"
            );
            record_publish("error", Some(e.stage()), start.elapsed());
        }
    }

    result.map(|()| SUCCESS_BODY)
}

/// Payload carried by the request, `None` if the request had no body at all.
///
/// An empty body counts as present when the client declared one with
/// `Content-Length` or `Transfer-Encoding`.
fn request_payload<'a>(
    headers: &HeaderMap,
    body: &'a Bytes,
) -> Result<Option<&'a str>, BridgeError> {
    let declared = headers.contains_key(header::CONTENT_LENGTH)
        || headers.contains_key(header::TRANSFER_ENCODING);

    if body.is_empty() && !declared {
        return Ok(None);
    }

    std::str::from_utf8(body)
        .map(Some)
        .map_err(|_| BridgeError::InvalidBody)
}
