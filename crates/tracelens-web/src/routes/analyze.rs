//! Analysis route handler.

use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Response header carrying per-component provenance.
pub const PROVENANCE_HEADER: &str = "x-tracelens-provenance";

/// Analyze the URL in the request body.
///
/// The body is read as JSON whatever its Content-Type. Anything that does
/// not yield a non-blank string `url` is a 400, including bodies that are
/// not JSON at all.
pub async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let url = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => requested_url(&value),
        Err(e) => {
            debug!(error = %e, "Unreadable analyze request body");
            None
        }
    }
    .ok_or(ApiError::MissingUrl)?;

    let report = state.analyzer.analyze(&url).await?;

    Ok((
        [(PROVENANCE_HEADER, report.provenance.to_string())],
        Json(report.response),
    ))
}

fn requested_url(body: &Value) -> Option<String> {
    body.get("url")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_requested_url() {
        assert_eq!(
            requested_url(&json!({ "url": " https://example.com " })),
            Some("https://example.com".to_string())
        );
        assert_eq!(requested_url(&json!({})), None);
        assert_eq!(requested_url(&json!({ "url": null })), None);
        assert_eq!(requested_url(&json!({ "url": "" })), None);
        assert_eq!(requested_url(&json!({ "url": 42 })), None);
        assert_eq!(requested_url(&json!(["https://example.com"])), None);
    }
}
