//! Shared HTTP plumbing for venue sources.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::Venue;
use crate::error::FetchError;

const USER_AGENT: &str = concat!("crossarb/", env!("CARGO_PKG_VERSION"));

/// Build a client with the per-request timeout applied.
pub fn build_client(timeout: Duration) -> HttpClient {
    HttpClient::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|err| {
            warn!(error = %err, "Failed to build HTTP client, using defaults");
            HttpClient::new()
        })
}

/// GET `url` and decode the body as JSON, classifying failures for retry.
pub async fn get_json(http: &HttpClient, venue: Venue, url: &str) -> Result<Value, FetchError> {
    debug!(%venue, url, "GET");
    let response = http
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|err| FetchError::from_reqwest(venue, &err))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::from_status(venue, status));
    }

    response
        .json::<Value>()
        .await
        .map_err(|err| FetchError::Decode {
            venue,
            reason: err.to_string(),
        })
}

/// The record list of a listing response: either a bare array or an
/// object wrapping it under one of `keys`.
pub fn records(venue: Venue, body: Value, keys: &[&str]) -> Result<Vec<Value>, FetchError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => keys
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| FetchError::Decode {
                venue,
                reason: format!("expected a list under one of {keys:?}"),
            }),
        other => Err(FetchError::Decode {
            venue,
            reason: format!("expected a list, got {}", kind(&other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_accepts_bare_arrays_and_wrappers() {
        let bare = records(Venue::Polymarket, json!([{"id": 1}]), &["data"]).unwrap();
        assert_eq!(bare.len(), 1);

        let wrapped = records(
            Venue::Kalshi,
            json!({"cursor": "abc", "markets": [{"ticker": "A"}, {"ticker": "B"}]}),
            &["markets"],
        )
        .unwrap();
        assert_eq!(wrapped.len(), 2);
    }

    #[test]
    fn records_rejects_other_shapes() {
        let err = records(Venue::Kalshi, json!({"error": "nope"}), &["markets"]).unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));

        let err = records(Venue::Kalshi, json!("text"), &["markets"]).unwrap_err();
        assert!(err.to_string().contains("a string"));
    }
}
