use futures::FutureExt;
use futures::future::LocalBoxFuture;
use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::Value;

use super::cache::Fetcher;
use crate::domain::errors::{FetchError, FetchResult};
use crate::domain::logging::{LogComponent, LogLevel, Logger, get_logger};
use crate::log_debug;

pub mod messari_client;

pub use messari_client::MessariEndpoints;

pub const API_KEY_HEADER: &str = "x-messari-api-key";

#[derive(Debug, Default, Deserialize)]
struct Status {
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    error_message: Option<String>,
}

/// `{status, data?}` wrapper around every Messari payload
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Status,
    #[serde(default)]
    data: Option<Value>,
}

/// Pull `data` out of an envelope, turning `status.error_code` into an error
/// even when `data` is present.
pub fn unwrap_envelope(body: Value) -> FetchResult<Value> {
    let envelope: Envelope = serde_json::from_value(body)?;
    if let Some(code) = envelope.status.error_code {
        return Err(FetchError::Upstream {
            code,
            message: envelope.status.error_message.unwrap_or_default(),
        });
    }
    envelope.data.ok_or(FetchError::MissingData)
}

/// Classify a finished HTTP exchange.
///
/// Upstream error codes win over the transport status so the message the API
/// sends is what the user sees.
pub fn read_response(status: u16, status_text: &str, body: Result<Value, String>) -> FetchResult<Value> {
    if let Ok(value) = &body {
        let code = value.pointer("/status/error_code").and_then(Value::as_i64);
        if let Some(code) = code {
            let message = value
                .pointer("/status/error_message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(FetchError::Upstream { code, message });
        }
    }
    if !(200..300).contains(&status) {
        return Err(FetchError::Http { status, status_text: status_text.to_string() });
    }
    unwrap_envelope(body.map_err(FetchError::Decode)?)
}

/// Browser `fetch` transport for the query cache
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    api_key: Option<String>,
}

impl HttpFetcher {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key: api_key.filter(|key| !key.is_empty()) }
    }

    async fn get(url: String, api_key: Option<String>) -> FetchResult<Value> {
        log_debug!(LogComponent::Infrastructure("HttpFetcher"), "GET {}", url);

        let mut request = Request::get(&url);
        if let Some(key) = &api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        let response = request.send().await.map_err(|e| {
            get_logger().log_with_metadata(
                LogLevel::Warn,
                LogComponent::Infrastructure("HttpFetcher"),
                &format!("request failed: {e}"),
                &url,
            );
            FetchError::Network(e.to_string())
        })?;

        let body = response.json::<Value>().await.map_err(|e| e.to_string());
        read_response(response.status(), &response.status_text(), body)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, key: &str) -> LocalBoxFuture<'static, FetchResult<Value>> {
        Self::get(key.to_string(), self.api_key.clone()).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_is_unwrapped() {
        let body = json!({ "status": { "elapsed": 3, "timestamp": "2021-10-12T00:00:00Z" }, "data": [1, 2] });
        assert_eq!(unwrap_envelope(body).unwrap(), json!([1, 2]));
    }

    #[test]
    fn missing_data_is_an_error() {
        let body = json!({ "status": { "elapsed": 3, "timestamp": "t" } });
        assert_eq!(unwrap_envelope(body), Err(FetchError::MissingData));
    }

    #[test]
    fn non_success_status_without_envelope() {
        let result = read_response(502, "Bad Gateway", Err("not json".into()));
        assert_eq!(result, Err(FetchError::Http { status: 502, status_text: "Bad Gateway".into() }));
    }

    #[test]
    fn garbage_body_on_success_is_decode_error() {
        assert!(matches!(read_response(200, "OK", Err("eof".into())), Err(FetchError::Decode(_))));
        assert!(matches!(read_response(200, "OK", Ok(json!("text"))), Err(FetchError::Decode(_))));
    }

    #[test]
    fn blank_api_key_is_not_sent() {
        assert!(HttpFetcher::new(Some(String::new())).api_key.is_none());
    }
}
