//! HTTP transport.
//!
//! Provides `call()` for JSON-RPC 2.0 methods (POST to `/json_rpc`) and
//! `post()` for the daemon's plain-JSON endpoints. Supports Basic auth
//! and a configurable timeout. There is no retry here: a failed call is
//! surfaced to the caller as-is.

use crate::error::{expect, RpcError};
use base64::Engine;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use std::time::Duration;

/// Default request timeout (5000 ms).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Connection settings for one daemon/wallet pair.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Daemon base URL without port, scheme required (e.g. `http://127.0.0.1`).
    pub daemon_host: String,
    /// Wallet base URL without port, scheme required.
    pub wallet_host: String,
    pub daemon_rpc_port: u16,
    pub wallet_rpc_port: u16,
    /// Bound on each HTTP round trip.
    pub timeout: Duration,
    /// Optional Basic auth username.
    pub rpc_user: Option<String>,
    /// Optional Basic auth password.
    pub rpc_password: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            daemon_host: "http://127.0.0.1".to_string(),
            wallet_host: "http://127.0.0.1".to_string(),
            daemon_rpc_port: crate::ports::DAEMON,
            wallet_rpc_port: crate::ports::WALLET,
            timeout: DEFAULT_TIMEOUT,
            rpc_user: None,
            rpc_password: None,
        }
    }
}

impl ClientConfig {
    /// Daemon endpoint URL, validating the scheme prefix.
    pub fn daemon_url(&self) -> Result<String, RpcError> {
        endpoint_url(&self.daemon_host, self.daemon_rpc_port, "daemonHost")
    }

    /// Wallet endpoint URL, validating the scheme prefix.
    pub fn wallet_url(&self) -> Result<String, RpcError> {
        endpoint_url(&self.wallet_host, self.wallet_rpc_port, "walletHost")
    }
}

fn endpoint_url(host: &str, port: u16, field: &str) -> Result<String, RpcError> {
    let host = host.trim_end_matches('/');
    if !host.starts_with("http://") && !host.starts_with("https://") {
        return Err(RpcError::validation(field, expect::SCHEME));
    }
    Ok(format!("{host}:{port}"))
}

/// Build the JSON-RPC 2.0 request envelope.
///
/// The id is the literal string `"0"`; the services echo it back and
/// nothing correlates on it.
pub(crate) fn build_rpc(method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": "0",
        "method": method,
        "params": params,
    })
}

/// Async HTTP client for one endpoint (daemon or wallet).
pub struct RpcClient {
    http: reqwest::Client,
    base_url: String,
    auth: Option<HeaderValue>,
}

impl RpcClient {
    /// Client for `url` with the default timeout and no auth.
    pub fn new(url: &str) -> Self {
        Self::with_options(url, DEFAULT_TIMEOUT, None, None)
    }

    /// Client with an explicit timeout and optional Basic auth.
    pub fn with_options(
        url: &str,
        timeout: Duration,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");
        let auth = user.and_then(|user| {
            let creds = format!("{}:{}", user, password.unwrap_or(""));
            let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
            HeaderValue::from_str(&format!("Basic {encoded}")).ok()
        });
        Self {
            http,
            base_url: url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// Client for the wallet endpoint of `config`.
    pub fn wallet(config: &ClientConfig) -> Result<Self, RpcError> {
        Ok(Self::with_options(
            &config.wallet_url()?,
            config.timeout,
            config.rpc_user.as_deref(),
            config.rpc_password.as_deref(),
        ))
    }

    /// Client for the daemon endpoint of `config`.
    pub fn daemon(config: &ClientConfig) -> Result<Self, RpcError> {
        Ok(Self::with_options(
            &config.daemon_url()?,
            config.timeout,
            config.rpc_user.as_deref(),
            config.rpc_password.as_deref(),
        ))
    }

    /// The configured base URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Call a JSON-RPC 2.0 method (POST to `/json_rpc`).
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        debug!("json-rpc {method} -> {}", self.base_url);
        self.post_json("/json_rpc", &build_rpc(method, params)).await
    }

    /// POST a params object to a plain-JSON endpoint (e.g. `/getinfo`).
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, RpcError> {
        debug!("post {path} -> {}", self.base_url);
        self.post_json(path, body).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, RpcError> {
        let url = format!("{}{}", self.base_url, path);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(auth) = &self.auth {
            headers.insert(AUTHORIZATION, auth.clone());
        }
        let resp = self
            .http
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(map_transport_err)?;
        let text = resp.text().await.map_err(map_transport_err)?;
        unwrap_response(serde_json::from_str(&text)?)
    }
}

fn map_transport_err(e: reqwest::Error) -> RpcError {
    if e.is_timeout() {
        RpcError::Timeout
    } else {
        RpcError::Http { source: e }
    }
}

/// Unwrap a parsed response body: surface a remote `error` envelope as
/// [`RpcError::Rpc`], otherwise yield the `result` field if present,
/// else the whole body (plain-JSON endpoints have no envelope).
fn unwrap_response(value: Value) -> Result<Value, RpcError> {
    if let Some(err) = value.get("error").filter(|e| !e.is_null()) {
        let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown RPC error")
            .to_string();
        return Err(RpcError::Rpc { code, message });
    }
    match value {
        Value::Object(mut map) if map.contains_key("result") => {
            Ok(map.remove("result").unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let params = json!({ "height": 12 });
        let body = build_rpc("getblockheaderbyheight", params.clone());
        assert_eq!(
            body,
            json!({
                "jsonrpc": "2.0",
                "id": "0",
                "method": "getblockheaderbyheight",
                "params": { "height": 12 },
            })
        );
        // Round trip through text and recover method and params exactly.
        let text = serde_json::to_string(&body).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["method"], "getblockheaderbyheight");
        assert_eq!(parsed["params"], params);
        assert_eq!(parsed["id"], "0");
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.daemon_url().unwrap(), "http://127.0.0.1:43000");
        assert_eq!(config.wallet_url().unwrap(), "http://127.0.0.1:8070");
        assert_eq!(config.timeout, Duration::from_millis(5000));
    }

    #[test]
    fn test_scheme_is_required() {
        let config = ClientConfig {
            daemon_host: "127.0.0.1".to_string(),
            ..Default::default()
        };
        let err = config.daemon_url().unwrap_err();
        assert_eq!(err.to_string(), "daemonHost must begin with http(s)://");
        assert!(config.wallet_url().is_ok());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = RpcClient::new("http://example.com:8070/");
        assert_eq!(client.url(), "http://example.com:8070");
    }

    #[test]
    fn test_unwrap_result_envelope() {
        let val = json!({ "jsonrpc": "2.0", "id": "0", "result": { "count": 7 } });
        assert_eq!(unwrap_response(val).unwrap(), json!({ "count": 7 }));
    }

    #[test]
    fn test_unwrap_plain_body() {
        let val = json!({ "height": 10, "status": "OK" });
        assert_eq!(
            unwrap_response(val).unwrap(),
            json!({ "height": 10, "status": "OK" })
        );
    }

    #[test]
    fn test_unwrap_error_envelope() {
        let val = json!({ "error": { "code": -32601, "message": "Method not found" } });
        match unwrap_response(val).unwrap_err() {
            RpcError::Rpc { code, message } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "Method not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_error_field_is_not_an_error() {
        let val = json!({ "error": null, "result": 3 });
        assert_eq!(unwrap_response(val).unwrap(), json!(3));
    }
}
