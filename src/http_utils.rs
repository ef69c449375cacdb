//! HTTP utilities for the QBank client.
//!
//! Every QBank function is called the same way: the arguments are encoded as
//! JSON and posted as the `data` form field to `{api}/{qbank}/{function}`.
//! The service answers with a JSON envelope carrying a `success` flag and,
//! on failure, an `error` object. Several calls can be combined into one
//! round trip with the `batch` function.

use crate::configuration::Configuration;
use crate::folder_tree::FolderTreeError;
use crate::model::ModelError;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, trace};

/// Error code reported for failed calls that carry no error of their own
pub const UNKNOWN_ERROR_CODE: i64 = 99;
pub const UNKNOWN_ERROR_TYPE: &str = "UnknownError";

/// Function name that must never carry the session hash
const LOGIN_FUNCTION: &str = "login";
const BATCH_FUNCTION: &str = "batch";

/// Errors returned by calls to the QBank API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// The service processed the call and reported a failure
    #[error("QBank error {code} ({kind}): {message}")]
    Communication {
        message: String,
        code: i64,
        kind: String,
    },
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("invalid folder data: {0}")]
    ModelError(#[from] ModelError),
    #[error("failed to build the folder tree: {0}")]
    FolderTreeError(#[from] FolderTreeError),
}

impl ApiError {
    /// The service error code, for errors reported by the service
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Communication { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Configuration for HTTP requests with common settings
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequestConfig {
    /// Address of the API server, e.g. `http://api2.qbank.se`
    pub api_address: String,
    /// Name of the QBank instance on the server
    pub qbank_address: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Session hash added to every call except `login`
    pub session_hash: Option<String>,
    pub user_agent: String,
}

impl Default for HttpRequestConfig {
    fn default() -> Self {
        Self::from_configuration(&Configuration::default())
    }
}

impl HttpRequestConfig {
    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self {
            api_address: configuration.api_address(),
            qbank_address: configuration.qbank_address().unwrap_or_default().to_string(),
            timeout: configuration.timeout(),
            session_hash: configuration.session_hash().map(str::to_string),
            user_agent: format!("qbank/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// URL of a QBank function
    pub fn function_url(&self, function: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api_address.trim_end_matches('/'),
            self.qbank_address.trim_matches('/'),
            function
        )
    }
}

/// One named call inside a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchCall {
    pub name: String,
    pub function: String,
    pub arguments: Value,
}

impl BatchCall {
    pub fn new(name: &str, function: &str, arguments: Value) -> BatchCall {
        BatchCall {
            name: name.to_string(),
            function: function.to_string(),
            arguments,
        }
    }
}

/// Results of a batch call keyed by call name.
///
/// The batch itself succeeding says nothing about the individual calls, so
/// each result is checked when it is taken.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResults {
    results: Map<String, Value>,
}

impl BatchResults {
    /// Remove the result of the named call, failing if the call did not succeed
    pub fn take(&mut self, name: &str) -> Result<Value, ApiError> {
        let result = self.results.remove(name).ok_or_else(|| {
            ApiError::UnexpectedResponse(format!("batch result {:?} is missing", name))
        })?;
        check_envelope(result)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// HTTP client wrapper with common request handling logic
#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    config: HttpRequestConfig,
}

impl HttpClient {
    pub fn new(config: HttpRequestConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    pub fn config(&self) -> &HttpRequestConfig {
        &self.config
    }

    /// Call a QBank function and return the successful response envelope
    pub async fn call(&self, function: &str, mut data: Value) -> Result<Value, ApiError> {
        if let (Some(hash), Some(arguments)) = (&self.config.session_hash, data.as_object_mut()) {
            if !function.eq_ignore_ascii_case(LOGIN_FUNCTION) {
                arguments.insert("hash".to_string(), Value::String(hash.clone()));
            }
        }

        let url = self.config.function_url(function);
        let body = serde_json::to_string(&data)?;
        trace!("Calling {} at {}", function, url);

        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, &self.config.user_agent)
            .form(&[("data", body)])
            .send()
            .await?
            .error_for_status()?;

        let response_text = response.text().await?;
        trace!("Raw response for {}: {}", function, response_text);

        let envelope: Value = serde_json::from_str(&response_text).map_err(|e| {
            error!(
                "Failed to parse response of {}: {}. Raw response: {}",
                function, e, response_text
            );
            ApiError::JsonError(e)
        })?;

        check_envelope(envelope).map_err(|e| {
            debug!("Call to {} failed: {}", function, e);
            e
        })
    }

    /// Send several calls in one request
    pub async fn batch(&self, calls: Vec<BatchCall>) -> Result<BatchResults, ApiError> {
        debug!(
            "Sending batch of {} calls: {}",
            calls.len(),
            calls
                .iter()
                .map(|call| call.function.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let mut envelope = self.call(BATCH_FUNCTION, json!({ "calls": calls })).await?;

        match envelope.get_mut("results").map(Value::take) {
            Some(Value::Object(results)) => Ok(BatchResults { results }),
            _ => Err(ApiError::UnexpectedResponse(
                "batch response has no results".to_string(),
            )),
        }
    }
}

/// Check the `success` flag of a response envelope
pub fn check_envelope(envelope: Value) -> Result<Value, ApiError> {
    if envelope.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(envelope);
    }

    match envelope.get("error").filter(|error| error.is_object()) {
        Some(error) => Err(ApiError::Communication {
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            code: error_code(error.get("code")),
            kind: error
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_ERROR_TYPE)
                .to_string(),
        }),
        None => Err(ApiError::Communication {
            message: "Non-successful call to QBank API and no specified error".to_string(),
            code: UNKNOWN_ERROR_CODE,
            kind: UNKNOWN_ERROR_TYPE.to_string(),
        }),
    }
}

// Codes arrive as numbers or numeric strings
fn error_code(code: Option<&Value>) -> i64 {
    match code {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(UNKNOWN_ERROR_CODE),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(UNKNOWN_ERROR_CODE),
        _ => UNKNOWN_ERROR_CODE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_config_default() {
        let config = HttpRequestConfig::default();
        assert_eq!(config.api_address, "http://api2.qbank.se");
        assert_eq!(config.timeout, 10);
        assert_eq!(config.session_hash, None);
        assert!(config.user_agent.starts_with("qbank/"));
    }

    #[test]
    fn test_function_url() {
        let config = HttpRequestConfig {
            api_address: "http://localhost:8080/".to_string(),
            qbank_address: "demo".to_string(),
            ..HttpRequestConfig::default()
        };
        assert_eq!(
            "http://localhost:8080/demo/getfolderstructure",
            config.function_url("getfolderstructure")
        );
    }

    #[test]
    fn test_successful_envelope() {
        let envelope = json!({"success": true, "data": []});
        assert_eq!(envelope.clone(), check_envelope(envelope).unwrap());
    }

    #[test]
    fn test_failed_envelope_with_error() {
        let result = check_envelope(json!({
            "success": false,
            "error": {"message": "No such folder", "code": "12", "type": "FolderException"}
        }));
        match result {
            Err(ApiError::Communication {
                message,
                code,
                kind,
            }) => {
                assert_eq!("No such folder", message);
                assert_eq!(12, code);
                assert_eq!("FolderException", kind);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_failed_envelope_without_error() {
        for envelope in [json!({"success": false}), json!({}), json!({"success": "yes"})] {
            let error = check_envelope(envelope).unwrap_err();
            assert_eq!(Some(UNKNOWN_ERROR_CODE), error.code());
            assert!(
                matches!(error, ApiError::Communication { ref kind, .. } if kind == UNKNOWN_ERROR_TYPE)
            );
        }
    }

    #[test]
    fn test_batch_results_are_checked_individually() {
        let mut results = BatchResults {
            results: json!({
                "creation": {"success": true, "folderId": 7},
                "folder": {"success": false, "error": {"message": "denied", "code": 3, "type": "AccessDenied"}}
            })
            .as_object()
            .cloned()
            .unwrap(),
        };

        assert_eq!(2, results.len());
        assert_eq!(json!(7), results.take("creation").unwrap()["folderId"]);
        assert_eq!(Some(3), results.take("folder").unwrap_err().code());
        assert!(matches!(
            results.take("folder"),
            Err(ApiError::UnexpectedResponse(_))
        ));
        assert!(results.is_empty());
    }

    #[test]
    fn test_batch_call_serialization() {
        let call = BatchCall::new(
            "folder",
            "getfolderinformation",
            json!({"folderId": "$creation.folderId"}),
        );
        assert_eq!(
            json!({"name": "folder", "function": "getfolderinformation", "arguments": {"folderId": "$creation.folderId"}}),
            serde_json::to_value(&call).unwrap()
        );
    }
}
