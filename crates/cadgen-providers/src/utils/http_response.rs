//! HTTP Response Utilities
//!
//! Helper functions for processing HTTP responses from API providers.

use cadgen_domain::error::{Error, Result};
use reqwest::Response;

/// Utilities for processing HTTP responses
///
/// Provides common response handling patterns used by API providers.
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Check response status and parse JSON
    ///
    /// # Arguments
    /// * `response` - The HTTP response to check
    /// * `provider_name` - Name of the provider for error messages
    /// * `to_error` - Builds the provider-specific error from a message
    ///
    /// # Returns
    /// Parsed JSON value on success, or an appropriate error
    pub async fn check_and_parse(
        response: Response,
        provider_name: &str,
        to_error: fn(String) -> Error,
    ) -> Result<serde_json::Value> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let code = status.as_u16();

            let context = match code {
                401 => "authentication failed".to_string(),
                404 => "model or endpoint not found".to_string(),
                429 => "rate limit exceeded".to_string(),
                500..=599 => format!("server error ({code})"),
                _ => format!("request failed ({code})"),
            };
            return Err(to_error(format!("{provider_name} {context}: {error_text}")));
        }

        response.json().await.map_err(|e| {
            to_error(format!("{provider_name} response parse failed: {e}"))
        })
    }

    /// Map a transport failure, distinguishing timeouts
    pub fn transport_error(
        error: &reqwest::Error,
        timeout: std::time::Duration,
        to_error: fn(String) -> Error,
    ) -> Error {
        if error.is_timeout() {
            to_error(format!(
                "{} {timeout:?}",
                crate::constants::ERROR_MSG_REQUEST_TIMEOUT
            ))
        } else {
            to_error(format!("HTTP request failed: {error}"))
        }
    }
}
