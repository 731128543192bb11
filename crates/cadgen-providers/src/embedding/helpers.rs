//! Common helpers for API providers

/// Constructor patterns shared by HTTP-backed providers
pub mod constructor {
    use std::time::Duration;

    /// Trim an API key
    pub fn validate_api_key(api_key: &str) -> String {
        api_key.trim().to_string()
    }

    /// Trim a URL and drop its trailing slash
    pub fn validate_url(url: Option<String>) -> Option<String> {
        url.map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
    }

    /// Default timeout when not specified
    pub fn default_timeout() -> Duration {
        Duration::from_secs(30)
    }

    /// Effective URL with fallback to default
    pub fn get_effective_url(provided_url: Option<&str>, default_url: &str) -> String {
        provided_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| default_url.to_string())
    }
}
