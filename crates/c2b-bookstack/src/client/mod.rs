//! BookStack REST API client.
//!
//! Provides a sync HTTP client for the BookStack API with token
//! authentication (`Authorization: Token <id>:<secret>`).

mod multipart;
mod request;

use std::time::Duration;

use ureq::Agent;

/// BookStack REST API client.
pub struct BookStackClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl BookStackClient {
    /// Create client from config values.
    ///
    /// # Arguments
    /// * `base_url` - BookStack instance URL (the `/api` suffix is added here)
    /// * `token_id` - API token id
    /// * `token_secret` - API token secret
    /// * `timeout_secs` - Global timeout applied to every request
    pub fn from_config(
        base_url: &str,
        token_id: &str,
        token_secret: &str,
        timeout_secs: u64,
    ) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth_header: format!("Token {token_id}:{token_secret}"),
        }
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/api", self.base_url)
    }

    /// Instance URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_trims_trailing_slash() {
        let client = BookStackClient::from_config("https://wiki.example.com/", "id", "secret", 30);
        assert_eq!(client.base_url(), "https://wiki.example.com");
        assert_eq!(client.api_url(), "https://wiki.example.com/api");
    }

    #[test]
    fn test_auth_header_format() {
        let client = BookStackClient::from_config("http://localhost", "abc", "xyz", 30);
        assert_eq!(client.auth_header, "Token abc:xyz");
    }
}
