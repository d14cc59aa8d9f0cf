//! Go playground sharing

use crate::error::CommandError;
use std::time::Duration;
use url::Url;

/// Client for the playground's share endpoint
#[derive(Debug, Clone)]
pub struct PlaygroundClient {
    base: Url,
    http: reqwest::Client,
}

impl PlaygroundClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CommandError> {
        let base = normalize_base(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CommandError::Playground(e.to_string()))?;
        Ok(Self { base, http })
    }

    /// Endpoint receiving the snippet
    pub fn share_endpoint(&self) -> Result<Url, CommandError> {
        self.base
            .join("share")
            .map_err(|e| CommandError::Playground(e.to_string()))
    }

    /// Public URL of a shared snippet
    pub fn snippet_url(&self, share_id: &str) -> Result<Url, CommandError> {
        self.base
            .join(&format!("p/{}", share_id.trim()))
            .map_err(|e| CommandError::Playground(e.to_string()))
    }

    /// Upload `source` and return the URL it can be viewed at
    pub async fn share(&self, source: &str) -> Result<Url, CommandError> {
        let endpoint = self.share_endpoint()?;
        tracing::debug!(endpoint = %endpoint, bytes = source.len(), "Sharing to playground");

        let response = self
            .http
            .post(endpoint)
            .form(&[("body", source)])
            .send()
            .await
            .map_err(|e| CommandError::Playground(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CommandError::Playground(format!(
                "share request failed with status {}",
                response.status()
            )));
        }

        let share_id = response
            .text()
            .await
            .map_err(|e| CommandError::Playground(e.to_string()))?;
        if share_id.trim().is_empty() {
            return Err(CommandError::Playground(
                "share request returned no snippet id".to_string(),
            ));
        }

        self.snippet_url(&share_id)
    }
}

/// Ensure the base URL ends with a slash so joins append rather than replace
fn normalize_base(base_url: &str) -> Result<Url, CommandError> {
    let with_slash = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Url::parse(&with_slash).map_err(|e| CommandError::Playground(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_from_default_base() {
        let client = PlaygroundClient::new("https://play.golang.org/", Duration::from_secs(10)).unwrap();
        assert_eq!(
            client.share_endpoint().unwrap().as_str(),
            "https://play.golang.org/share"
        );
        assert_eq!(
            client.snippet_url("abc123\n").unwrap().as_str(),
            "https://play.golang.org/p/abc123"
        );
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let client = PlaygroundClient::new("https://go.dev/play", Duration::from_secs(10)).unwrap();
        assert_eq!(
            client.share_endpoint().unwrap().as_str(),
            "https://go.dev/play/share"
        );
    }

    #[test]
    fn test_invalid_base() {
        let err = PlaygroundClient::new("not a url", Duration::from_secs(10)).unwrap_err();
        assert!(matches!(err, CommandError::Playground(_)));
    }
}
