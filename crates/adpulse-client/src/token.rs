//! Bearer-token acquisition for the ads API.

use std::time::Duration;

use adpulse_core::SourceError;
use serde::Deserialize;
use tracing::debug;

use crate::cache::TtlCache;
use crate::transport::{HttpRequest, Transport};

/// Tokens live 30 minutes upstream; refresh five minutes early.
const TOKEN_TTL: Duration = Duration::from_secs(25 * 60);

#[derive(Debug, Deserialize)]
struct TokenPayload {
    access_token: String,
}

/// Per-credential bearer token cache.
#[derive(Debug, Clone)]
pub struct TokenCache {
    tokens: TtlCache<String>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            tokens: TtlCache::new(TOKEN_TTL),
        }
    }

    /// Returns a cached token or fetches a fresh one via the
    /// client-credentials grant.
    pub fn bearer(
        &self,
        transport: &Transport,
        base_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, SourceError> {
        let key = format!("{client_id}\u{1f}{client_secret}");
        if let Some(token) = self.tokens.get(&key) {
            return Ok(token);
        }

        debug!(client_id, "fetching ads api token");
        let request = HttpRequest::post(format!("{base_url}/api/client/token")).with_form(vec![
            (String::from("client_id"), client_id.to_owned()),
            (String::from("client_secret"), client_secret.to_owned()),
            (String::from("grant_type"), String::from("client_credentials")),
        ]);

        let response = transport.execute(&request)?;
        let payload: TokenPayload = serde_json::from_str(&response.body).map_err(|e| {
            SourceError::upstream(format!("token response is not valid JSON: {e}"))
        })?;

        if payload.access_token.is_empty() {
            return Err(SourceError::upstream("token response carried an empty token"));
        }

        self.tokens.put(key, payload.access_token.clone());
        Ok(payload.access_token)
    }

    /// Drops every cached token, forcing re-authentication.
    pub fn invalidate_all(&self) {
        self.tokens.clear();
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}
