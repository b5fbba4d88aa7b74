//! Credential resolution for Google REST calls.

use reqwest::RequestBuilder;

use crate::domain::errors::AnalysisError;
use crate::domain::models::GoogleConfig;

/// Environment fallback for the API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
/// Environment fallback for the OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// How requests to Google APIs are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum GoogleCredentials {
    /// Sent as the `key` query parameter.
    ApiKey(String),
    /// Sent as a bearer token.
    AccessToken(String),
}

impl GoogleCredentials {
    /// Pick credentials from the configuration, then from the environment.
    ///
    /// Configured values win over environment variables, and an API key
    /// wins over an access token from the same source.
    pub fn resolve(config: &GoogleConfig) -> Option<Self> {
        let configured = non_empty(config.api_key.clone())
            .map(Self::ApiKey)
            .or_else(|| non_empty(config.access_token.clone()).map(Self::AccessToken));

        configured
            .or_else(|| non_empty(std::env::var(API_KEY_ENV).ok()).map(Self::ApiKey))
            .or_else(|| non_empty(std::env::var(ACCESS_TOKEN_ENV).ok()).map(Self::AccessToken))
    }

    /// Attach the credential to a request.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::ApiKey(key) => request.query(&[("key", key)]),
            Self::AccessToken(token) => request.bearer_auth(token),
        }
    }

    /// Like [`apply`](Self::apply), failing when no credentials exist.
    pub(crate) fn authorize(
        credentials: Option<&Self>,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, AnalysisError> {
        credentials.map(|c| c.apply(request)).ok_or_else(|| {
            AnalysisError::MissingCredentials(format!(
                "set google.api_key, google.access_token, {API_KEY_ENV} or {ACCESS_TOKEN_ENV}"
            ))
        })
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
            Self::AccessToken(_) => f.write_str("AccessToken(***)"),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
