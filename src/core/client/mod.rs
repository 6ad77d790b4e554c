//! Public client surface + builder.
//! Internals are split into `auth` (token resolution) and `constants` (UA + defaults).

pub mod auth;
mod constants;

use crate::core::EodError;
use constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// HTTP client for the EODHD API.
///
/// Cheap to clone; clones share the underlying connection pool. A client carries
/// an optional *context* token, the one bound to whatever inbound request it is
/// serving (see [`EodClient::with_context_token`]).
#[derive(Debug, Clone)]
pub struct EodClient {
    http: Client,
    base_url: Url,
    default_token: String,
    context_token: Option<String>,
}

impl Default for EodClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl EodClient {
    /// Create a new builder.
    pub fn builder() -> EodClientBuilder {
        EodClientBuilder::default()
    }

    /// Returns a clone bound to a request-scoped token.
    ///
    /// The bound token is used whenever a call does not pass its own token.
    #[must_use]
    pub fn with_context_token(&self, token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        Self {
            context_token: (!token.is_empty()).then(|| token.to_string()),
            ..self.clone()
        }
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/* ----------------------- Builder ----------------------- */

/// Builder for [`EodClient`].
#[derive(Debug, Default)]
pub struct EodClientBuilder {
    user_agent: Option<String>,
    base_url: Option<Url>,
    api_token: Option<String>,
    context_token: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl EodClientBuilder {
    /// Override the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the API base (e.g., `https://eodhd.com/api/`).
    ///
    /// Endpoint paths are joined onto this URL, so it should end with a slash.
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the process-default token. Default: `EODHD_API_KEY`, else `demo`.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Bind a request-scoped token that takes precedence over the process default.
    pub fn context_token(mut self, token: impl Into<String>) -> Self {
        self.context_token = Some(token.into());
        self
    }

    /// Set a global request timeout (overall). Default: 30 seconds.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Builds the client, resolving the process-default token.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn build(self) -> Result<EodClient, EodError> {
        let base_url = match self.base_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let mut httpb = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .timeout(
                self.timeout
                    .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            );

        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        let http = httpb.build()?;

        let context_token = self
            .context_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(EodClient {
            http,
            base_url,
            default_token: auth::default_token(self.api_token),
            context_token,
        })
    }
}
