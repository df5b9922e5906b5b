//! GitHub OAuth client.
//!
//! Exchanges the authorization code for an access token and fetches the
//! user's profile. Only the success/failure contract of the provider is
//! consumed; session handling stays in the route layer.

use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GithubOAuthConfig;

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const API_BASE: &str = "https://api.github.com";

/// GitHub requires a User-Agent on all API requests.
const USER_AGENT: &str = "mercado-storefront";

/// Errors from the GitHub OAuth flow.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Transport-level failure talking to GitHub.
    #[error("github request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub refused the code exchange.
    #[error("github token exchange failed: {0}")]
    TokenExchange(String),
}

/// The subset of the GitHub user profile this system consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubProfile {
    /// Display name; GitHub reports `null` when unset.
    pub name: Option<String>,
    /// Public profile email; often `null`, in which case the emails
    /// endpoint is consulted.
    pub email: Option<String>,
}

/// Response from the token exchange endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Entry from the authenticated user's emails endpoint.
#[derive(Debug, Deserialize)]
struct EmailEntry {
    email: String,
    primary: bool,
    verified: bool,
}

/// Client for the GitHub OAuth endpoints.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    config: GithubOAuthConfig,
}

impl GithubClient {
    /// Create a new GitHub client.
    #[must_use]
    pub fn new(config: GithubOAuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Build the authorization URL the browser is redirected to.
    ///
    /// `state` is the per-session CSRF nonce validated on callback.
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{AUTHORIZE_URL}?client_id={}&redirect_uri={}&scope=user:email&state={}",
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.callback_url),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::Http` on transport failure and
    /// `GithubError::TokenExchange` when GitHub rejects the code.
    pub async fn exchange_code(&self, code: &str) -> Result<String, GithubError> {
        let response: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.expose_secret()),
                ("code", code),
                ("redirect_uri", self.config.callback_url.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.access_token.ok_or_else(|| {
            GithubError::TokenExchange(
                response
                    .error_description
                    .or(response.error)
                    .unwrap_or_else(|| "no access token in response".to_string()),
            )
        })
    }

    /// Fetch the authenticated user's profile.
    ///
    /// Falls back to the emails endpoint when the public profile email is
    /// unset, preferring the primary verified address.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::Http` on transport failure.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GithubProfile, GithubError> {
        let mut profile: GithubProfile = self
            .http
            .get(format!("{API_BASE}/user"))
            .bearer_auth(access_token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if profile.email.is_none() {
            profile.email = self.fetch_primary_email(access_token).await?;
        }

        Ok(profile)
    }

    /// Fetch the primary verified email, if any.
    async fn fetch_primary_email(
        &self,
        access_token: &str,
    ) -> Result<Option<String>, GithubError> {
        let emails: Vec<EmailEntry> = self
            .http
            .get(format!("{API_BASE}/user/emails"))
            .bearer_auth(access_token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(emails
            .into_iter()
            .find(|e| e.primary && e.verified)
            .map(|e| e.email))
    }
}
