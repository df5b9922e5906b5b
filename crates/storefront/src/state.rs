//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::MessageRepository;
use crate::realtime::ChannelHub;
use crate::services::github::GithubClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the database pool, the realtime
/// channel, and the GitHub OAuth client. All of them are created once at
/// startup and live for the whole process.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    channel: ChannelHub,
    github: GithubClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let channel = ChannelHub::new(Arc::new(MessageRepository::new(pool.clone())));
        let github = GithubClient::new(config.github.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                channel,
                github,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the realtime channel hub.
    #[must_use]
    pub fn channel(&self) -> &ChannelHub {
        &self.inner.channel
    }

    /// Get a reference to the GitHub OAuth client.
    #[must_use]
    pub fn github(&self) -> &GithubClient {
        &self.inner.github
    }
}
