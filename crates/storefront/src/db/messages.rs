//! Chat message repository.

use async_trait::async_trait;
use sqlx::PgPool;

use mercado_core::MessageId;

use super::RepositoryError;
use crate::models::message::ChatMessage;
use crate::realtime::MessageStore;

/// Internal row type for message queries.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i32,
    username: String,
    body: String,
}

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        Self {
            id: MessageId::new(row.id),
            user: row.username,
            body: row.body,
        }
    }
}

/// Repository for chat message operations.
///
/// Owns a handle to the pool (cheap to clone) so it can back the
/// [`MessageStore`] port used by the realtime channel.
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a chat message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn append(&self, user: &str, body: &str) -> Result<ChatMessage, RepositoryError> {
        let row = sqlx::query_as::<_, MessageRow>(
            "INSERT INTO messages (username, body) VALUES ($1, $2) RETURNING id, username, body",
        )
        .bind(user)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Fetch the full message history in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn history(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT id, username, body FROM messages ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn append(&self, user: &str, body: &str) -> Result<ChatMessage, RepositoryError> {
        Self::append(self, user, body).await
    }

    async fn history(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        Self::history(self).await
    }
}
