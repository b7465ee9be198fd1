use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ConversationMessage, NewSession, RegimeAnalytics, SessionRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for computed sessions and their advisory conversations.
///
/// Lookups report a missing session as [`RepositoryError::NotFound`] rather
/// than an empty value, so "absent" and "failed" stay distinguishable.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    // Sessions
    async fn create_session(
        &self,
        session: NewSession,
    ) -> Result<SessionRecord, RepositoryError>;

    async fn get_session(
        &self,
        session_id: Uuid,
    ) -> Result<SessionRecord, RepositoryError>;

    /// Newest first.
    async fn list_session_ids(&self) -> Result<Vec<Uuid>, RepositoryError>;

    // Conversation log
    async fn append_message(
        &self,
        session_id: Uuid,
        message: &ConversationMessage,
    ) -> Result<(), RepositoryError>;

    /// In the order they were appended.
    async fn list_messages(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<ConversationMessage>, RepositoryError>;

    // Analytics
    async fn regime_analytics(&self) -> Result<RegimeAnalytics, RepositoryError>;
}
