//! Follow-up questions and tax-saving suggestions for a stored session.
//!
//! The text itself comes from an external [`AdvisoryService`] (typically a
//! hosted language model) whose output has no guaranteed structure. The
//! [`Advisor`] composes prompts from the stored
//! [`FinancialInput`](crate::models::FinancialInput), calls the
//! service, and records the exchange in the session's conversation log.

pub mod prompt;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::repository::{RepositoryError, SessionRepository};
use crate::models::{ConversationMessage, SessionRecord};

pub use prompt::{followup_prompt, suggestion_prompt};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisoryError {
    #[error("session {0} not found")]
    SessionNotFound(Uuid),

    #[error("an answer is required before suggestions can be generated")]
    EmptyAnswer,

    #[error("could not load session: {0}")]
    Repository(#[from] RepositoryError),

    #[error("advisory service failed: {0}")]
    Service(String),
}

/// Opaque text-in/text-out generator.
#[async_trait]
pub trait AdvisoryService: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
    ) -> Result<String, AdvisoryError>;
}

/// Whether the exchange made it into the conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutcome {
    Recorded,
    Failed(RepositoryError),
}

impl LogOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, LogOutcome::Recorded)
    }
}

/// Generated text plus the fate of its log entry. A failed log write does not
/// throw the advice away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice {
    pub content: String,
    pub log: LogOutcome,
}

pub struct Advisor<'a> {
    repo: &'a dyn SessionRepository,
    service: &'a dyn AdvisoryService,
}

impl<'a> Advisor<'a> {
    pub fn new(
        repo: &'a dyn SessionRepository,
        service: &'a dyn AdvisoryService,
    ) -> Self {
        Self { repo, service }
    }

    /// Generates one follow-up question for the session and logs it.
    pub async fn ask_followup(
        &self,
        session_id: Uuid,
    ) -> Result<Advice, AdvisoryError> {
        let session = self.load(session_id).await?;
        let question = self
            .service
            .generate(&followup_prompt(&session.input))
            .await?;

        let log = self
            .record(session_id, &[ConversationMessage::question(&question)])
            .await;
        info!(%session_id, logged = log.is_recorded(), "follow-up question generated");

        Ok(Advice {
            content: question,
            log,
        })
    }

    /// Generates suggestions from the user's answer; logs the answer, then the
    /// suggestion.
    pub async fn suggest(
        &self,
        session_id: Uuid,
        user_answer: &str,
    ) -> Result<Advice, AdvisoryError> {
        if user_answer.trim().is_empty() {
            return Err(AdvisoryError::EmptyAnswer);
        }

        let session = self.load(session_id).await?;
        let suggestion = self
            .service
            .generate(&suggestion_prompt(&session.input, user_answer))
            .await?;

        let log = self
            .record(
                session_id,
                &[
                    ConversationMessage::answer(user_answer),
                    ConversationMessage::suggestion(&suggestion),
                ],
            )
            .await;
        info!(%session_id, logged = log.is_recorded(), "suggestions generated");

        Ok(Advice {
            content: suggestion,
            log,
        })
    }

    async fn load(
        &self,
        session_id: Uuid,
    ) -> Result<SessionRecord, AdvisoryError> {
        self.repo
            .get_session(session_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AdvisoryError::SessionNotFound(session_id),
                other => AdvisoryError::Repository(other),
            })
    }

    /// Stops at the first failed write.
    async fn record(
        &self,
        session_id: Uuid,
        messages: &[ConversationMessage],
    ) -> LogOutcome {
        for message in messages {
            if let Err(error) = self.repo.append_message(session_id, message).await {
                warn!(%session_id, %error, "conversation log write failed");
                return LogOutcome::Failed(error);
            }
        }
        LogOutcome::Recorded
    }
}
