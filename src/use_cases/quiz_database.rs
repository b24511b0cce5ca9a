use chrono::{DateTime, Utc};
use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::quiz::{QuizSession, QuizState};

pub type QuizDatabaseResult<T> = Result<T, QuizDatabaseError>;

/// The full effect of one answer submission, applied as a single atomic
/// write: the submitter's new score plus the shared cursor and state.
#[derive(Debug, Clone)]
pub struct AnswerProgress {
    pub participant: String,
    pub score: u32,
    pub current_question: usize,
    pub state: QuizState,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Keyed store for quiz sessions, the registry of active and past runs.
#[automock]
pub trait QuizDatabase: Send + Sync {
    async fn insert_session(&self, session: QuizSession) -> QuizDatabaseResult<()>;

    async fn session_by_id(&self, session_id: Uuid) -> QuizDatabaseResult<Option<QuizSession>>;

    async fn all_sessions(&self) -> QuizDatabaseResult<Vec<QuizSession>>;

    async fn sessions_for_classroom(
        &self,
        classroom_id: Uuid,
    ) -> QuizDatabaseResult<Vec<QuizSession>>;

    /// New participants start at score 0.
    async fn add_participant(&self, session_id: Uuid, member: String) -> QuizDatabaseResult<()>;

    async fn mark_started(
        &self,
        session_id: Uuid,
        started_at: DateTime<Utc>,
    ) -> QuizDatabaseResult<()>;

    async fn record_answer(
        &self,
        session_id: Uuid,
        progress: AnswerProgress,
    ) -> QuizDatabaseResult<()>;
}

#[derive(Debug, Error)]
pub enum QuizDatabaseError {
    #[error("Internal DB error: {0}")]
    InternalDBError(String),
}
