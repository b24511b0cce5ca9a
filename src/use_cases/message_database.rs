use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::message::ClassroomMessage;

pub type MessageDatabaseResult<T> = Result<T, MessageDatabaseError>;

/// Append-only per-classroom message log; reads come back in insertion
/// order.
#[automock]
pub trait MessageDatabase: Send + Sync {
    async fn append_message(&self, message: ClassroomMessage) -> MessageDatabaseResult<()>;

    async fn messages_for_classroom(
        &self,
        classroom_id: Uuid,
    ) -> MessageDatabaseResult<Vec<ClassroomMessage>>;
}

#[derive(Debug, Error)]
pub enum MessageDatabaseError {
    #[error("Internal DB error: {0}")]
    InternalDBError(String),
}
