use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::classroom::Classroom;

pub type ClassroomDatabaseResult<T> = Result<T, ClassroomDatabaseError>;

/// Keyed store for classrooms. Each call is atomic on its own; callers
/// serialize multi-call sequences with the classroom's entity lock.
#[automock]
pub trait ClassroomDatabase: Send + Sync {
    async fn insert_classroom(&self, classroom: Classroom) -> ClassroomDatabaseResult<()>;

    async fn classroom_by_id(
        &self,
        classroom_id: Uuid,
    ) -> ClassroomDatabaseResult<Option<Classroom>>;

    async fn all_classrooms(&self) -> ClassroomDatabaseResult<Vec<Classroom>>;

    /// Appends to the member list, preserving join order.
    async fn add_member(&self, classroom_id: Uuid, member: String) -> ClassroomDatabaseResult<()>;

    async fn remove_member(&self, classroom_id: Uuid, member: String)
    -> ClassroomDatabaseResult<()>;

    async fn set_owner(&self, classroom_id: Uuid, owner: String) -> ClassroomDatabaseResult<()>;

    async fn delete_classroom(&self, classroom_id: Uuid) -> ClassroomDatabaseResult<()>;
}

#[derive(Debug, Error)]
pub enum ClassroomDatabaseError {
    #[error("Internal DB error: {0}")]
    InternalDBError(String),
}
