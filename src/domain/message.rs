use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomMessage {
    pub id: Uuid,
    pub classroom_id: Uuid,

    /// Checked against classroom membership at posting time only.
    pub sender: String,

    pub body: String,

    /// Free-form tag, e.g. "text", "system", "quiz".
    pub kind: String,

    pub created_at: DateTime<Utc>,
}
