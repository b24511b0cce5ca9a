use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Member cap applied when the creator does not pick one.
pub const DEFAULT_CAPACITY: u32 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub subject: String,

    /// Always one of `members`; reassigned when the owner leaves.
    pub owner: String,

    /// Kept in join order: ownership transfers to the first entry left.
    pub members: Vec<String>,

    pub capacity: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Classroom {
    pub fn is_member(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }

    pub fn is_full(&self) -> bool {
        self.members.len() as u32 >= self.capacity
    }
}
