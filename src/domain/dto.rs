use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    classroom::Classroom,
    quiz::{QuizSession, QuizState},
};

/// Listing view of a classroom; omits the member roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomSummary {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub owner: String,
    pub member_count: usize,
    pub capacity: u32,
    pub is_member: bool,
    pub created_at: DateTime<Utc>,
}

impl ClassroomSummary {
    pub fn for_viewer(classroom: &Classroom, viewer: &str) -> Self {
        Self {
            id: classroom.id,
            name: classroom.name.clone(),
            subject: classroom.subject.clone(),
            owner: classroom.owner.clone(),
            member_count: classroom.members.len(),
            capacity: classroom.capacity,
            is_member: classroom.is_member(viewer),
            created_at: classroom.created_at,
        }
    }
}

/// Listing view of a quiz session; never exposes the question set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: Uuid,
    pub classroom_id: Uuid,
    pub created_by: String,
    pub state: QuizState,
    pub question_count: usize,
    pub participant_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&QuizSession> for SessionSummary {
    fn from(session: &QuizSession) -> Self {
        Self {
            id: session.id,
            classroom_id: session.classroom_id,
            created_by: session.created_by.clone(),
            state: session.state,
            question_count: session.question_set.len(),
            participant_count: session.participants.len(),
            created_at: session.created_at,
        }
    }
}
