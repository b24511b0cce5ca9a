use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

/// Seconds per question suggested to client timers when the creator does not
/// pick a limit. Advisory only, nothing server-side enforces it.
pub const DEFAULT_TIME_LIMIT_SECONDS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "quiz_state", rename_all = "lowercase")]
pub enum QuizState {
    Waiting,
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl QuizQuestion {
    /// An answer matching no option is just wrong, not an error.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.options
            .get(self.correct_index)
            .is_some_and(|key| key == answer)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    pub id: Uuid,
    pub classroom_id: Uuid,
    pub created_by: String,

    pub question_set: Vec<QuizQuestion>,

    /// Classroom members who joined while the session was waiting. The
    /// creator is always the first entry.
    pub participants: Vec<String>,

    /// One entry per participant, starting at 0.
    pub scores: HashMap<String, u32>,

    /// Shared cursor: any participant's submission advances the question
    /// for everyone.
    pub current_question: usize,

    pub state: QuizState,
    pub time_limit_seconds: u32,
    pub team_mode: bool,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    pub fn is_participant(&self, member: &str) -> bool {
        self.participants.iter().any(|p| p == member)
    }
}

/// What a single answer submission did, echoed back to the submitter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    pub has_next_question: bool,
    pub completed: bool,
}
