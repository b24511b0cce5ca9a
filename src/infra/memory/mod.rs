use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::{
    domain::{
        classroom::Classroom,
        message::ClassroomMessage,
        quiz::{QuizSession, QuizState},
    },
    use_cases::{
        classroom_database::{ClassroomDatabase, ClassroomDatabaseError, ClassroomDatabaseResult},
        message_database::{MessageDatabase, MessageDatabaseResult},
        quiz_database::{AnswerProgress, QuizDatabase, QuizDatabaseError, QuizDatabaseResult},
    },
};

/// Keyed in-memory store. Every trait call touches a single dashmap entry,
/// so each call is atomic on its own; multi-call sequences rely on the
/// caller-held entity lock.
#[derive(Default)]
pub struct MemoryDatabase {
    classrooms: DashMap<Uuid, Classroom>,
    sessions: DashMap<Uuid, QuizSession>,
    messages: DashMap<Uuid, Vec<ClassroomMessage>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClassroomDatabase for MemoryDatabase {
    async fn insert_classroom(&self, classroom: Classroom) -> ClassroomDatabaseResult<()> {
        self.classrooms.insert(classroom.id, classroom);
        Ok(())
    }

    async fn classroom_by_id(
        &self,
        classroom_id: Uuid,
    ) -> ClassroomDatabaseResult<Option<Classroom>> {
        Ok(self
            .classrooms
            .get(&classroom_id)
            .map(|entry| entry.value().clone()))
    }

    async fn all_classrooms(&self) -> ClassroomDatabaseResult<Vec<Classroom>> {
        Ok(self
            .classrooms
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn add_member(&self, classroom_id: Uuid, member: String) -> ClassroomDatabaseResult<()> {
        match self.classrooms.get_mut(&classroom_id) {
            Some(mut entry) => {
                entry.members.push(member);
                Ok(())
            }
            None => Err(ClassroomDatabaseError::InternalDBError(format!(
                "classroom {classroom_id} does not exist"
            ))),
        }
    }

    async fn remove_member(
        &self,
        classroom_id: Uuid,
        member: String,
    ) -> ClassroomDatabaseResult<()> {
        match self.classrooms.get_mut(&classroom_id) {
            Some(mut entry) => {
                entry.members.retain(|m| *m != member);
                Ok(())
            }
            None => Err(ClassroomDatabaseError::InternalDBError(format!(
                "classroom {classroom_id} does not exist"
            ))),
        }
    }

    async fn set_owner(&self, classroom_id: Uuid, owner: String) -> ClassroomDatabaseResult<()> {
        match self.classrooms.get_mut(&classroom_id) {
            Some(mut entry) => {
                entry.owner = owner;
                Ok(())
            }
            None => Err(ClassroomDatabaseError::InternalDBError(format!(
                "classroom {classroom_id} does not exist"
            ))),
        }
    }

    async fn delete_classroom(&self, classroom_id: Uuid) -> ClassroomDatabaseResult<()> {
        self.classrooms.remove(&classroom_id);
        Ok(())
    }
}

impl QuizDatabase for MemoryDatabase {
    async fn insert_session(&self, session: QuizSession) -> QuizDatabaseResult<()> {
        self.sessions.insert(session.id, session);
        Ok(())
    }

    async fn session_by_id(&self, session_id: Uuid) -> QuizDatabaseResult<Option<QuizSession>> {
        Ok(self
            .sessions
            .get(&session_id)
            .map(|entry| entry.value().clone()))
    }

    async fn all_sessions(&self) -> QuizDatabaseResult<Vec<QuizSession>> {
        Ok(self
            .sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn sessions_for_classroom(
        &self,
        classroom_id: Uuid,
    ) -> QuizDatabaseResult<Vec<QuizSession>> {
        Ok(self
            .sessions
            .iter()
            .filter(|entry| entry.classroom_id == classroom_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn add_participant(&self, session_id: Uuid, member: String) -> QuizDatabaseResult<()> {
        match self.sessions.get_mut(&session_id) {
            Some(mut entry) => {
                entry.scores.insert(member.clone(), 0);
                entry.participants.push(member);
                Ok(())
            }
            None => Err(QuizDatabaseError::InternalDBError(format!(
                "quiz session {session_id} does not exist"
            ))),
        }
    }

    async fn mark_started(
        &self,
        session_id: Uuid,
        started_at: DateTime<Utc>,
    ) -> QuizDatabaseResult<()> {
        match self.sessions.get_mut(&session_id) {
            Some(mut entry) => {
                entry.state = QuizState::Active;
                entry.started_at = Some(started_at);
                Ok(())
            }
            None => Err(QuizDatabaseError::InternalDBError(format!(
                "quiz session {session_id} does not exist"
            ))),
        }
    }

    async fn record_answer(
        &self,
        session_id: Uuid,
        progress: AnswerProgress,
    ) -> QuizDatabaseResult<()> {
        match self.sessions.get_mut(&session_id) {
            Some(mut entry) => {
                entry.scores.insert(progress.participant, progress.score);
                entry.current_question = progress.current_question;
                entry.state = progress.state;
                if progress.completed_at.is_some() {
                    entry.completed_at = progress.completed_at;
                }
                Ok(())
            }
            None => Err(QuizDatabaseError::InternalDBError(format!(
                "quiz session {session_id} does not exist"
            ))),
        }
    }
}

impl MessageDatabase for MemoryDatabase {
    async fn append_message(&self, message: ClassroomMessage) -> MessageDatabaseResult<()> {
        self.messages
            .entry(message.classroom_id)
            .or_default()
            .push(message);
        Ok(())
    }

    async fn messages_for_classroom(
        &self,
        classroom_id: Uuid,
    ) -> MessageDatabaseResult<Vec<ClassroomMessage>> {
        Ok(self
            .messages
            .get(&classroom_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
