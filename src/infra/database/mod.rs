use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, postgres::PgPoolOptions, types::Json};
use uuid::Uuid;

use crate::{
    domain::{
        classroom::Classroom,
        message::ClassroomMessage,
        quiz::{QuizQuestion, QuizSession, QuizState},
    },
    use_cases::{
        classroom_database::{ClassroomDatabase, ClassroomDatabaseError, ClassroomDatabaseResult},
        message_database::{MessageDatabase, MessageDatabaseError, MessageDatabaseResult},
        quiz_database::{AnswerProgress, QuizDatabase, QuizDatabaseError, QuizDatabaseResult},
    },
};

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(16)
            .connect(database_url)
            .await?;

        sqlx::migrate!().run(&pool).await?;

        Ok(Self { pool })
    }
}

#[derive(FromRow)]
struct ClassroomRow {
    id: Uuid,
    name: String,
    description: String,
    subject: String,
    owner: String,
    capacity: i32,
    active: bool,
    created_at: DateTime<Utc>,
}

impl ClassroomRow {
    fn into_classroom(self, members: Vec<String>) -> Classroom {
        Classroom {
            id: self.id,
            name: self.name,
            description: self.description,
            subject: self.subject,
            owner: self.owner,
            members,
            capacity: self.capacity as u32,
            active: self.active,
            created_at: self.created_at,
        }
    }
}

impl ClassroomDatabase for PostgresDatabase {
    async fn insert_classroom(&self, classroom: Classroom) -> ClassroomDatabaseResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| ClassroomDatabaseError::InternalDBError(err.to_string()))?;

        sqlx::query(
            "INSERT INTO classrooms (id, name, description, subject, owner, capacity, active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(classroom.id)
        .bind(&classroom.name)
        .bind(&classroom.description)
        .bind(&classroom.subject)
        .bind(&classroom.owner)
        .bind(classroom.capacity as i32)
        .bind(classroom.active)
        .bind(classroom.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| ClassroomDatabaseError::InternalDBError(err.to_string()))?;

        for member in &classroom.members {
            sqlx::query("INSERT INTO classroom_members (classroom_id, member) VALUES ($1, $2)")
                .bind(classroom.id)
                .bind(member)
                .execute(&mut *tx)
                .await
                .map_err(|err| ClassroomDatabaseError::InternalDBError(err.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|err| ClassroomDatabaseError::InternalDBError(err.to_string()))?;

        Ok(())
    }

    async fn classroom_by_id(
        &self,
        classroom_id: Uuid,
    ) -> ClassroomDatabaseResult<Option<Classroom>> {
        let row = sqlx::query_as::<_, ClassroomRow>(
            "SELECT id, name, description, subject, owner, capacity, active, created_at
             FROM classrooms WHERE id = $1",
        )
        .bind(classroom_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| ClassroomDatabaseError::InternalDBError(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let members: Vec<(String,)> = sqlx::query_as(
            "SELECT member FROM classroom_members WHERE classroom_id = $1 ORDER BY seq",
        )
        .bind(classroom_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| ClassroomDatabaseError::InternalDBError(err.to_string()))?;

        Ok(Some(row.into_classroom(
            members.into_iter().map(|(member,)| member).collect(),
        )))
    }

    async fn all_classrooms(&self) -> ClassroomDatabaseResult<Vec<Classroom>> {
        let rows = sqlx::query_as::<_, ClassroomRow>(
            "SELECT id, name, description, subject, owner, capacity, active, created_at
             FROM classrooms ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| ClassroomDatabaseError::InternalDBError(err.to_string()))?;

        let members: Vec<(Uuid, String)> =
            sqlx::query_as("SELECT classroom_id, member FROM classroom_members ORDER BY seq")
                .fetch_all(&self.pool)
                .await
                .map_err(|err| ClassroomDatabaseError::InternalDBError(err.to_string()))?;

        let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (classroom_id, member) in members {
            grouped.entry(classroom_id).or_default().push(member);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let members = grouped.remove(&row.id).unwrap_or_default();
                row.into_classroom(members)
            })
            .collect())
    }

    async fn add_member(&self, classroom_id: Uuid, member: String) -> ClassroomDatabaseResult<()> {
        sqlx::query("INSERT INTO classroom_members (classroom_id, member) VALUES ($1, $2)")
            .bind(classroom_id)
            .bind(member)
            .execute(&self.pool)
            .await
            .map_err(|err| ClassroomDatabaseError::InternalDBError(err.to_string()))?;

        Ok(())
    }

    async fn remove_member(
        &self,
        classroom_id: Uuid,
        member: String,
    ) -> ClassroomDatabaseResult<()> {
        sqlx::query("DELETE FROM classroom_members WHERE classroom_id = $1 AND member = $2")
            .bind(classroom_id)
            .bind(member)
            .execute(&self.pool)
            .await
            .map_err(|err| ClassroomDatabaseError::InternalDBError(err.to_string()))?;

        Ok(())
    }

    async fn set_owner(&self, classroom_id: Uuid, owner: String) -> ClassroomDatabaseResult<()> {
        sqlx::query("UPDATE classrooms SET owner = $2 WHERE id = $1")
            .bind(classroom_id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|err| ClassroomDatabaseError::InternalDBError(err.to_string()))?;

        Ok(())
    }

    async fn delete_classroom(&self, classroom_id: Uuid) -> ClassroomDatabaseResult<()> {
        sqlx::query("DELETE FROM classrooms WHERE id = $1")
            .bind(classroom_id)
            .execute(&self.pool)
            .await
            .map_err(|err| ClassroomDatabaseError::InternalDBError(err.to_string()))?;

        Ok(())
    }
}

#[derive(FromRow)]
struct SessionRow {
    id: Uuid,
    classroom_id: Uuid,
    created_by: String,
    question_set: Json<Vec<QuizQuestion>>,
    state: QuizState,
    current_question: i64,
    time_limit_seconds: i32,
    team_mode: bool,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl SessionRow {
    fn into_session(self, roster: Vec<(String, i64)>) -> QuizSession {
        let mut participants = Vec::with_capacity(roster.len());
        let mut scores = HashMap::with_capacity(roster.len());

        for (member, score) in roster {
            scores.insert(member.clone(), score as u32);
            participants.push(member);
        }

        QuizSession {
            id: self.id,
            classroom_id: self.classroom_id,
            created_by: self.created_by,
            question_set: self.question_set.0,
            participants,
            scores,
            current_question: self.current_question as usize,
            state: self.state,
            time_limit_seconds: self.time_limit_seconds as u32,
            team_mode: self.team_mode,
            created_at: self.created_at,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

const SESSION_COLUMNS: &str = "id, classroom_id, created_by, question_set, state, \
     current_question, time_limit_seconds, team_mode, created_at, started_at, completed_at";

impl PostgresDatabase {
    async fn session_roster(&self, session_id: Uuid) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as("SELECT member, score FROM quiz_participants WHERE session_id = $1 ORDER BY seq")
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn sessions_from_rows(
        &self,
        rows: Vec<SessionRow>,
    ) -> Result<Vec<QuizSession>, sqlx::Error> {
        let roster: Vec<(Uuid, String, i64)> =
            sqlx::query_as("SELECT session_id, member, score FROM quiz_participants ORDER BY seq")
                .fetch_all(&self.pool)
                .await?;

        let mut grouped: HashMap<Uuid, Vec<(String, i64)>> = HashMap::new();
        for (session_id, member, score) in roster {
            grouped.entry(session_id).or_default().push((member, score));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let roster = grouped.remove(&row.id).unwrap_or_default();
                row.into_session(roster)
            })
            .collect())
    }
}

impl QuizDatabase for PostgresDatabase {
    async fn insert_session(&self, session: QuizSession) -> QuizDatabaseResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        sqlx::query(
            "INSERT INTO quiz_sessions (id, classroom_id, created_by, question_set, state,
                 current_question, time_limit_seconds, team_mode, created_at, started_at, completed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(session.id)
        .bind(session.classroom_id)
        .bind(&session.created_by)
        .bind(Json(&session.question_set))
        .bind(session.state)
        .bind(session.current_question as i64)
        .bind(session.time_limit_seconds as i32)
        .bind(session.team_mode)
        .bind(session.created_at)
        .bind(session.started_at)
        .bind(session.completed_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        for participant in &session.participants {
            let score = session.scores.get(participant).copied().unwrap_or(0);

            sqlx::query(
                "INSERT INTO quiz_participants (session_id, member, score) VALUES ($1, $2, $3)",
            )
            .bind(session.id)
            .bind(participant)
            .bind(score as i64)
            .execute(&mut *tx)
            .await
            .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        Ok(())
    }

    async fn session_by_id(&self, session_id: Uuid) -> QuizDatabaseResult<Option<QuizSession>> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM quiz_sessions WHERE id = $1"
        ))
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let roster = self
            .session_roster(session_id)
            .await
            .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        Ok(Some(row.into_session(roster)))
    }

    async fn all_sessions(&self) -> QuizDatabaseResult<Vec<QuizSession>> {
        let rows = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM quiz_sessions ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        self.sessions_from_rows(rows)
            .await
            .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))
    }

    async fn sessions_for_classroom(
        &self,
        classroom_id: Uuid,
    ) -> QuizDatabaseResult<Vec<QuizSession>> {
        let rows = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM quiz_sessions WHERE classroom_id = $1 ORDER BY created_at"
        ))
        .bind(classroom_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        self.sessions_from_rows(rows)
            .await
            .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))
    }

    async fn add_participant(&self, session_id: Uuid, member: String) -> QuizDatabaseResult<()> {
        sqlx::query("INSERT INTO quiz_participants (session_id, member, score) VALUES ($1, $2, 0)")
            .bind(session_id)
            .bind(member)
            .execute(&self.pool)
            .await
            .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        Ok(())
    }

    async fn mark_started(
        &self,
        session_id: Uuid,
        started_at: DateTime<Utc>,
    ) -> QuizDatabaseResult<()> {
        sqlx::query("UPDATE quiz_sessions SET state = $2, started_at = $3 WHERE id = $1")
            .bind(session_id)
            .bind(QuizState::Active)
            .bind(started_at)
            .execute(&self.pool)
            .await
            .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        Ok(())
    }

    async fn record_answer(
        &self,
        session_id: Uuid,
        progress: AnswerProgress,
    ) -> QuizDatabaseResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        sqlx::query(
            "UPDATE quiz_sessions
             SET current_question = $2, state = $3, completed_at = COALESCE($4, completed_at)
             WHERE id = $1",
        )
        .bind(session_id)
        .bind(progress.current_question as i64)
        .bind(progress.state)
        .bind(progress.completed_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        sqlx::query("UPDATE quiz_participants SET score = $3 WHERE session_id = $1 AND member = $2")
            .bind(session_id)
            .bind(&progress.participant)
            .bind(progress.score as i64)
            .execute(&mut *tx)
            .await
            .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        tx.commit()
            .await
            .map_err(|err| QuizDatabaseError::InternalDBError(err.to_string()))?;

        Ok(())
    }
}

impl MessageDatabase for PostgresDatabase {
    async fn append_message(&self, message: ClassroomMessage) -> MessageDatabaseResult<()> {
        sqlx::query(
            "INSERT INTO classroom_messages (id, classroom_id, sender, body, kind, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(message.id)
        .bind(message.classroom_id)
        .bind(&message.sender)
        .bind(&message.body)
        .bind(&message.kind)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| MessageDatabaseError::InternalDBError(err.to_string()))?;

        Ok(())
    }

    async fn messages_for_classroom(
        &self,
        classroom_id: Uuid,
    ) -> MessageDatabaseResult<Vec<ClassroomMessage>> {
        sqlx::query_as::<_, ClassroomMessage>(
            "SELECT id, classroom_id, sender, body, kind, created_at
             FROM classroom_messages WHERE classroom_id = $1 ORDER BY seq",
        )
        .bind(classroom_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| MessageDatabaseError::InternalDBError(err.to_string()))
    }
}
