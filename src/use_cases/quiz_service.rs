use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::quiz::{
        AnswerOutcome, DEFAULT_TIME_LIMIT_SECONDS, QuizQuestion, QuizSession, QuizState,
    },
    use_cases::{
        classroom_database::ClassroomDatabase,
        entity_locks::EntityLocks,
        quiz_database::{AnswerProgress, QuizDatabase},
    },
};

type QuizResult<T> = Result<T, QuizError>;

pub async fn create_session(
    quiz_db: Arc<impl QuizDatabase>,
    classroom_db: Arc<impl ClassroomDatabase>,
    classroom_id: Uuid,
    creator: String,
    question_set: Vec<QuizQuestion>,
    time_limit_seconds: Option<u32>,
    team_mode: bool,
) -> QuizResult<QuizSession> {
    if question_set.is_empty() {
        return Err(QuizError::EmptyQuestionSet);
    }

    // Membership is checked once, here; later roster changes do not touch
    // the session.
    let classroom = classroom_db
        .classroom_by_id(classroom_id)
        .await
        .map_err(|err| QuizError::DatabaseError(err.to_string()))?
        .ok_or(QuizError::ClassroomNotFound)?;

    if !classroom.is_member(&creator) {
        return Err(QuizError::NotClassroomMember);
    }

    let session = QuizSession {
        id: Uuid::new_v4(),
        classroom_id,
        created_by: creator.clone(),
        question_set,
        participants: vec![creator.clone()],
        scores: HashMap::from([(creator, 0)]),
        current_question: 0,
        state: QuizState::Waiting,
        time_limit_seconds: time_limit_seconds.unwrap_or(DEFAULT_TIME_LIMIT_SECONDS),
        team_mode,
        created_at: Utc::now(),
        started_at: None,
        completed_at: None,
    };

    quiz_db
        .insert_session(session.clone())
        .await
        .map_err(|err| QuizError::DatabaseError(err.to_string()))?;

    info!(
        "quiz session {} created in classroom {} by {}",
        session.id, classroom_id, session.created_by
    );

    Ok(session)
}

pub async fn join_session(
    quiz_db: Arc<impl QuizDatabase>,
    classroom_db: Arc<impl ClassroomDatabase>,
    locks: Arc<EntityLocks>,
    session_id: Uuid,
    member: String,
) -> QuizResult<QuizSession> {
    let _guard = locks.acquire(session_id).await;

    let mut session = quiz_db
        .session_by_id(session_id)
        .await
        .map_err(|err| QuizError::DatabaseError(err.to_string()))?
        .ok_or(QuizError::SessionNotFound)?;

    if session.state != QuizState::Waiting {
        return Err(QuizError::NotWaiting);
    }

    if session.is_participant(&member) {
        return Err(QuizError::AlreadyParticipant);
    }

    // Point-in-time snapshot of the roster; a classroom that no longer
    // exists has no members to admit.
    let classroom = classroom_db
        .classroom_by_id(session.classroom_id)
        .await
        .map_err(|err| QuizError::DatabaseError(err.to_string()))?;

    if !classroom.is_some_and(|classroom| classroom.is_member(&member)) {
        return Err(QuizError::NotClassroomMember);
    }

    quiz_db
        .add_participant(session_id, member.clone())
        .await
        .map_err(|err| QuizError::DatabaseError(err.to_string()))?;

    session.scores.insert(member.clone(), 0);
    session.participants.push(member);

    Ok(session)
}

pub async fn start_session(
    quiz_db: Arc<impl QuizDatabase>,
    locks: Arc<EntityLocks>,
    session_id: Uuid,
    requester: String,
) -> QuizResult<QuizSession> {
    let _guard = locks.acquire(session_id).await;

    let mut session = quiz_db
        .session_by_id(session_id)
        .await
        .map_err(|err| QuizError::DatabaseError(err.to_string()))?
        .ok_or(QuizError::SessionNotFound)?;

    if session.created_by != requester {
        return Err(QuizError::NotCreator);
    }

    if session.state != QuizState::Waiting {
        return Err(QuizError::NotWaiting);
    }

    let started_at = Utc::now();

    quiz_db
        .mark_started(session_id, started_at)
        .await
        .map_err(|err| QuizError::DatabaseError(err.to_string()))?;

    session.state = QuizState::Active;
    session.started_at = Some(started_at);

    info!(
        "quiz session {session_id} started with {} participants",
        session.participants.len()
    );

    Ok(session)
}

pub async fn submit_answer(
    quiz_db: Arc<impl QuizDatabase>,
    locks: Arc<EntityLocks>,
    session_id: Uuid,
    participant: String,
    answer: String,
) -> QuizResult<AnswerOutcome> {
    let _guard = locks.acquire(session_id).await;

    let session = quiz_db
        .session_by_id(session_id)
        .await
        .map_err(|err| QuizError::DatabaseError(err.to_string()))?
        .ok_or(QuizError::SessionNotFound)?;

    if session.state != QuizState::Active {
        return Err(QuizError::NotActive);
    }

    if !session.is_participant(&participant) {
        return Err(QuizError::NotParticipant);
    }

    // Active implies the cursor is still inside the question set.
    let question = &session.question_set[session.current_question];
    let correct = question.is_correct(&answer);

    let previous = session.scores.get(&participant).copied().unwrap_or(0);
    let score = if correct { previous + 1 } else { previous };

    // Answering, not answering correctly, is what advances the shared
    // cursor.
    let current_question = session.current_question + 1;
    let completed = current_question == session.question_set.len();

    let (state, completed_at) = if completed {
        (QuizState::Completed, Some(Utc::now()))
    } else {
        (QuizState::Active, None)
    };

    quiz_db
        .record_answer(
            session_id,
            AnswerProgress {
                participant,
                score,
                current_question,
                state,
                completed_at,
            },
        )
        .await
        .map_err(|err| QuizError::DatabaseError(err.to_string()))?;

    if completed {
        info!("quiz session {session_id} completed");
    }

    Ok(AnswerOutcome {
        correct,
        has_next_question: !completed,
        completed,
    })
}

pub async fn get_session(
    quiz_db: Arc<impl QuizDatabase>,
    session_id: Uuid,
    requester: String,
) -> QuizResult<QuizSession> {
    let session = quiz_db
        .session_by_id(session_id)
        .await
        .map_err(|err| QuizError::DatabaseError(err.to_string()))?
        .ok_or(QuizError::SessionNotFound)?;

    if !session.is_participant(&requester) {
        return Err(QuizError::NotParticipant);
    }

    Ok(session)
}

pub async fn list_sessions(quiz_db: Arc<impl QuizDatabase>) -> QuizResult<Vec<QuizSession>> {
    quiz_db
        .all_sessions()
        .await
        .map_err(|err| QuizError::DatabaseError(err.to_string()))
}

pub async fn sessions_for_classroom(
    quiz_db: Arc<impl QuizDatabase>,
    classroom_id: Uuid,
) -> QuizResult<Vec<QuizSession>> {
    quiz_db
        .sessions_for_classroom(classroom_id)
        .await
        .map_err(|err| QuizError::DatabaseError(err.to_string()))
}

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("quiz needs at least one question")]
    EmptyQuestionSet,
    #[error("quiz session not found")]
    SessionNotFound,
    #[error("classroom not found")]
    ClassroomNotFound,
    #[error("not a member of this classroom")]
    NotClassroomMember,
    #[error("quiz session has already started or ended")]
    NotWaiting,
    #[error("quiz session is not active")]
    NotActive,
    #[error("already participating in this quiz")]
    AlreadyParticipant,
    #[error("not participating in this quiz")]
    NotParticipant,
    #[error("only the quiz creator can start the session")]
    NotCreator,
    #[error("database error: {0}")]
    DatabaseError(String),
}
