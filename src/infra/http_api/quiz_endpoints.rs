use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{dto::SessionSummary, quiz::QuizQuestion},
    infra::http_api::{AppState, middleware_auth::MemberIdentity},
    use_cases::quiz_service::{
        QuizError, create_session, get_session, join_session, list_sessions,
        sessions_for_classroom, start_session, submit_answer,
    },
};

#[derive(Deserialize, Serialize)]
pub struct SessionInfo {
    classroom_id: Uuid,
    questions: Vec<QuizQuestion>,
    time_limit_seconds: Option<u32>,
    #[serde(default = "default_team_mode")]
    team_mode: bool,
}

fn default_team_mode() -> bool {
    true
}

#[derive(Deserialize, Serialize)]
pub struct AnswerInfo {
    answer: String,
}

fn quiz_status(err: &QuizError) -> StatusCode {
    match err {
        QuizError::SessionNotFound | QuizError::ClassroomNotFound => StatusCode::NOT_FOUND,
        QuizError::NotClassroomMember | QuizError::NotParticipant | QuizError::NotCreator => {
            StatusCode::FORBIDDEN
        }
        QuizError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

pub async fn create_session_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Json(info): Json<SessionInfo>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match create_session(
        state.db.clone(),
        state.db,
        info.classroom_id,
        member,
        info.questions,
        info.time_limit_seconds,
        info.team_mode,
    )
    .await
    {
        Ok(session) => Ok((StatusCode::CREATED, Json(session))),
        Err(err) => Err((quiz_status(&err), err.to_string())),
    }
}

pub async fn list_sessions_end(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match list_sessions(state.db).await {
        Ok(sessions) => {
            let summaries: Vec<SessionSummary> = sessions.iter().map(SessionSummary::from).collect();

            Ok((StatusCode::OK, Json(summaries)))
        }
        Err(err) => Err((quiz_status(&err), err.to_string())),
    }
}

pub async fn classroom_sessions_end(
    State(state): State<AppState>,
    Path(classroom_id): Path<Uuid>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match sessions_for_classroom(state.db, classroom_id).await {
        Ok(sessions) => {
            let summaries: Vec<SessionSummary> = sessions.iter().map(SessionSummary::from).collect();

            Ok((StatusCode::OK, Json(summaries)))
        }
        Err(err) => Err((quiz_status(&err), err.to_string())),
    }
}

pub async fn get_session_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match get_session(state.db, session_id, member).await {
        Ok(session) => Ok((StatusCode::OK, Json(session))),
        Err(err) => Err((quiz_status(&err), err.to_string())),
    }
}

pub async fn join_session_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match join_session(
        state.db.clone(),
        state.db,
        state.locks,
        session_id,
        member,
    )
    .await
    {
        Ok(session) => Ok((StatusCode::OK, Json(session))),
        Err(err) => Err((quiz_status(&err), err.to_string())),
    }
}

pub async fn start_session_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match start_session(state.db, state.locks, session_id, member).await {
        Ok(session) => Ok((StatusCode::OK, Json(session))),
        Err(err) => Err((quiz_status(&err), err.to_string())),
    }
}

pub async fn submit_answer_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Path(session_id): Path<Uuid>,
    Json(info): Json<AnswerInfo>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match submit_answer(state.db, state.locks, session_id, member, info.answer).await {
        Ok(outcome) => Ok((StatusCode::OK, Json(outcome))),
        Err(err) => Err((quiz_status(&err), err.to_string())),
    }
}
