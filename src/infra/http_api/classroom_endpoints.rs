use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::dto::ClassroomSummary,
    infra::http_api::{AppState, middleware_auth::MemberIdentity},
    use_cases::{
        chat_service::{ChatError, list_messages, post_message},
        classroom_service::{
            ClassroomError, add_member, create_classroom, delete_classroom, get_classroom,
            join_classroom, leave_classroom, list_classrooms, remove_member,
        },
    },
};

#[derive(Deserialize, Serialize)]
pub struct ClassroomInfo {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_subject")]
    subject: String,
    capacity: Option<u32>,
}

fn default_subject() -> String {
    "General".to_string()
}

#[derive(Deserialize, Serialize)]
pub struct MemberInfo {
    username: String,
}

#[derive(Deserialize, Serialize)]
pub struct MessageInfo {
    body: String,
    kind: Option<String>,
}

fn classroom_status(err: &ClassroomError) -> StatusCode {
    match err {
        ClassroomError::NotFound => StatusCode::NOT_FOUND,
        ClassroomError::NotOwner(_) | ClassroomError::OwnerRemoval => StatusCode::FORBIDDEN,
        ClassroomError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn chat_status(err: &ChatError) -> StatusCode {
    match err {
        ChatError::EmptyMessage => StatusCode::BAD_REQUEST,
        ChatError::ClassroomNotFound => StatusCode::NOT_FOUND,
        ChatError::NotMember => StatusCode::FORBIDDEN,
        ChatError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn create_classroom_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Json(info): Json<ClassroomInfo>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match create_classroom(
        state.db,
        member,
        info.name,
        info.description,
        info.subject,
        info.capacity,
    )
    .await
    {
        Ok(classroom) => Ok((StatusCode::CREATED, Json(classroom))),
        Err(err) => Err((classroom_status(&err), err.to_string())),
    }
}

pub async fn list_classrooms_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match list_classrooms(state.db).await {
        Ok(classrooms) => {
            let summaries: Vec<ClassroomSummary> = classrooms
                .iter()
                .map(|classroom| ClassroomSummary::for_viewer(classroom, &member))
                .collect();

            Ok((StatusCode::OK, Json(summaries)))
        }
        Err(err) => Err((classroom_status(&err), err.to_string())),
    }
}

pub async fn get_classroom_end(
    State(state): State<AppState>,
    Path(classroom_id): Path<Uuid>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match get_classroom(state.db, classroom_id).await {
        Ok(classroom) => Ok((StatusCode::OK, Json(classroom))),
        Err(err) => Err((classroom_status(&err), err.to_string())),
    }
}

pub async fn join_classroom_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Path(classroom_id): Path<Uuid>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match join_classroom(state.db, state.locks, classroom_id, member).await {
        Ok(classroom) => Ok((StatusCode::OK, Json(classroom))),
        Err(err) => Err((classroom_status(&err), err.to_string())),
    }
}

pub async fn leave_classroom_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Path(classroom_id): Path<Uuid>,
) -> impl IntoResponse {
    match leave_classroom(state.db, state.locks, classroom_id, member).await {
        Ok(()) => (StatusCode::OK, "".to_string()),
        Err(err) => (classroom_status(&err), err.to_string()),
    }
}

pub async fn delete_classroom_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Path(classroom_id): Path<Uuid>,
) -> impl IntoResponse {
    match delete_classroom(state.db, state.locks, classroom_id, member).await {
        Ok(()) => (StatusCode::OK, "".to_string()),
        Err(err) => (classroom_status(&err), err.to_string()),
    }
}

pub async fn add_member_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Path(classroom_id): Path<Uuid>,
    Json(info): Json<MemberInfo>,
) -> impl IntoResponse {
    match add_member(state.db, state.locks, classroom_id, member, info.username).await {
        Ok(()) => (StatusCode::OK, "".to_string()),
        Err(err) => (classroom_status(&err), err.to_string()),
    }
}

pub async fn remove_member_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Path((classroom_id, target)): Path<(Uuid, String)>,
) -> impl IntoResponse {
    match remove_member(state.db, state.locks, classroom_id, member, target).await {
        Ok(()) => (StatusCode::OK, "".to_string()),
        Err(err) => (classroom_status(&err), err.to_string()),
    }
}

pub async fn send_message_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Path(classroom_id): Path<Uuid>,
    Json(info): Json<MessageInfo>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match post_message(
        state.db.clone(),
        state.db,
        classroom_id,
        member,
        info.body,
        info.kind,
    )
    .await
    {
        Ok(message) => Ok((StatusCode::CREATED, Json(message))),
        Err(err) => Err((chat_status(&err), err.to_string())),
    }
}

pub async fn get_messages_end(
    State(state): State<AppState>,
    Extension(MemberIdentity(member)): Extension<MemberIdentity>,
    Path(classroom_id): Path<Uuid>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match list_messages(state.db.clone(), state.db, classroom_id, member).await {
        Ok(messages) => Ok((StatusCode::OK, Json(messages))),
        Err(err) => Err((chat_status(&err), err.to_string())),
    }
}
