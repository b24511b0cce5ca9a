pub mod classroom_endpoints;
mod middleware_auth;
pub mod quiz_endpoints;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tracing::info;

use crate::{
    infra::{
        database::PostgresDatabase,
        http_api::{
            classroom_endpoints::{
                add_member_end, create_classroom_end, delete_classroom_end, get_classroom_end,
                get_messages_end, join_classroom_end, leave_classroom_end, list_classrooms_end,
                remove_member_end, send_message_end,
            },
            quiz_endpoints::{
                classroom_sessions_end, create_session_end, get_session_end, join_session_end,
                list_sessions_end, start_session_end, submit_answer_end,
            },
        },
    },
    use_cases::entity_locks::EntityLocks,
};

#[derive(Clone)]
pub struct AppState {
    db: Arc<PostgresDatabase>,
    locks: Arc<EntityLocks>,
    jwt_secret: String,
}

pub async fn start_http_api(addr: String, jwt_secret: String, db: Arc<PostgresDatabase>) {
    let state = AppState {
        db,
        locks: Arc::new(EntityLocks::new()),
        jwt_secret,
    };

    let app = Router::new()
        .route(
            "/classrooms",
            get(list_classrooms_end).post(create_classroom_end),
        )
        .route(
            "/classrooms/{classroom_id}",
            get(get_classroom_end).delete(delete_classroom_end),
        )
        .route("/classrooms/{classroom_id}/join", post(join_classroom_end))
        .route(
            "/classrooms/{classroom_id}/leave",
            post(leave_classroom_end),
        )
        .route("/classrooms/{classroom_id}/members", post(add_member_end))
        .route(
            "/classrooms/{classroom_id}/members/{member}",
            delete(remove_member_end),
        )
        .route(
            "/classrooms/{classroom_id}/messages",
            get(get_messages_end).post(send_message_end),
        )
        .route(
            "/classrooms/{classroom_id}/team-quizzes",
            get(classroom_sessions_end),
        )
        .route(
            "/team-quizzes",
            get(list_sessions_end).post(create_session_end),
        )
        .route("/team-quizzes/{session_id}", get(get_session_end))
        .route("/team-quizzes/{session_id}/join", post(join_session_end))
        .route("/team-quizzes/{session_id}/start", post(start_session_end))
        .route(
            "/team-quizzes/{session_id}/submit-answer",
            post(submit_answer_end),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middleware_auth::middleware_fn,
        ))
        .route("/", get(health_check))
        .with_state(state);

    info!("http api listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

pub async fn health_check() -> &'static str {
    "hello"
}
