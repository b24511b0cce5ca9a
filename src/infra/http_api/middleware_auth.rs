use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::infra::http_api::AppState;

/// `sub` carries the member identity used for every classroom and session
/// check; tokens are minted by the platform's auth service, not here.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize,
    pub sub: String,
}

/// The resolved member identity, injected as a request extension.
#[derive(Debug, Clone)]
pub struct MemberIdentity(pub String);

pub async fn middleware_fn(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer_token = match request.headers().get("authorization") {
        Some(auth) => match auth.to_str() {
            Ok(bearer_token) => bearer_token,
            Err(_) => return unauthorized("invalid/missing auth token"),
        },
        None => return unauthorized("invalid/missing auth token"),
    };

    let jwt_token = match bearer_token.strip_prefix("Bearer ") {
        Some(token) => token.trim().to_string(),
        None => return unauthorized("wrong header format"),
    };

    let claims: Claims = match decode(
        &jwt_token,
        &DecodingKey::from_secret(state.jwt_secret.as_ref()),
        &Validation::default(),
    ) {
        Ok(data) => data.claims,
        Err(_) => return unauthorized("invalid jwt format or expired"),
    };

    if claims.sub.trim().is_empty() {
        return unauthorized("empty member identity");
    }

    request.extensions_mut().insert(MemberIdentity(claims.sub));

    next.run(request).await
}

fn unauthorized(reason: &'static str) -> Response {
    Response::builder().status(401).body(reason.into()).unwrap()
}
