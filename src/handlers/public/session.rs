use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

/// POST /jwt - sign the submitted identity into the session cookie
///
/// The identity is taken on trust: sign-in itself happens at the client's
/// identity provider before this call.
pub async fn issue(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<TokenRequest>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let token = state.tokens.issue(&request.email)?;
    tracing::info!("Issued session for {}", request.email);

    Ok((state.cookies.attach(jar, token), Json(json!({ "success": true }))))
}

/// POST /logout - expire the session cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    (state.cookies.clear(jar), Json(json!({ "success": true })))
}
