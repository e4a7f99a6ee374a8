use axum::extract::State;
use axum::Json;

use crate::database::{Collection, Document, InsertOneResult};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::state::AppState;

/// GET /user
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.store.find(Collection::Users, &Filter::new()).await?))
}

/// POST /user - record a profile after the client signs in elsewhere
pub async fn create(State(state): State<AppState>, Json(user): Json<Document>) -> Result<Json<InsertOneResult>, ApiError> {
    Ok(Json(state.store.insert_one(Collection::Users, user).await?))
}
