use axum::extract::State;
use axum::Json;

use crate::database::{Collection, Document, InsertOneResult};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.store.find(Collection::Feedbacks, &Filter::new()).await?))
}

pub async fn create(State(state): State<AppState>, Json(feedback): Json<Document>) -> Result<Json<InsertOneResult>, ApiError> {
    Ok(Json(state.store.insert_one(Collection::Feedbacks, feedback).await?))
}
