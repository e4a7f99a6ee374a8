use axum::extract::{Path, State};
use axum::Json;

use crate::database::{Collection, DeleteResult, Document, InsertOneResult};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::state::AppState;

/// POST /orders
pub async fn create(State(state): State<AppState>, Json(order): Json<Document>) -> Result<Json<InsertOneResult>, ApiError> {
    Ok(Json(state.store.insert_one(Collection::Orders, order).await?))
}

/// DELETE /orders/:id - zero deleted when the order does not exist
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<DeleteResult>, ApiError> {
    Ok(Json(state.store.delete_one(Collection::Orders, &Filter::by_id(&id)).await?))
}
