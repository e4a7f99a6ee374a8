use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::food::{NAME_FIELD, POPULARITY_FIELD};
use crate::database::models::{to_set_document, FoodEdit, StockUpdate};
use crate::database::{Collection, Document, InsertOneResult, UpdateResult};
use crate::error::ApiError;
use crate::filter::{Filter, SortDirection};
use crate::state::AppState;

const TOP_FOODS: u64 = 6;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// GET /food - most ordered foods first, capped at six
pub async fn top(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    let mut filter = Filter::new();
    filter.order(POPULARITY_FIELD, SortDirection::Desc)?.limit(TOP_FOODS, None);

    Ok(Json(state.store.find(Collection::Foods, &filter).await?))
}

/// GET /foods?page&size - one page of the catalogue
pub async fn list(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Result<Json<Vec<Document>>, ApiError> {
    tracing::debug!("Pagination page={:?} size={:?}", query.page, query.size);

    let size = query.size.unwrap_or(0);
    let skip = query.page.unwrap_or(0).saturating_mul(size);

    let mut filter = Filter::new();
    filter.limit(size, Some(skip));

    Ok(Json(state.store.find(Collection::Foods, &filter).await?))
}

/// GET /foods/:id - single food or null
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Option<Document>>, ApiError> {
    Ok(Json(state.store.find_one(Collection::Foods, &Filter::by_id(&id)).await?))
}

/// PATCH /foods/:id - set quantity and count, creating the food if absent
pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StockUpdate>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = state.store.upsert_one(Collection::Foods, &id, to_set_document(&update)).await?;
    Ok(Json(result))
}

/// POST /foods
pub async fn create(State(state): State<AppState>, Json(food): Json<Document>) -> Result<Json<InsertOneResult>, ApiError> {
    Ok(Json(state.store.insert_one(Collection::Foods, food).await?))
}

/// PATCH /updateFood/:id - replace every editable field, creating the food if absent
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(edit): Json<FoodEdit>,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = state.store.upsert_one(Collection::Foods, &id, to_set_document(&edit)).await?;
    Ok(Json(result))
}

/// GET /searchFoods?search - case-insensitive name match
pub async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Result<Json<Vec<Document>>, ApiError> {
    let text = query.search.unwrap_or_default();
    tracing::debug!("Searching foods for '{}'", text);

    let mut filter = Filter::new();
    filter.where_icontains(NAME_FIELD, &text)?;

    Ok(Json(state.store.find(Collection::Foods, &filter).await?))
}

/// GET /foodsCount
pub async fn count(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let count = state.store.estimated_document_count(Collection::Foods).await?;
    Ok(Json(json!({ "count": count })))
}
