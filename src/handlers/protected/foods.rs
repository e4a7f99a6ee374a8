use axum::extract::{Query, State};
use axum::Json;
use serde_json::Value;

use super::OwnerQuery;
use crate::database::models::OWNER_FIELD;
use crate::database::{Collection, Document};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /myFoods?email - foods added by the signed-in user
pub async fn mine(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    user.ensure_identity(query.email.as_deref())?;

    let mut filter = Filter::new();
    filter.where_eq(OWNER_FIELD, Value::String(user.email))?;

    Ok(Json(state.store.find(Collection::Foods, &filter).await?))
}
