//! Generic owner-scoped CRUD handlers, instantiated per `Collection`.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::session::AuthUser;
use crate::errors::AppError;
use crate::extract::Path;
use crate::state::AppState;
use crate::tracker::collection::{apply_patch, Collection, Document};
use crate::tracker::store;

fn not_found<C: Collection>(id: Uuid) -> AppError {
    AppError::NotFound(format!("{} record {id} not found", C::NAME))
}

/// Loads every record of `C` owned by `user_id`, in the collection's list order.
pub async fn load_all<C: Collection>(
    state: &AppState,
    user_id: Uuid,
) -> Result<Vec<Document<C>>, AppError> {
    store::list_documents(&state.db, C::NAME, user_id, C::ORDER)
        .await?
        .into_iter()
        .map(Document::try_from)
        .collect()
}

pub async fn load_one<C: Collection>(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
) -> Result<Document<C>, AppError> {
    store::get_document(&state.db, C::NAME, user_id, id)
        .await?
        .ok_or_else(|| not_found::<C>(id))?
        .try_into()
}

/// Inserts an already-normalized record.
pub async fn save_new<C: Collection>(
    state: &AppState,
    user_id: Uuid,
    record: &C,
) -> Result<Document<C>, AppError> {
    let body = serde_json::to_value(record)?;
    let row = store::insert_document(&state.db, C::NAME, user_id, &body).await?;
    info!("Created {} record {} for user {user_id}", C::NAME, row.id);
    row.try_into()
}

pub async fn save_existing<C: Collection>(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    record: &C,
) -> Result<Document<C>, AppError> {
    let body = serde_json::to_value(record)?;
    store::update_document(&state.db, C::NAME, user_id, id, &body)
        .await?
        .ok_or_else(|| not_found::<C>(id))?
        .try_into()
}

/// GET /api/v1/{collection}
pub async fn list<C: Collection>(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Document<C>>>, AppError> {
    Ok(Json(load_all::<C>(&state, auth.user_id).await?))
}

/// POST /api/v1/{collection}
pub async fn create<C: Collection>(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<C::Create>,
) -> Result<(StatusCode, Json<Document<C>>), AppError> {
    let mut record = C::from_create(input, Utc::now().date_naive())?;
    record.normalize()?;
    let doc = save_new(&state, auth.user_id, &record).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// GET /api/v1/{collection}/:id
pub async fn get_one<C: Collection>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Document<C>>, AppError> {
    Ok(Json(load_one::<C>(&state, auth.user_id, id).await?))
}

/// PUT /api/v1/{collection}/:id
pub async fn update<C: Collection>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<C::Patch>,
) -> Result<Json<Document<C>>, AppError> {
    let current = load_one::<C>(&state, auth.user_id, id).await?;
    let updated = apply_patch(&current.body, patch, Utc::now().date_naive())?;
    Ok(Json(save_existing(&state, auth.user_id, id, &updated).await?))
}

/// DELETE /api/v1/{collection}/:id
pub async fn delete<C: Collection>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !store::delete_document(&state.db, C::NAME, auth.user_id, id).await? {
        return Err(not_found::<C>(id));
    }
    info!("Deleted {} record {id} for user {}", C::NAME, auth.user_id);
    Ok(Json(json!({ "success": true })))
}
