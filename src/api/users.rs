use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState, MessageResponse, UserListResponse, UserProfile};
use crate::db::query::UserFilter;
use crate::models::user::{NewUser, UserRecord, UserUpdate};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub gender: Option<String>,
    pub limit: Option<u64>,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let filter = UserFilter::new(params.gender, params.limit);
    let results = state.users.list(&filter).await?;

    Ok(Json(UserListResponse { results }))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let record = state.users.get(&uuid).await?;

    Ok(Json(UserProfile::from(record)))
}

/// Full-record creation. A missing or undecodable body is a 400, matching
/// the lightweight path's validation failures.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(record) = payload.map_err(|rejection| ApiError::validation(rejection.body_text()))?;

    state.users.create(record).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

pub async fn add_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::validation(rejection.body_text()))?;

    state.users.add(payload).await?;

    Ok(Json(MessageResponse::new("User created successfully")))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(changes) = payload.map_err(|rejection| ApiError::validation(rejection.body_text()))?;

    state.users.update(&uuid, &changes).await?;

    Ok(Json(MessageResponse::new("User updated successfully")))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.delete(&uuid).await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
