use axum::{extract::{Path, State}, http::StatusCode, Json};
use catalog::domain::{Detail, Listed, NewService, Service, ServicePatch};
use catalog::stats::OwnerReport;
use common::types::Ack;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::auth::{OwnerId, ServerState};

#[utoipa::path(post, path = "/services", tag = "services", operation_id = "create_service",
    request_body = crate::openapi::NewServiceDoc,
    responses((status = 201, description = "Created", body = crate::openapi::ServiceDoc), (status = 400, description = "Bad Request"), (status = 409, description = "Name already used")))]
pub async fn create(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Json(input): Json<NewService>,
) -> Result<(StatusCode, Json<Service>), JsonApiError> {
    let created = state.services.create(input, owner).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/services", tag = "services", operation_id = "list_services",
    responses((status = 200, description = "Services of the caller, newest first", body = [crate::openapi::ServiceListedDoc])))]
pub async fn find_all(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> Result<Json<Vec<Listed<Service>>>, JsonApiError> {
    Ok(Json(state.services.find_all(owner).await?))
}

/// Registered ahead of `/services/:id` so "stats" is never taken for an id.
#[utoipa::path(get, path = "/services/stats", tag = "services", operation_id = "service_stats",
    responses((status = 200, description = "Per-service account figures", body = crate::openapi::OwnerReportDoc)))]
pub async fn stats(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> Result<Json<OwnerReport>, JsonApiError> {
    Ok(Json(state.services.stats(owner).await?))
}

#[utoipa::path(get, path = "/services/{id}", tag = "services", operation_id = "get_service",
    params(("id" = Uuid, Path, description = "Service id")),
    responses((status = 200, description = "Service with accounts and stats", body = crate::openapi::ServiceDetailDoc), (status = 404, description = "Not Found")))]
pub async fn find_one(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<Uuid>,
) -> Result<Json<Detail<Service>>, JsonApiError> {
    Ok(Json(state.services.find_one(id, owner).await?))
}

#[utoipa::path(patch, path = "/services/{id}", tag = "services", operation_id = "update_service",
    params(("id" = Uuid, Path, description = "Service id")),
    request_body = crate::openapi::ServicePatchDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::ServiceDoc), (status = 404, description = "Not Found"), (status = 409, description = "Name already used")))]
pub async fn update(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<Uuid>,
    Json(patch): Json<ServicePatch>,
) -> Result<Json<Service>, JsonApiError> {
    Ok(Json(state.services.update(id, patch, owner).await?))
}

#[utoipa::path(patch, path = "/services/{id}/toggle-active", tag = "services", operation_id = "toggle_service",
    params(("id" = Uuid, Path, description = "Service id")),
    responses((status = 200, description = "Active flag flipped", body = crate::openapi::ServiceDoc), (status = 404, description = "Not Found")))]
pub async fn toggle_active(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, JsonApiError> {
    Ok(Json(state.services.toggle_active(id, owner).await?))
}

#[utoipa::path(delete, path = "/services/{id}", tag = "services", operation_id = "delete_service",
    params(("id" = Uuid, Path, description = "Service id")),
    responses((status = 200, description = "Deleted", body = crate::openapi::AckDoc), (status = 404, description = "Not Found"), (status = 409, description = "Referenced by accounts")))]
pub async fn remove(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, JsonApiError> {
    Ok(Json(state.services.remove(id, owner).await?))
}
