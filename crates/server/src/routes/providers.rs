use axum::{extract::{Path, State}, http::StatusCode, Json};
use catalog::domain::{Detail, Listed, NewProvider, Provider, ProviderPatch};
use common::types::Ack;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::auth::{OwnerId, ServerState};

#[utoipa::path(post, path = "/providers", tag = "providers", operation_id = "create_provider",
    request_body = crate::openapi::NewProviderDoc,
    responses((status = 201, description = "Created", body = crate::openapi::ProviderDoc), (status = 400, description = "Bad Request"), (status = 409, description = "Name already used")))]
pub async fn create(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Json(input): Json<NewProvider>,
) -> Result<(StatusCode, Json<Provider>), JsonApiError> {
    let created = state.providers.create(input, owner).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/providers", tag = "providers", operation_id = "list_providers",
    responses((status = 200, description = "Providers of the caller, newest first", body = [crate::openapi::ProviderListedDoc])))]
pub async fn find_all(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
) -> Result<Json<Vec<Listed<Provider>>>, JsonApiError> {
    Ok(Json(state.providers.find_all(owner).await?))
}

#[utoipa::path(get, path = "/providers/{id}", tag = "providers", operation_id = "get_provider",
    params(("id" = Uuid, Path, description = "Provider id")),
    responses((status = 200, description = "Provider with its accounts", body = crate::openapi::ProviderDetailDoc), (status = 404, description = "Not Found")))]
pub async fn find_one(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<Uuid>,
) -> Result<Json<Detail<Provider>>, JsonApiError> {
    Ok(Json(state.providers.find_one(id, owner).await?))
}

#[utoipa::path(patch, path = "/providers/{id}", tag = "providers", operation_id = "update_provider",
    params(("id" = Uuid, Path, description = "Provider id")),
    request_body = crate::openapi::ProviderPatchDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::ProviderDoc), (status = 404, description = "Not Found"), (status = 409, description = "Name already used")))]
pub async fn update(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProviderPatch>,
) -> Result<Json<Provider>, JsonApiError> {
    Ok(Json(state.providers.update(id, patch, owner).await?))
}

#[utoipa::path(patch, path = "/providers/{id}/toggle-active", tag = "providers", operation_id = "toggle_provider",
    params(("id" = Uuid, Path, description = "Provider id")),
    responses((status = 200, description = "Active flag flipped", body = crate::openapi::ProviderDoc), (status = 404, description = "Not Found")))]
pub async fn toggle_active(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<Uuid>,
) -> Result<Json<Provider>, JsonApiError> {
    Ok(Json(state.providers.toggle_active(id, owner).await?))
}

#[utoipa::path(delete, path = "/providers/{id}", tag = "providers", operation_id = "delete_provider",
    params(("id" = Uuid, Path, description = "Provider id")),
    responses((status = 200, description = "Deleted", body = crate::openapi::AckDoc), (status = 404, description = "Not Found"), (status = 409, description = "Referenced by accounts")))]
pub async fn remove(
    State(state): State<ServerState>,
    OwnerId(owner): OwnerId,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, JsonApiError> {
    Ok(Json(state.providers.remove(id, owner).await?))
}
