use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppQuery, IdPath};
use crate::models::dog::*;
use crate::models::shared::{ApiResponse, ListResponse, MessageResponse};
use crate::services::DogService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/dogs",
    tag = "Dogs",
    operation_id = "listDogs",
    summary = "List dogs",
    description = "Returns a page of dogs. Supports case-insensitive substring search on `breed` and `name`, exact filters on `gender`, `isVaccinated` and `ownerName`, and sorting by `name`, `breed`, `age`, `weight`, `createdAt` or `updatedAt` (default `-createdAt`).",
    params(DogListQuery),
    responses(
        (status = 200, description = "Page of dogs", body = ListResponse<DogResponse>),
        (status = 400, description = "Invalid query parameter (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_dogs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DogListQuery>,
) -> Result<Json<ListResponse<DogResponse>>, AppError> {
    let page = DogService::new(&state.db).list(&query).await?;
    Ok(Json(ListResponse::new(page.try_map(DogResponse::try_from)?)))
}

#[utoipa::path(
    get,
    path = "/dogs/{id}",
    tag = "Dogs",
    operation_id = "getDog",
    summary = "Get a dog by ID",
    params(("id" = String, Path, description = "Dog ID (24 hex characters)")),
    responses(
        (status = 200, description = "Dog details", body = ApiResponse<DogResponse>),
        (status = 400, description = "Malformed ID (INVALID_IDENTIFIER)", body = ErrorBody),
        (status = 404, description = "Dog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_dog(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<ApiResponse<DogResponse>>, AppError> {
    let dog = DogService::new(&state.db).get(id).await?;
    Ok(Json(ApiResponse::ok(dog.try_into()?)))
}

#[utoipa::path(
    post,
    path = "/dogs",
    tag = "Dogs",
    operation_id = "createDog",
    summary = "Create a dog profile",
    description = "`name`, `breed`, `weight`, `gender` and `ownerName` are required. `isVaccinated` defaults to false and medical history entries without a date are stamped with the current time. On update, an undated entry that matches a stored one keeps the stored date.",
    request_body = CreateDogRequest,
    responses(
        (status = 201, description = "Dog created", body = ApiResponse<DogResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_dog(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateDogRequest>,
) -> Result<impl IntoResponse, AppError> {
    let dog = DogService::new(&state.db).create(payload).await?;
    info!(id = %dog.id, name = %dog.name, "Dog created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(DogResponse::try_from(dog)?)),
    ))
}

#[utoipa::path(
    patch,
    path = "/dogs/{id}",
    tag = "Dogs",
    operation_id = "updateDog",
    summary = "Update a dog profile",
    description = "Partially updates a dog using PATCH semantics. The merged record is validated with the same rules as creation. `updatedAt` is refreshed even when the payload is empty.",
    params(("id" = String, Path, description = "Dog ID (24 hex characters)")),
    request_body = UpdateDogRequest,
    responses(
        (status = 200, description = "Dog updated", body = ApiResponse<DogResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR, INVALID_IDENTIFIER)", body = ErrorBody),
        (status = 404, description = "Dog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_dog(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppJson(payload): AppJson<UpdateDogRequest>,
) -> Result<Json<ApiResponse<DogResponse>>, AppError> {
    let dog = DogService::new(&state.db).update(id, payload).await?;
    info!(id = %dog.id, "Dog updated");
    Ok(Json(ApiResponse::ok(dog.try_into()?)))
}

#[utoipa::path(
    delete,
    path = "/dogs/{id}",
    tag = "Dogs",
    operation_id = "deleteDog",
    summary = "Delete a dog profile",
    description = "Deletes the dog. Bathroom and feeding logs that reference it are kept; joins on them resolve to `null`.",
    params(("id" = String, Path, description = "Dog ID (24 hex characters)")),
    responses(
        (status = 200, description = "Dog deleted", body = MessageResponse),
        (status = 400, description = "Malformed ID (INVALID_IDENTIFIER)", body = ErrorBody),
        (status = 404, description = "Dog not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_dog(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    DogService::new(&state.db).delete(id).await?;
    info!(%id, "Dog deleted");
    Ok(Json(MessageResponse::new("Dog deleted successfully")))
}
