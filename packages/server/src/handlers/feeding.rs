use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppQuery, IdPath};
use crate::models::bathroom_log::IncludeDogQuery;
use crate::models::feeding::*;
use crate::models::shared::{ApiResponse, ListResponse, MessageResponse};
use crate::services::FeedingService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/feeding",
    tag = "Feeding",
    operation_id = "listFeedings",
    summary = "List feeding records",
    description = "Returns a page of feeding records filtered by `dogId`, `foodType`, `mealTime` and an inclusive `startDate`/`endDate` range. Sortable by `date`, `amount`, `calories`, `foodType`, `mealTime`, `createdAt` or `updatedAt` (default `-date`).",
    params(FeedingListQuery),
    responses(
        (status = 200, description = "Page of feeding records", body = ListResponse<FeedingResponse>),
        (status = 400, description = "Invalid query parameter (VALIDATION_ERROR, INVALID_IDENTIFIER)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_feedings(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<FeedingListQuery>,
) -> Result<Json<ListResponse<FeedingResponse>>, AppError> {
    let page = FeedingService::new(&state.db).list(&query, None).await?;
    Ok(Json(ListResponse::new(page)))
}

#[utoipa::path(
    get,
    path = "/dogs/{id}/feeding",
    tag = "Feeding",
    operation_id = "listDogFeedings",
    summary = "List feeding records of one dog",
    params(
        ("id" = String, Path, description = "Dog ID (24 hex characters)"),
        FeedingListQuery,
    ),
    responses(
        (status = 200, description = "Page of feeding records", body = ListResponse<FeedingResponse>),
        (status = 400, description = "Invalid parameter (VALIDATION_ERROR, INVALID_IDENTIFIER)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_dog_feedings(
    State(state): State<AppState>,
    IdPath(dog_id): IdPath,
    AppQuery(query): AppQuery<FeedingListQuery>,
) -> Result<Json<ListResponse<FeedingResponse>>, AppError> {
    let page = FeedingService::new(&state.db)
        .list(&query, Some(dog_id))
        .await?;
    Ok(Json(ListResponse::new(page)))
}

#[utoipa::path(
    get,
    path = "/feeding/{id}",
    tag = "Feeding",
    operation_id = "getFeeding",
    summary = "Get a feeding record by ID",
    params(
        ("id" = String, Path, description = "Feeding record ID (24 hex characters)"),
        IncludeDogQuery,
    ),
    responses(
        (status = 200, description = "Feeding record", body = ApiResponse<FeedingResponse>),
        (status = 400, description = "Malformed ID (INVALID_IDENTIFIER)", body = ErrorBody),
        (status = 404, description = "Feeding record not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_feeding(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppQuery(include): AppQuery<IncludeDogQuery>,
) -> Result<Json<ApiResponse<FeedingResponse>>, AppError> {
    let service = FeedingService::new(&state.db);
    let feeding = service.get(id).await?;
    let body = if include.enabled() {
        service.with_dog(feeding).await?
    } else {
        feeding.into()
    };
    Ok(Json(ApiResponse::ok(body)))
}

#[utoipa::path(
    post,
    path = "/feeding",
    tag = "Feeding",
    operation_id = "createFeeding",
    summary = "Record a feeding",
    description = "`dogId`, `foodType`, `amount` and `mealTime` are required. `date` defaults to now.",
    params(IncludeDogQuery),
    request_body = CreateFeedingRequest,
    responses(
        (status = 201, description = "Feeding record created", body = ApiResponse<FeedingResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_feeding(
    State(state): State<AppState>,
    AppQuery(include): AppQuery<IncludeDogQuery>,
    AppJson(payload): AppJson<CreateFeedingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = FeedingService::new(&state.db);
    let feeding = service.create(payload).await?;
    info!(id = %feeding.id, dog_id = %feeding.dog_id, "Feeding created");

    let body = if include.enabled() {
        service.with_dog(feeding).await?
    } else {
        feeding.into()
    };
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(body))))
}

#[utoipa::path(
    patch,
    path = "/feeding/{id}",
    tag = "Feeding",
    operation_id = "updateFeeding",
    summary = "Update a feeding record",
    description = "Partially updates a feeding record. Send `null` to clear `calories`, `notes` or `brand`.",
    params(
        ("id" = String, Path, description = "Feeding record ID (24 hex characters)"),
        IncludeDogQuery,
    ),
    request_body = UpdateFeedingRequest,
    responses(
        (status = 200, description = "Feeding record updated", body = ApiResponse<FeedingResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR, INVALID_IDENTIFIER)", body = ErrorBody),
        (status = 404, description = "Feeding record not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_feeding(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppQuery(include): AppQuery<IncludeDogQuery>,
    AppJson(payload): AppJson<UpdateFeedingRequest>,
) -> Result<Json<ApiResponse<FeedingResponse>>, AppError> {
    let service = FeedingService::new(&state.db);
    let feeding = service.update(id, payload).await?;
    info!(id = %feeding.id, "Feeding updated");

    let body = if include.enabled() {
        service.with_dog(feeding).await?
    } else {
        feeding.into()
    };
    Ok(Json(ApiResponse::ok(body)))
}

#[utoipa::path(
    delete,
    path = "/feeding/{id}",
    tag = "Feeding",
    operation_id = "deleteFeeding",
    summary = "Delete a feeding record",
    params(("id" = String, Path, description = "Feeding record ID (24 hex characters)")),
    responses(
        (status = 200, description = "Feeding record deleted", body = MessageResponse),
        (status = 400, description = "Malformed ID (INVALID_IDENTIFIER)", body = ErrorBody),
        (status = 404, description = "Feeding record not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_feeding(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    FeedingService::new(&state.db).delete(id).await?;
    info!(%id, "Feeding deleted");
    Ok(Json(MessageResponse::new("Feeding record deleted successfully")))
}
