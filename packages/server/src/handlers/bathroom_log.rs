use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use tracing::{info, instrument};

use crate::entity::bathroom_log;
use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppQuery, IdPath};
use crate::models::bathroom_log::*;
use crate::models::shared::{ApiResponse, ListResponse, MessageResponse};
use crate::services::BathroomLogService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/bathroom-logs",
    tag = "Bathroom Logs",
    operation_id = "listBathroomLogs",
    summary = "List bathroom logs",
    description = "Returns a page of bathroom logs filtered by `dogId`, `type` and an inclusive `startDate`/`endDate` range on `date`. Sortable by `date`, `type`, `createdAt` or `updatedAt` (default `-date`). With `includeDog=true` every record carries `dog: {_id, name, breed}` or `dog: null`.",
    params(BathroomLogListQuery),
    responses(
        (status = 200, description = "Page of bathroom logs", body = ListResponse<BathroomLogResponse>),
        (status = 400, description = "Invalid query parameter (VALIDATION_ERROR, INVALID_IDENTIFIER)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_bathroom_logs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<BathroomLogListQuery>,
) -> Result<Json<ListResponse<BathroomLogResponse>>, AppError> {
    let page = BathroomLogService::new(&state.db).list(&query, None).await?;
    Ok(Json(ListResponse::new(page)))
}

#[utoipa::path(
    get,
    path = "/dogs/{id}/bathroom-logs",
    tag = "Bathroom Logs",
    operation_id = "listDogBathroomLogs",
    summary = "List bathroom logs of one dog",
    description = "Same as `GET /bathroom-logs` with `dogId` fixed to the path ID. The dog does not have to exist.",
    params(
        ("id" = String, Path, description = "Dog ID (24 hex characters)"),
        BathroomLogListQuery,
    ),
    responses(
        (status = 200, description = "Page of bathroom logs", body = ListResponse<BathroomLogResponse>),
        (status = 400, description = "Invalid parameter (VALIDATION_ERROR, INVALID_IDENTIFIER)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_dog_bathroom_logs(
    State(state): State<AppState>,
    IdPath(dog_id): IdPath,
    AppQuery(query): AppQuery<BathroomLogListQuery>,
) -> Result<Json<ListResponse<BathroomLogResponse>>, AppError> {
    let page = BathroomLogService::new(&state.db)
        .list(&query, Some(dog_id))
        .await?;
    Ok(Json(ListResponse::new(page)))
}

#[utoipa::path(
    get,
    path = "/bathroom-logs/stats",
    tag = "Bathroom Logs",
    operation_id = "bathroomStats",
    summary = "Seven-day bathroom histogram",
    description = "Counts pee and poop events per day over the trailing seven days (oldest first) plus per-day tallies of `normal`, `soft` and `hard` stool consistency. `watery` stools count as poop but are not tallied by consistency.",
    responses(
        (status = 200, description = "Histogram", body = ApiResponse<BathroomStatsResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn bathroom_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BathroomStatsResponse>>, AppError> {
    let stats = BathroomLogService::new(&state.db)
        .weekly_stats(Utc::now())
        .await?;
    Ok(Json(ApiResponse::ok(stats)))
}

#[utoipa::path(
    get,
    path = "/bathroom-logs/{id}",
    tag = "Bathroom Logs",
    operation_id = "getBathroomLog",
    summary = "Get a bathroom log by ID",
    params(
        ("id" = String, Path, description = "Bathroom log ID (24 hex characters)"),
        IncludeDogQuery,
    ),
    responses(
        (status = 200, description = "Bathroom log", body = ApiResponse<BathroomLogResponse>),
        (status = 400, description = "Malformed ID (INVALID_IDENTIFIER)", body = ErrorBody),
        (status = 404, description = "Bathroom log not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_bathroom_log(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppQuery(include): AppQuery<IncludeDogQuery>,
) -> Result<Json<ApiResponse<BathroomLogResponse>>, AppError> {
    let service = BathroomLogService::new(&state.db);
    let log = service.get(id).await?;
    Ok(Json(ApiResponse::ok(respond(&service, log, &include).await?)))
}

#[utoipa::path(
    post,
    path = "/bathroom-logs",
    tag = "Bathroom Logs",
    operation_id = "createBathroomLog",
    summary = "Record a bathroom event",
    description = "`dogId` and `type` are required. `consistency` and `color` are required when `type` is `poop` or `both`. `date` defaults to now. The referenced dog is not required to exist.",
    params(IncludeDogQuery),
    request_body = CreateBathroomLogRequest,
    responses(
        (status = 201, description = "Bathroom log created", body = ApiResponse<BathroomLogResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_bathroom_log(
    State(state): State<AppState>,
    AppQuery(include): AppQuery<IncludeDogQuery>,
    AppJson(payload): AppJson<CreateBathroomLogRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = BathroomLogService::new(&state.db);
    let log = service.create(payload).await?;
    info!(id = %log.id, dog_id = %log.dog_id, log_type = %log.log_type, "Bathroom log created");

    let body = respond(&service, log, &include).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(body))))
}

#[utoipa::path(
    patch,
    path = "/bathroom-logs/{id}",
    tag = "Bathroom Logs",
    operation_id = "updateBathroomLog",
    summary = "Update a bathroom log",
    description = "Partially updates a log. The conditional `consistency`/`color` requirement is checked against the merged record, so switching `type` to `poop` without them fails. Send `null` to clear an optional field.",
    params(
        ("id" = String, Path, description = "Bathroom log ID (24 hex characters)"),
        IncludeDogQuery,
    ),
    request_body = UpdateBathroomLogRequest,
    responses(
        (status = 200, description = "Bathroom log updated", body = ApiResponse<BathroomLogResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR, INVALID_IDENTIFIER)", body = ErrorBody),
        (status = 404, description = "Bathroom log not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_bathroom_log(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppQuery(include): AppQuery<IncludeDogQuery>,
    AppJson(payload): AppJson<UpdateBathroomLogRequest>,
) -> Result<Json<ApiResponse<BathroomLogResponse>>, AppError> {
    let service = BathroomLogService::new(&state.db);
    let log = service.update(id, payload).await?;
    info!(id = %log.id, "Bathroom log updated");
    Ok(Json(ApiResponse::ok(respond(&service, log, &include).await?)))
}

#[utoipa::path(
    delete,
    path = "/bathroom-logs/{id}",
    tag = "Bathroom Logs",
    operation_id = "deleteBathroomLog",
    summary = "Delete a bathroom log",
    params(("id" = String, Path, description = "Bathroom log ID (24 hex characters)")),
    responses(
        (status = 200, description = "Bathroom log deleted", body = MessageResponse),
        (status = 400, description = "Malformed ID (INVALID_IDENTIFIER)", body = ErrorBody),
        (status = 404, description = "Bathroom log not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_bathroom_log(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    BathroomLogService::new(&state.db).delete(id).await?;
    info!(%id, "Bathroom log deleted");
    Ok(Json(MessageResponse::new("Bathroom log deleted successfully")))
}

async fn respond<C: sea_orm::ConnectionTrait>(
    service: &BathroomLogService<'_, C>,
    log: bathroom_log::Model,
    include: &IncludeDogQuery,
) -> Result<BathroomLogResponse, AppError> {
    if include.enabled() {
        service.with_dog(log).await
    } else {
        Ok(log.into())
    }
}

