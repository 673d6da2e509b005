use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::car_controller::CarController;
use crate::dto::api_response::ApiResponse;
use crate::dto::car_dto::{
    AvailabilityQuery, CarFilters, CarResponse, CreateCarRequest, UpdateCarRequest, UpdateCarStatusRequest,
    UploadImageRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Lectura para cualquier usuario autenticado; escritura solo admin
pub fn create_car_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars).post(create_car))
        .route("/available", get(available_cars))
        .route("/:id", get(get_car).put(update_car).delete(delete_car))
        .route("/:id/status", put(update_car_status))
        .route("/:id/image", post(upload_car_image))
}

async fn list_cars(
    State(state): State<AppState>,
    Query(filters): Query<CarFilters>,
) -> Result<Json<Vec<CarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn available_cars(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<CarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.available(query).await?))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CarResponse>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn create_car(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Json(request): Json<CreateCarRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    actor.require_admin()?;
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.create(request).await?))
}

async fn update_car(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    actor.require_admin()?;
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn update_car_status(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCarStatusRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    actor.require_admin()?;
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.update_status(id, request.status).await?))
}

async fn upload_car_image(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UploadImageRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    actor.require_admin()?;
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.upload_image(&state.images, id, request).await?))
}

async fn delete_car(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    actor.require_admin()?;
    let controller = CarController::new(state.pool.clone());
    controller.delete(&state.images, id).await?;
    Ok(Json(ApiResponse::message("Vehículo eliminado exitosamente")))
}
