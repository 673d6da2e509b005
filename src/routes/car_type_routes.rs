use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::car_type_controller::CarTypeController;
use crate::dto::api_response::ApiResponse;
use crate::dto::car_dto::{CreateCarTypeRequest, UpdateCarTypeRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::car::CarType;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_type_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_car_types).post(create_car_type))
        .route("/:id", get(get_car_type).put(update_car_type).delete(delete_car_type))
}

async fn list_car_types(State(state): State<AppState>) -> Result<Json<Vec<CarType>>, AppError> {
    let controller = CarTypeController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn get_car_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CarType>, AppError> {
    let controller = CarTypeController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn create_car_type(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Json(request): Json<CreateCarTypeRequest>,
) -> Result<Json<ApiResponse<CarType>>, AppError> {
    actor.require_admin()?;
    let controller = CarTypeController::new(state.pool.clone());
    Ok(Json(controller.create(request).await?))
}

async fn update_car_type(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCarTypeRequest>,
) -> Result<Json<ApiResponse<CarType>>, AppError> {
    actor.require_admin()?;
    let controller = CarTypeController::new(state.pool.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_car_type(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    actor.require_admin()?;
    let controller = CarTypeController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(ApiResponse::message("Tipo de vehículo eliminado exitosamente")))
}
