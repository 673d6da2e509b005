use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::api_response::ApiResponse;
use crate::dto::maintenance_dto::{CompleteMaintenanceRequest, CreateMaintenanceRequest, MaintenanceFilters};
use crate::middleware::auth::{admin_only_middleware, AuthenticatedUser};
use crate::models::maintenance::MaintenanceRecord;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_maintenance).post(create_maintenance))
        .route("/:id/complete", put(complete_maintenance))
        .route("/:id", delete(delete_maintenance))
        .route_layer(middleware::from_fn(admin_only_middleware))
}

async fn list_maintenance(
    State(state): State<AppState>,
    Query(filters): Query<MaintenanceFilters>,
) -> Result<Json<Vec<MaintenanceRecord>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn create_maintenance(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Json(request): Json<CreateMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone());
    Ok(Json(controller.create(&actor, request).await?))
}

async fn complete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    request: Option<Json<CompleteMaintenanceRequest>>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let controller = MaintenanceController::new(state.pool.clone());
    Ok(Json(controller.complete(id, request).await?))
}

async fn delete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(ApiResponse::message("Registro de mantenimiento eliminado")))
}
