use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::api_response::ApiResponse;
use crate::dto::booking_dto::{BookingFilters, CreateBookingRequest, RejectBookingRequest, ReturnBookingRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::booking::BookingDetails;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/:id", get(get_booking))
        .route("/:id/approve", put(approve_booking))
        .route("/:id/reject", put(reject_booking))
        .route("/:id/return", put(return_booking))
        .route("/:id/cancel", put(cancel_booking))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Query(filters): Query<BookingFilters>,
) -> Result<Json<Vec<BookingDetails>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.list(&actor, filters).await?))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingDetails>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(&actor, id).await?))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingDetails>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.create(&actor, request).await?))
}

async fn approve_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingDetails>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.approve(&actor, id).await?))
}

// El motivo es opcional: se acepta un cuerpo vacío
async fn reject_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    request: Option<Json<RejectBookingRequest>>,
) -> Result<Json<ApiResponse<BookingDetails>>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.reject(&actor, id, request).await?))
}

async fn return_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReturnBookingRequest>,
) -> Result<Json<ApiResponse<BookingDetails>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.return_car(&actor, id, request).await?))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingDetails>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    Ok(Json(controller.cancel(&actor, id).await?))
}
