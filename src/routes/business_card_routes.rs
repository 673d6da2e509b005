use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::business_card_controller::BusinessCardController;
use crate::dto::api_response::ApiResponse;
use crate::dto::business_card_dto::{BusinessCardFilters, BusinessCardRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::business_card::BusinessCard;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_business_card_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cards).post(create_card))
        .route("/:id", get(get_card).put(update_card).delete(delete_card))
        .route("/:id/vcard", get(download_vcard))
}

async fn list_cards(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Query(filters): Query<BusinessCardFilters>,
) -> Result<Json<Vec<BusinessCard>>, AppError> {
    let controller = BusinessCardController::new(state.pool.clone());
    Ok(Json(controller.list(&actor, filters).await?))
}

async fn get_card(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<BusinessCard>, AppError> {
    let controller = BusinessCardController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(&actor, id).await?))
}

// Un cuerpo vacío crea la tarjeta a partir del perfil
async fn create_card(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    request: Option<Json<BusinessCardRequest>>,
) -> Result<Json<ApiResponse<BusinessCard>>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let controller = BusinessCardController::new(state.pool.clone());
    Ok(Json(controller.create(&actor, request, &state.config.company_name).await?))
}

async fn update_card(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<BusinessCardRequest>,
) -> Result<Json<ApiResponse<BusinessCard>>, AppError> {
    let controller = BusinessCardController::new(state.pool.clone());
    Ok(Json(controller.update(&actor, id, request).await?))
}

async fn delete_card(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = BusinessCardController::new(state.pool.clone());
    controller.delete(&actor, id).await?;
    Ok(Json(ApiResponse::message("Tarjeta de visita eliminada")))
}

async fn download_vcard(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let controller = BusinessCardController::new(state.pool.clone());
    let (filename, body) = controller.vcard(&actor, id).await?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| AppError::Internal(format!("Cabecera inválida: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/vcard; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
