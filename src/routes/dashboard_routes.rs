use axum::{extract::State, middleware, routing::get, Json, Router};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::DashboardStats;
use crate::middleware::auth::admin_only_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route_layer(middleware::from_fn(admin_only_middleware))
}

async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    Ok(Json(controller.stats().await?))
}
