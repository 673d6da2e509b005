//! Router de la aplicación
//!
//! Todo lo que cuelga de `/api` exige sesión salvo `/api/auth/login` y
//! `/api/auth/logout`. Las imágenes subidas se sirven en `/uploads`.

pub mod auth_routes;
pub mod booking_routes;
pub mod business_card_routes;
pub mod car_routes;
pub mod car_type_routes;
pub mod dashboard_routes;
pub mod maintenance_routes;
pub mod user_routes;

use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::auth::auth_middleware;
use crate::middleware::cors::cors_layer_for;
use crate::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Margen sobre el tamaño máximo de imagen: base64 ocupa 4/3 más el JSON
fn body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes / 3 * 4 + 64 * 1024
}

pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/users", user_routes::create_user_router())
        .nest("/car-types", car_type_routes::create_car_type_router())
        .nest("/cars", car_routes::create_car_router())
        .nest("/bookings", booking_routes::create_booking_router())
        .nest("/maintenance", maintenance_routes::create_maintenance_router())
        .nest("/business-cards", business_card_routes::create_business_card_router())
        .nest("/dashboard", dashboard_routes::create_dashboard_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api = protected.nest("/auth", auth_routes::create_auth_router(state.clone()));
    let limit = body_limit(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer_for(&state.config.cors_origins))
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(CompressionLayer::new())
                .layer(DefaultBodyLimit::max(limit)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "ok",
        Err(_) => "unavailable",
    };

    Json(json!({
        "status": "ok",
        "database": database,
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
