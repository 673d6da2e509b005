//! Objetos de transferencia (requests/responses de la API)

pub mod api_response;
pub mod auth_dto;
pub mod booking_dto;
pub mod business_card_dto;
pub mod car_dto;
pub mod dashboard_dto;
pub mod maintenance_dto;
pub mod user_dto;

pub use api_response::ApiResponse;
