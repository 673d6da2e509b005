use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::booking::BookingStatus;

// Request para crear una reserva; fechas YYYY-MM-DD y horas HH:MM[:SS]
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub car_id: Uuid,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    #[validate(length(min = 1, max = 255))]
    pub destination: String,
    #[validate(length(max = 1000))]
    pub purpose: Option<String>,
    #[validate(range(min = 1))]
    pub passengers: Option<i32>,
}

// Request para rechazar una reserva
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RejectBookingRequest {
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

// Request de devolución del vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct ReturnBookingRequest {
    #[validate(range(min = 0))]
    pub end_mileage: i32,
}

// Filtros de listado de reservas
#[derive(Debug, Default, Deserialize)]
pub struct BookingFilters {
    pub status: Option<BookingStatus>,
    pub car_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}
