//! Modelo de Booking
//!
//! Una reserva de vehículo para un rango de fecha/hora. Todas las
//! transiciones de estado pasan por [`BookingStatus::transition`].
//!
//! ```text
//! pending ──approve──▶ approved ──return──▶ completed
//!    │                    │
//!    ├──reject──▶ rejected│
//!    └──cancel──▶ cancelled ◀──cancel──┘
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Estado de la reserva - mapea al ENUM booking_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
}

/// Acciones que cambian el estado de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Approve,
    Reject,
    Return,
    Cancel,
}

impl BookingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingAction::Approve => "approve",
            BookingAction::Reject => "reject",
            BookingAction::Return => "return",
            BookingAction::Cancel => "cancel",
        }
    }
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Aplicar una acción y devolver el nuevo estado
    pub fn transition(self, action: BookingAction) -> Result<BookingStatus, AppError> {
        use BookingAction::*;
        use BookingStatus::*;

        match (self, action) {
            (Pending, Approve) => Ok(Approved),
            (Pending, Reject) => Ok(Rejected),
            (Approved, Return) => Ok(Completed),
            (Pending | Approved, Cancel) => Ok(Cancelled),
            (from, action) => Err(AppError::Conflict(format!(
                "Cannot {} a booking that is {}",
                action.as_str(),
                from.as_str()
            ))),
        }
    }
}

/// Booking - mapea exactamente a la tabla bookings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub destination: String,
    pub purpose: Option<String>,
    pub passengers: i32,
    pub status: BookingStatus,
    pub start_mileage: Option<i32>,
    pub end_mileage: Option<i32>,
    pub distance: Option<i32>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.start_date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.end_date.and_time(self.end_time)
    }
}

/// Reserva con los datos del solicitante y del vehículo para listados
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    pub user_full_name: String,
    pub department: Option<String>,
    pub license_plate: String,
    pub car_brand: String,
    pub car_model: String,
    pub approver_name: Option<String>,
}
