//! Modelos de Car y CarType
//!
//! Mapean las tablas cars y car_types. El estado del vehículo se modifica
//! desde las reservas (aprobación, devolución, cancelación) y desde el
//! mantenimiento.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM car_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "car_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CarStatus {
    Available,
    Booked,
    Maintenance,
}

impl CarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "available",
            CarStatus::Booked => "booked",
            CarStatus::Maintenance => "maintenance",
        }
    }
}

/// Tipo de vehículo con su capacidad de pasajeros
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CarType {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Vehículo junto con los datos de su tipo (JOIN car_types)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub car_type_id: Uuid,
    pub car_type_name: String,
    pub capacity: i32,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub color: Option<String>,
    pub status: CarStatus,
    pub mileage: i32,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Car {
    pub fn is_in_maintenance(&self) -> bool {
        self.status == CarStatus::Maintenance
    }
}
