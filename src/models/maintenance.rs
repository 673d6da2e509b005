//! Modelo de MaintenanceRecord
//!
//! Un registro abierto (sin `completed_at`) mantiene el vehículo en
//! estado `maintenance`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub car_id: Uuid,
    pub license_plate: String,
    pub description: String,
    pub cost: Option<Decimal>,
    pub mileage: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceRecord {
    pub fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }
}
