//! Modelo de BusinessCard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tarjeta de visita digital de un usuario
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusinessCard {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
