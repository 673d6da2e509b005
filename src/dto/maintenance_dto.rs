use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

// Request para abrir un registro de mantenimiento
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaintenanceRequest {
    pub car_id: Uuid,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    pub cost: Option<Decimal>,
}

// Request para cerrar el mantenimiento
#[derive(Debug, Default, Deserialize)]
pub struct CompleteMaintenanceRequest {
    pub cost: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MaintenanceFilters {
    pub car_id: Option<Uuid>,
    pub open_only: Option<bool>,
}
