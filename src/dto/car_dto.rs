use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::car::{Car, CarStatus};
use crate::utils::validation::validate_license_plate;

// Request para crear un tipo de vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarTypeRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(range(min = 1, max = 100))]
    pub capacity: i32,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

// Request para actualizar un tipo de vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarTypeRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub capacity: Option<i32>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    pub car_type_id: Uuid,
    #[validate(custom = "validate_license_plate")]
    pub license_plate: String,
    #[validate(length(min = 1, max = 100))]
    pub brand: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarRequest {
    pub car_type_id: Option<Uuid>,
    #[validate(custom = "validate_license_plate")]
    pub license_plate: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
}

// Request para cambiar el estado del vehículo
#[derive(Debug, Deserialize)]
pub struct UpdateCarStatusRequest {
    pub status: CarStatus,
}

// Request de subida de imagen (contenido en base64)
#[derive(Debug, Deserialize, Validate)]
pub struct UploadImageRequest {
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
    #[validate(length(min = 1))]
    pub content_base64: String,
}

// Filtros de listado de vehículos
#[derive(Debug, Default, Deserialize)]
pub struct CarFilters {
    pub status: Option<CarStatus>,
    pub car_type_id: Option<Uuid>,
}

// Búsqueda de disponibilidad
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub passengers: Option<i32>,
}

// Response de vehículo con la URL pública de la imagen
#[derive(Debug, Serialize)]
pub struct CarResponse {
    #[serde(flatten)]
    pub car: Car,
    pub image_url: Option<String>,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        let image_url = car.image_path.as_ref().map(|path| format!("/uploads/{}", path));
        Self { car, image_url }
    }
}
