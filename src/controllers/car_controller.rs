use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::car_dto::{
    AvailabilityQuery, CarFilters, CarResponse, CreateCarRequest, UpdateCarRequest, UploadImageRequest,
};
use crate::models::car::{Car, CarStatus};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::car_repository::CarRepository;
use crate::repositories::car_type_repository::CarTypeRepository;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::services::booking_rules::{check_manual_status_change, BookingWindow};
use crate::services::image_storage::ImageStorage;
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};
use crate::utils::validation::normalize_license_plate;

pub struct CarController {
    pool: PgPool,
    repository: CarRepository,
    car_types: CarTypeRepository,
}

impl CarController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CarRepository::new(pool.clone()),
            car_types: CarTypeRepository::new(pool.clone()),
            pool,
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<Car> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))
    }

    async fn ensure_car_type(&self, car_type_id: Uuid) -> AppResult<()> {
        self.car_types
            .find_by_id(car_type_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::BadRequest(format!("El tipo de vehículo '{}' no existe", car_type_id)))
    }

    pub async fn list(&self, filters: CarFilters) -> AppResult<Vec<CarResponse>> {
        let cars = self.repository.list(&filters).await?;
        Ok(cars.into_iter().map(CarResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<CarResponse> {
        Ok(CarResponse::from(self.find(id).await?))
    }

    pub async fn available(&self, query: AvailabilityQuery) -> AppResult<Vec<CarResponse>> {
        let window = BookingWindow::parse(&query.start_date, &query.start_time, &query.end_date, &query.end_time)?;

        let cars = self
            .repository
            .list_available(window.starts_at(), window.ends_at(), query.passengers)
            .await?;

        Ok(cars.into_iter().map(CarResponse::from).collect())
    }

    pub async fn create(&self, request: CreateCarRequest) -> AppResult<ApiResponse<CarResponse>> {
        request.validate()?;
        self.ensure_car_type(request.car_type_id).await?;

        let license_plate = normalize_license_plate(&request.license_plate);
        if self.repository.license_plate_exists(&license_plate, None).await? {
            return Err(conflict_error("Car", "license_plate", &license_plate));
        }

        let car = self.repository.create(license_plate, request).await?;
        info!(car_id = %car.id, plate = %car.license_plate, "🚗 Vehículo creado");

        Ok(ApiResponse::success_with_message(
            CarResponse::from(car),
            "Vehículo creado exitosamente",
        ))
    }

    pub async fn update(&self, id: Uuid, request: UpdateCarRequest) -> AppResult<ApiResponse<CarResponse>> {
        request.validate()?;

        let current = self.find(id).await?;
        if let Some(car_type_id) = request.car_type_id {
            self.ensure_car_type(car_type_id).await?;
        }

        let license_plate = request.license_plate.as_deref().map(normalize_license_plate);
        if let Some(plate) = &license_plate {
            if self.repository.license_plate_exists(plate, Some(id)).await? {
                return Err(conflict_error("Car", "license_plate", plate));
            }
        }

        let car = self.repository.update(current, license_plate, request).await?;
        Ok(ApiResponse::success_with_message(
            CarResponse::from(car),
            "Vehículo actualizado exitosamente",
        ))
    }

    /// Cambio manual de estado. Las reservas aprobadas y los mantenimientos
    /// abiertos mandan sobre el estado que pida el administrador.
    pub async fn update_status(&self, id: Uuid, status: CarStatus) -> AppResult<ApiResponse<CarResponse>> {
        let mut tx = self.pool.begin().await?;

        let car = CarRepository::lock(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))?;

        let held = BookingRepository::car_is_held(&mut *tx, car.id).await?;
        let open_maintenance = MaintenanceRepository::open_for_car(&mut *tx, car.id).await?;
        check_manual_status_change(car.status, status, held, open_maintenance)?;

        CarRepository::set_status(&mut *tx, car.id, status).await?;
        tx.commit().await?;

        let car = self.find(car.id).await?;
        info!(car_id = %car.id, status = status.as_str(), "🚗 Estado de vehículo actualizado");

        Ok(ApiResponse::success_with_message(
            CarResponse::from(car),
            "Estado actualizado exitosamente",
        ))
    }

    pub async fn upload_image(
        &self,
        storage: &ImageStorage,
        id: Uuid,
        request: UploadImageRequest,
    ) -> AppResult<ApiResponse<CarResponse>> {
        request.validate()?;

        let car = self.find(id).await?;
        let relative = storage
            .save_car_image(car.id, &request.filename, &request.content_base64)
            .await?;

        let updated = storage
            .discard_on_error(&relative, self.repository.update_image(car.id, &relative).await)
            .await?;
        if let Some(previous) = car.image_path {
            storage.remove(&previous).await?;
        }

        Ok(ApiResponse::success_with_message(
            CarResponse::from(updated),
            "Imagen actualizada exitosamente",
        ))
    }

    pub async fn delete(&self, storage: &ImageStorage, id: Uuid) -> AppResult<()> {
        let car = self.find(id).await?;

        if self.repository.has_active_bookings(car.id).await? {
            return Err(AppError::Conflict(
                "El vehículo tiene reservas pendientes o aprobadas".to_string(),
            ));
        }

        self.repository.delete(car.id).await?;
        if let Some(image) = car.image_path {
            storage.remove(&image).await?;
        }

        info!(car_id = %car.id, "🗑️ Vehículo eliminado");
        Ok(())
    }
}
