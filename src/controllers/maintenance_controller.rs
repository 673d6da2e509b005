use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::maintenance_dto::{CompleteMaintenanceRequest, CreateMaintenanceRequest, MaintenanceFilters};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::car::CarStatus;
use crate::models::maintenance::MaintenanceRecord;
use crate::repositories::car_repository::CarRepository;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};

pub struct MaintenanceController {
    pool: PgPool,
    repository: MaintenanceRepository,
}

impl MaintenanceController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MaintenanceRepository::new(pool.clone()),
            pool,
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<MaintenanceRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Maintenance record", &id.to_string()))
    }

    pub async fn list(&self, filters: MaintenanceFilters) -> AppResult<Vec<MaintenanceRecord>> {
        self.repository.list(&filters).await
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateMaintenanceRequest,
    ) -> AppResult<ApiResponse<MaintenanceRecord>> {
        request.validate()?;
        ensure_cost(request.cost)?;
        let mut tx = self.pool.begin().await?;

        let car = CarRepository::lock(&mut *tx, request.car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &request.car_id.to_string()))?;

        if car.status == CarStatus::Booked {
            return Err(AppError::Conflict(format!(
                "El vehículo {} tiene una reserva aprobada en curso",
                car.license_plate
            )));
        }

        let id = MaintenanceRepository::insert(
            &mut *tx,
            car.id,
            request.description.trim(),
            request.cost,
            car.mileage,
            actor.user_id,
        )
        .await?;
        CarRepository::set_status(&mut *tx, car.id, CarStatus::Maintenance).await?;
        tx.commit().await?;

        info!(maintenance_id = %id, car_id = %car.id, "🔧 Vehículo enviado a mantenimiento");
        Ok(ApiResponse::success_with_message(
            self.find(id).await?,
            "Mantenimiento registrado",
        ))
    }

    pub async fn complete(
        &self,
        id: Uuid,
        request: CompleteMaintenanceRequest,
    ) -> AppResult<ApiResponse<MaintenanceRecord>> {
        ensure_cost(request.cost)?;
        let mut tx = self.pool.begin().await?;

        let record = MaintenanceRepository::lock(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found_error("Maintenance record", &id.to_string()))?;

        if !record.is_open() {
            return Err(AppError::Conflict("El mantenimiento ya está completado".to_string()));
        }

        MaintenanceRepository::mark_completed(&mut *tx, record.id, request.cost).await?;
        release_car(&mut *tx, &record).await?;
        tx.commit().await?;

        info!(maintenance_id = %record.id, car_id = %record.car_id, "✅ Mantenimiento completado");
        Ok(ApiResponse::success_with_message(
            self.find(id).await?,
            "Mantenimiento completado",
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let record = MaintenanceRepository::lock(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found_error("Maintenance record", &id.to_string()))?;

        MaintenanceRepository::delete(&mut *tx, record.id).await?;
        if record.is_open() {
            release_car(&mut *tx, &record).await?;
        }
        tx.commit().await?;

        info!(maintenance_id = %record.id, "🗑️ Registro de mantenimiento eliminado");
        Ok(())
    }
}

/// El vehículo vuelve a estar disponible salvo que siga otro mantenimiento abierto
async fn release_car(conn: &mut PgConnection, record: &MaintenanceRecord) -> AppResult<()> {
    let Some(car) = CarRepository::lock(&mut *conn, record.car_id).await? else {
        return Ok(());
    };

    if car.status != CarStatus::Maintenance
        || MaintenanceRepository::other_open_for_car(&mut *conn, car.id, record.id).await?
    {
        return Ok(());
    }

    CarRepository::set_status(&mut *conn, car.id, CarStatus::Available).await
}

fn ensure_cost(cost: Option<Decimal>) -> AppResult<()> {
    match cost {
        Some(cost) if cost.is_sign_negative() => Err(validation_error("cost", "El coste no puede ser negativo")),
        _ => Ok(()),
    }
}
