use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::car_dto::{CreateCarTypeRequest, UpdateCarTypeRequest};
use crate::models::car::CarType;
use crate::repositories::car_type_repository::CarTypeRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub struct CarTypeController {
    repository: CarTypeRepository,
}

impl CarTypeController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CarTypeRepository::new(pool),
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<CarType> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Car type", &id.to_string()))
    }

    pub async fn list(&self) -> AppResult<Vec<CarType>> {
        self.repository.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<CarType> {
        self.find(id).await
    }

    pub async fn create(&self, request: CreateCarTypeRequest) -> AppResult<ApiResponse<CarType>> {
        request.validate()?;

        if self.repository.name_exists(&request.name, None).await? {
            return Err(conflict_error("Car type", "name", request.name.trim()));
        }

        let car_type = self.repository.create(request).await?;
        info!(car_type_id = %car_type.id, name = %car_type.name, "🚙 Tipo de vehículo creado");

        Ok(ApiResponse::success_with_message(car_type, "Tipo de vehículo creado exitosamente"))
    }

    pub async fn update(&self, id: Uuid, request: UpdateCarTypeRequest) -> AppResult<ApiResponse<CarType>> {
        request.validate()?;

        let current = self.find(id).await?;
        if let Some(name) = &request.name {
            if self.repository.name_exists(name, Some(id)).await? {
                return Err(conflict_error("Car type", "name", name.trim()));
            }
        }

        let car_type = self.repository.update(current, request).await?;
        Ok(ApiResponse::success_with_message(car_type, "Tipo de vehículo actualizado exitosamente"))
    }

    /// Un tipo en uso por algún vehículo no se puede borrar
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let car_type = self.find(id).await?;

        let in_use = self.repository.count_cars_using(car_type.id).await?;
        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "El tipo '{}' está asignado a {} vehículo(s)",
                car_type.name, in_use
            )));
        }

        self.repository.delete(car_type.id).await?;
        info!(car_type_id = %car_type.id, "🗑️ Tipo de vehículo eliminado");
        Ok(())
    }
}
