use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::car_dto::{CreateCarTypeRequest, UpdateCarTypeRequest};
use crate::models::car::CarType;
use crate::utils::errors::AppResult;

pub struct CarTypeRepository {
    pool: PgPool,
}

impl CarTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateCarTypeRequest) -> AppResult<CarType> {
        let car_type = sqlx::query_as::<_, CarType>(
            r#"
            INSERT INTO car_types (id, name, capacity, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .bind(request.capacity)
        .bind(request.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(car_type)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CarType>> {
        let car_type = sqlx::query_as::<_, CarType>("SELECT * FROM car_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car_type)
    }

    pub async fn list(&self) -> AppResult<Vec<CarType>> {
        let car_types = sqlx::query_as::<_, CarType>("SELECT * FROM car_types ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(car_types)
    }

    /// Existe otro tipo con el mismo nombre (ignorando `exclude_id`)
    pub async fn name_exists(&self, name: &str, exclude_id: Option<Uuid>) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM car_types WHERE LOWER(name) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name.trim())
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(&self, current: CarType, changes: UpdateCarTypeRequest) -> AppResult<CarType> {
        let car_type = sqlx::query_as::<_, CarType>(
            r#"
            UPDATE car_types
            SET name = $2, capacity = $3, description = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(changes.name.map(|n| n.trim().to_string()).unwrap_or(current.name))
        .bind(changes.capacity.unwrap_or(current.capacity))
        .bind(changes.description.or(current.description))
        .fetch_one(&self.pool)
        .await?;

        Ok(car_type)
    }

    pub async fn count_cars_using(&self, id: Uuid) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cars WHERE car_type_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM car_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
