use chrono::NaiveDateTime;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::car_dto::{CarFilters, CreateCarRequest, UpdateCarRequest};
use crate::models::car::{Car, CarStatus};
use crate::utils::errors::AppResult;

const SELECT_CAR: &str = r#"
    SELECT c.id, c.car_type_id, t.name AS car_type_name, t.capacity, c.license_plate,
           c.brand, c.model, c.color, c.status, c.mileage, c.image_path,
           c.created_at, c.updated_at
    FROM cars c
    JOIN car_types t ON t.id = c.car_type_id
"#;

pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, license_plate: String, request: CreateCarRequest) -> AppResult<Car> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO cars (id, car_type_id, license_plate, brand, model, color, status, mileage)
            VALUES ($1, $2, $3, $4, $5, $6, 'available', $7)
            "#,
        )
        .bind(id)
        .bind(request.car_type_id)
        .bind(license_plate)
        .bind(request.brand.trim())
        .bind(request.model.trim())
        .bind(request.color)
        .bind(request.mileage.unwrap_or(0))
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>(&format!("{} WHERE c.id = $1", SELECT_CAR))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    async fn get(&self, id: Uuid) -> AppResult<Car> {
        let car = sqlx::query_as::<_, Car>(&format!("{} WHERE c.id = $1", SELECT_CAR))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(car)
    }

    pub async fn list(&self, filters: &CarFilters) -> AppResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(&format!(
            r#"{}
            WHERE ($1::car_status IS NULL OR c.status = $1)
              AND ($2::uuid IS NULL OR c.car_type_id = $2)
            ORDER BY c.license_plate
            "#,
            SELECT_CAR
        ))
        .bind(filters.status)
        .bind(filters.car_type_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    /// Vehículos fuera de mantenimiento sin reservas activas que se solapen
    pub async fn list_available(
        &self,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
        passengers: Option<i32>,
    ) -> AppResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(&format!(
            r#"{}
            WHERE c.status <> 'maintenance'
              AND ($3::int IS NULL OR t.capacity >= $3)
              AND NOT EXISTS (
                  SELECT 1 FROM bookings b
                  WHERE b.car_id = c.id
                    AND b.status IN ('pending', 'approved')
                    AND (b.start_date + b.start_time) < $2
                    AND (b.end_date + b.end_time) > $1
              )
            ORDER BY t.capacity, c.license_plate
            "#,
            SELECT_CAR
        ))
        .bind(starts_at)
        .bind(ends_at)
        .bind(passengers)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    /// Existe otro vehículo con la misma matrícula (ignorando `exclude_id`)
    pub async fn license_plate_exists(&self, license_plate: &str, exclude_id: Option<Uuid>) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM cars WHERE license_plate = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(license_plate)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(&self, current: Car, license_plate: Option<String>, changes: UpdateCarRequest) -> AppResult<Car> {
        sqlx::query(
            r#"
            UPDATE cars
            SET car_type_id = $2, license_plate = $3, brand = $4, model = $5, color = $6,
                mileage = $7, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(current.id)
        .bind(changes.car_type_id.unwrap_or(current.car_type_id))
        .bind(license_plate.unwrap_or(current.license_plate))
        .bind(changes.brand.unwrap_or(current.brand))
        .bind(changes.model.unwrap_or(current.model))
        .bind(changes.color.or(current.color))
        .bind(changes.mileage.unwrap_or(current.mileage))
        .execute(&self.pool)
        .await?;

        self.get(current.id).await
    }

    pub async fn update_image(&self, id: Uuid, image_path: &str) -> AppResult<Car> {
        sqlx::query("UPDATE cars SET image_path = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(image_path)
            .execute(&self.pool)
            .await?;

        self.get(id).await
    }

    pub async fn has_active_bookings(&self, id: Uuid) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE car_id = $1 AND status IN ('pending', 'approved'))",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count_by_status(&self) -> AppResult<Vec<(CarStatus, i64)>> {
        let rows: Vec<(CarStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM cars GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }

    // Operaciones dentro de una transacción

    /// Bloquear la fila del vehículo hasta el fin de la transacción
    pub async fn lock(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>(&format!("{} WHERE c.id = $1 FOR UPDATE OF c", SELECT_CAR))
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(car)
    }

    pub async fn set_status(conn: &mut PgConnection, id: Uuid, status: CarStatus) -> AppResult<()> {
        sqlx::query("UPDATE cars SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(conn)
            .await?;

        Ok(())
    }

    pub async fn set_mileage_and_status(
        conn: &mut PgConnection,
        id: Uuid,
        mileage: i32,
        status: CarStatus,
    ) -> AppResult<()> {
        sqlx::query("UPDATE cars SET mileage = $2, status = $3, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(mileage)
            .bind(status)
            .execute(conn)
            .await?;

        Ok(())
    }
}
