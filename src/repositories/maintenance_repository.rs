use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::maintenance_dto::MaintenanceFilters;
use crate::models::maintenance::MaintenanceRecord;
use crate::utils::errors::AppResult;

const SELECT_RECORD: &str = r#"
    SELECT m.id, m.car_id, c.license_plate, m.description, m.cost, m.mileage,
           m.started_at, m.completed_at, m.created_by, m.created_at
    FROM maintenance_records m
    JOIN cars c ON c.id = m.car_id
"#;

pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRecord>> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(&format!("{} WHERE m.id = $1", SELECT_RECORD))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    pub async fn list(&self, filters: &MaintenanceFilters) -> AppResult<Vec<MaintenanceRecord>> {
        let records = sqlx::query_as::<_, MaintenanceRecord>(&format!(
            r#"{}
            WHERE ($1::uuid IS NULL OR m.car_id = $1)
              AND (NOT $2 OR m.completed_at IS NULL)
            ORDER BY m.started_at DESC
            "#,
            SELECT_RECORD
        ))
        .bind(filters.car_id)
        .bind(filters.open_only.unwrap_or(false))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn count_open(&self) -> AppResult<i64> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM maintenance_records WHERE completed_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    // Operaciones dentro de una transacción

    pub async fn insert(
        conn: &mut PgConnection,
        car_id: Uuid,
        description: &str,
        cost: Option<Decimal>,
        mileage: i32,
        created_by: Uuid,
    ) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO maintenance_records (id, car_id, description, cost, mileage, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(car_id)
        .bind(description)
        .bind(cost)
        .bind(mileage)
        .bind(created_by)
        .execute(conn)
        .await?;

        Ok(id)
    }

    pub async fn lock(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<MaintenanceRecord>> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(&format!(
            "{} WHERE m.id = $1 FOR UPDATE OF m",
            SELECT_RECORD
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(record)
    }

    pub async fn mark_completed(conn: &mut PgConnection, id: Uuid, cost: Option<Decimal>) -> AppResult<()> {
        sqlx::query("UPDATE maintenance_records SET completed_at = NOW(), cost = COALESCE($2, cost) WHERE id = $1")
            .bind(id)
            .bind(cost)
            .execute(conn)
            .await?;

        Ok(())
    }

    pub async fn open_for_car(conn: &mut PgConnection, car_id: Uuid) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM maintenance_records WHERE car_id = $1 AND completed_at IS NULL)",
        )
        .bind(car_id)
        .fetch_one(conn)
        .await?;

        Ok(result.0)
    }

    /// Otro mantenimiento abierto para el mismo vehículo
    pub async fn other_open_for_car(conn: &mut PgConnection, car_id: Uuid, exclude_id: Uuid) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM maintenance_records WHERE car_id = $1 AND id <> $2 AND completed_at IS NULL)",
        )
        .bind(car_id)
        .bind(exclude_id)
        .fetch_one(conn)
        .await?;

        Ok(result.0)
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM maintenance_records WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(())
    }
}
