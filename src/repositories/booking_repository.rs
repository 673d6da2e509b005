use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::booking::{Booking, BookingDetails, BookingStatus};
use crate::utils::errors::AppResult;

const SELECT_DETAILS: &str = r#"
    SELECT b.*, u.full_name AS user_full_name, u.department,
           c.license_plate, c.brand AS car_brand, c.model AS car_model,
           a.full_name AS approver_name
    FROM bookings b
    JOIN users u ON u.id = b.user_id
    JOIN cars c ON c.id = b.car_id
    LEFT JOIN users a ON a.id = b.approved_by
"#;

/// Datos validados de una nueva reserva
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub destination: String,
    pub purpose: Option<String>,
    pub passengers: i32,
}

/// Filtros ya parseados para el listado
#[derive(Debug, Default, Clone)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
    pub car_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_details(&self, id: Uuid) -> AppResult<Option<BookingDetails>> {
        let booking = sqlx::query_as::<_, BookingDetails>(&format!("{} WHERE b.id = $1", SELECT_DETAILS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn list(&self, query: &BookingQuery) -> AppResult<Vec<BookingDetails>> {
        let bookings = sqlx::query_as::<_, BookingDetails>(&format!(
            r#"{}
            WHERE ($1::booking_status IS NULL OR b.status = $1)
              AND ($2::uuid IS NULL OR b.car_id = $2)
              AND ($3::uuid IS NULL OR b.user_id = $3)
              AND ($4::date IS NULL OR b.end_date >= $4)
              AND ($5::date IS NULL OR b.start_date <= $5)
            ORDER BY b.start_date DESC, b.start_time DESC
            "#,
            SELECT_DETAILS
        ))
        .bind(query.status)
        .bind(query.car_id)
        .bind(query.user_id)
        .bind(query.from_date)
        .bind(query.to_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn count_by_status(&self) -> AppResult<Vec<(BookingStatus, i64)>> {
        let rows: Vec<(BookingStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM bookings GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }

    pub async fn total_distance(&self) -> AppResult<i64> {
        let result: (Option<i64>,) =
            sqlx::query_as("SELECT SUM(distance)::bigint FROM bookings WHERE status = 'completed'")
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0.unwrap_or(0))
    }

    // Operaciones dentro de una transacción

    pub async fn insert(conn: &mut PgConnection, booking: &NewBooking) -> AppResult<Booking> {
        let created = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, user_id, car_id, start_date, start_time, end_date, end_time,
                                  destination, purpose, passengers, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking.user_id)
        .bind(booking.car_id)
        .bind(booking.start_date)
        .bind(booking.start_time)
        .bind(booking.end_date)
        .bind(booking.end_time)
        .bind(&booking.destination)
        .bind(&booking.purpose)
        .bind(booking.passengers)
        .fetch_one(conn)
        .await?;

        Ok(created)
    }

    /// Bloquear la reserva hasta el fin de la transacción
    pub async fn lock(conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(booking)
    }

    /// Hay una reserva que se solapa con el rango. Con `include_pending`
    /// cuentan también las pendientes; si no, solo las aprobadas.
    pub async fn has_overlap(
        conn: &mut PgConnection,
        car_id: Uuid,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
        exclude_id: Option<Uuid>,
        include_pending: bool,
    ) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE car_id = $1
                  AND ($4::uuid IS NULL OR id <> $4)
                  AND (status = 'approved' OR ($5 AND status = 'pending'))
                  AND (start_date + start_time) < $3
                  AND (end_date + end_time) > $2
            )
            "#,
        )
        .bind(car_id)
        .bind(starts_at)
        .bind(ends_at)
        .bind(exclude_id)
        .bind(include_pending)
        .fetch_one(conn)
        .await?;

        Ok(result.0)
    }

    /// Alguna reserva aprobada ocupa el vehículo
    pub async fn car_is_held(conn: &mut PgConnection, car_id: Uuid) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM bookings WHERE car_id = $1 AND status = 'approved')")
                .bind(car_id)
                .fetch_one(conn)
                .await?;

        Ok(result.0)
    }

    /// Otra reserva aprobada sigue ocupando el vehículo
    pub async fn car_held_by_other(conn: &mut PgConnection, car_id: Uuid, exclude_id: Uuid) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE car_id = $1 AND id <> $2 AND status = 'approved')",
        )
        .bind(car_id)
        .bind(exclude_id)
        .fetch_one(conn)
        .await?;

        Ok(result.0)
    }

    pub async fn mark_approved(
        conn: &mut PgConnection,
        id: Uuid,
        approver_id: Uuid,
        start_mileage: i32,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE bookings
            SET status = 'approved', approved_by = $2, approved_at = NOW(),
                start_mileage = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(approver_id)
        .bind(start_mileage)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn mark_rejected(
        conn: &mut PgConnection,
        id: Uuid,
        approver_id: Uuid,
        reason: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE bookings
            SET status = 'rejected', approved_by = $2, approved_at = NOW(),
                rejection_reason = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(approver_id)
        .bind(reason)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Cerrar la reserva; `start_mileage` se reescribe con la lectura de salida real
    pub async fn mark_returned(
        conn: &mut PgConnection,
        id: Uuid,
        start_mileage: i32,
        end_mileage: i32,
        distance: i32,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE bookings
            SET status = 'completed', start_mileage = $2, end_mileage = $3, distance = $4,
                returned_at = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(start_mileage)
        .bind(end_mileage)
        .bind(distance)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn mark_cancelled(conn: &mut PgConnection, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE bookings SET status = 'cancelled', updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(())
    }
}
