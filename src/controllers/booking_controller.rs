//! Ciclo de vida de las reservas
//!
//! Cada cambio de estado bloquea la fila de la reserva (y la del vehículo
//! cuando también cambia) dentro de una única transacción, de modo que
//! reserva y vehículo nunca quedan desincronizados.

use chrono::Local;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::booking_dto::{BookingFilters, CreateBookingRequest, RejectBookingRequest, ReturnBookingRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::booking::{BookingAction, BookingDetails, BookingStatus};
use crate::models::car::CarStatus;
use crate::repositories::booking_repository::{BookingQuery, BookingRepository, NewBooking};
use crate::repositories::car_repository::CarRepository;
use crate::services::booking_rules::{car_status_after_release, compute_distance, validate_passengers, BookingWindow};
use crate::utils::errors::{field_validation_error, not_found_error, AppError, AppResult};
use crate::utils::validation::validate_date;

pub struct BookingController {
    pool: PgPool,
    repository: BookingRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BookingRepository::new(pool.clone()),
            pool,
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<BookingDetails> {
        self.repository
            .find_details(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))
    }

    /// Los empleados solo ven sus propias reservas
    pub async fn list(&self, actor: &AuthenticatedUser, filters: BookingFilters) -> AppResult<Vec<BookingDetails>> {
        let from_date = filters
            .from_date
            .as_deref()
            .map(validate_date)
            .transpose()
            .map_err(|e| field_validation_error("from_date", e))?;
        let to_date = filters
            .to_date
            .as_deref()
            .map(validate_date)
            .transpose()
            .map_err(|e| field_validation_error("to_date", e))?;

        let query = BookingQuery {
            status: filters.status,
            car_id: filters.car_id,
            user_id: if actor.is_admin() { filters.user_id } else { Some(actor.user_id) },
            from_date,
            to_date,
        };

        self.repository.list(&query).await
    }

    pub async fn get_by_id(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<BookingDetails> {
        let details = self.find(id).await?;
        actor.require_owner_or_admin(details.booking.user_id)?;
        Ok(details)
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateBookingRequest,
    ) -> AppResult<ApiResponse<BookingDetails>> {
        request.validate()?;

        let window = BookingWindow::parse(
            &request.start_date,
            &request.start_time,
            &request.end_date,
            &request.end_time,
        )?;
        window.ensure_not_in_past(Local::now().naive_local())?;
        let passengers = request.passengers.unwrap_or(1);

        let mut tx = self.pool.begin().await?;

        // El bloqueo del vehículo serializa reservas concurrentes sobre él
        let car = CarRepository::lock(&mut *tx, request.car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &request.car_id.to_string()))?;

        if car.is_in_maintenance() {
            return Err(AppError::Conflict(format!(
                "El vehículo {} está en mantenimiento",
                car.license_plate
            )));
        }
        validate_passengers(passengers, car.capacity)?;

        if BookingRepository::has_overlap(&mut *tx, car.id, window.starts_at(), window.ends_at(), None, true).await? {
            return Err(AppError::Conflict(format!(
                "El vehículo {} ya está reservado en ese horario",
                car.license_plate
            )));
        }

        let booking = BookingRepository::insert(
            &mut *tx,
            &NewBooking {
                user_id: actor.user_id,
                car_id: car.id,
                start_date: window.start_date,
                start_time: window.start_time,
                end_date: window.end_date,
                end_time: window.end_time,
                destination: request.destination.trim().to_string(),
                purpose: request.purpose,
                passengers,
            },
        )
        .await?;

        tx.commit().await?;
        info!(booking_id = %booking.id, car_id = %car.id, user_id = %actor.user_id, "📅 Reserva creada");

        Ok(ApiResponse::success_with_message(
            self.find(booking.id).await?,
            "Reserva creada exitosamente",
        ))
    }

    pub async fn approve(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<ApiResponse<BookingDetails>> {
        actor.require_admin()?;
        let mut tx = self.pool.begin().await?;

        let booking = BookingRepository::lock(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;
        let next = booking.status.transition(BookingAction::Approve)?;

        let car = CarRepository::lock(&mut *tx, booking.car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &booking.car_id.to_string()))?;

        if car.is_in_maintenance() {
            return Err(AppError::Conflict(format!(
                "El vehículo {} está en mantenimiento",
                car.license_plate
            )));
        }

        if BookingRepository::has_overlap(
            &mut *tx,
            car.id,
            booking.starts_at(),
            booking.ends_at(),
            Some(booking.id),
            false,
        )
        .await?
        {
            return Err(AppError::Conflict(
                "Otra reserva aprobada se solapa con este horario".to_string(),
            ));
        }

        BookingRepository::mark_approved(&mut *tx, booking.id, actor.user_id, car.mileage).await?;
        CarRepository::set_status(&mut *tx, car.id, CarStatus::Booked).await?;
        tx.commit().await?;

        info!(booking_id = %booking.id, car_id = %car.id, status = next.as_str(), "✅ Reserva aprobada");
        Ok(ApiResponse::success_with_message(self.find(id).await?, "Reserva aprobada"))
    }

    pub async fn reject(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: RejectBookingRequest,
    ) -> AppResult<ApiResponse<BookingDetails>> {
        actor.require_admin()?;
        request.validate()?;
        let mut tx = self.pool.begin().await?;

        let booking = BookingRepository::lock(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;
        let next = booking.status.transition(BookingAction::Reject)?;

        let reason = request.reason.as_deref().map(str::trim).filter(|r| !r.is_empty());
        BookingRepository::mark_rejected(&mut *tx, booking.id, actor.user_id, reason).await?;
        tx.commit().await?;

        info!(booking_id = %booking.id, status = next.as_str(), "❌ Reserva rechazada");
        Ok(ApiResponse::success_with_message(self.find(id).await?, "Reserva rechazada"))
    }

    /// Devolución: registra el kilometraje final y libera el vehículo
    pub async fn return_car(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: ReturnBookingRequest,
    ) -> AppResult<ApiResponse<BookingDetails>> {
        request.validate()?;
        let mut tx = self.pool.begin().await?;

        let booking = BookingRepository::lock(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;
        actor.require_owner_or_admin(booking.user_id)?;
        let next = booking.status.transition(BookingAction::Return)?;

        let car = CarRepository::lock(&mut *tx, booking.car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &booking.car_id.to_string()))?;

        // Otras reservas aprobadas pueden haber movido el vehículo desde la aprobación
        let start_mileage = car.mileage;
        let distance = compute_distance(start_mileage, request.end_mileage)?;

        let held_by_other = BookingRepository::car_held_by_other(&mut *tx, car.id, booking.id).await?;
        let car_status = car_status_after_release(car.status, held_by_other);

        BookingRepository::mark_returned(&mut *tx, booking.id, start_mileage, request.end_mileage, distance).await?;
        CarRepository::set_mileage_and_status(&mut *tx, car.id, request.end_mileage, car_status).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking.id,
            car_id = %car.id,
            distance,
            status = next.as_str(),
            "🏁 Vehículo devuelto"
        );
        Ok(ApiResponse::success_with_message(self.find(id).await?, "Vehículo devuelto"))
    }

    pub async fn cancel(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<ApiResponse<BookingDetails>> {
        let mut tx = self.pool.begin().await?;

        let booking = BookingRepository::lock(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;
        actor.require_owner_or_admin(booking.user_id)?;
        let next = booking.status.transition(BookingAction::Cancel)?;

        BookingRepository::mark_cancelled(&mut *tx, booking.id).await?;

        if booking.status == BookingStatus::Approved {
            if let Some(car) = CarRepository::lock(&mut *tx, booking.car_id).await? {
                let held_by_other = BookingRepository::car_held_by_other(&mut *tx, car.id, booking.id).await?;
                let car_status = car_status_after_release(car.status, held_by_other);
                CarRepository::set_status(&mut *tx, car.id, car_status).await?;
            }
        }
        tx.commit().await?;

        info!(booking_id = %booking.id, status = next.as_str(), "🚫 Reserva cancelada");
        Ok(ApiResponse::success_with_message(self.find(id).await?, "Reserva cancelada"))
    }
}
