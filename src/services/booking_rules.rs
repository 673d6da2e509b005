//! Reglas de negocio de las reservas
//!
//! Funciones puras: parseo del rango, capacidad, kilometraje
//! y estado del vehículo al liberarlo. Los controladores las combinan con
//! las consultas dentro de una transacción.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use validator::{ValidationError, ValidationErrors};

use crate::models::car::CarStatus;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{validate_date, validate_time};

/// Rango de fecha/hora de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
}

impl BookingWindow {
    /// Parsear y validar el rango; el fin debe ser posterior al inicio
    pub fn parse(start_date: &str, start_time: &str, end_date: &str, end_time: &str) -> AppResult<Self> {
        let mut errors = ValidationErrors::new();

        let start_date = collect(&mut errors, "start_date", validate_date(start_date));
        let start_time = collect(&mut errors, "start_time", validate_time(start_time));
        let end_date = collect(&mut errors, "end_date", validate_date(end_date));
        let end_time = collect(&mut errors, "end_time", validate_time(end_time));

        let (Some(start_date), Some(start_time), Some(end_date), Some(end_time)) =
            (start_date, start_time, end_date, end_time)
        else {
            return Err(AppError::Validation(errors));
        };

        let window = Self {
            start_date,
            start_time,
            end_date,
            end_time,
        };

        if window.ends_at() <= window.starts_at() {
            return Err(AppError::BadRequest(
                "La fecha de fin debe ser posterior a la de inicio".to_string(),
            ));
        }

        Ok(window)
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.start_date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.end_date.and_time(self.end_time)
    }

    pub fn ensure_not_in_past(&self, now: NaiveDateTime) -> AppResult<()> {
        if self.starts_at() < now {
            return Err(AppError::BadRequest(
                "No se puede reservar en una fecha pasada".to_string(),
            ));
        }
        Ok(())
    }
}

fn collect<T>(errors: &mut ValidationErrors, field: &'static str, result: Result<T, ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.add(field, error);
            None
        }
    }
}

pub fn validate_passengers(passengers: i32, capacity: i32) -> AppResult<()> {
    if passengers < 1 {
        return Err(AppError::BadRequest("Debe haber al menos un pasajero".to_string()));
    }
    if passengers > capacity {
        return Err(AppError::BadRequest(format!(
            "El vehículo admite como máximo {} pasajeros",
            capacity
        )));
    }
    Ok(())
}

/// Kilómetros recorridos entre la salida y la devolución
pub fn compute_distance(start_mileage: i32, end_mileage: i32) -> AppResult<i32> {
    if end_mileage < start_mileage {
        return Err(AppError::BadRequest(format!(
            "El kilometraje de devolución ({}) no puede ser menor que el de salida ({})",
            end_mileage, start_mileage
        )));
    }
    Ok(end_mileage - start_mileage)
}

/// Estado del vehículo cuando una reserva aprobada lo libera
pub fn car_status_after_release(current: CarStatus, held_by_other: bool) -> CarStatus {
    match current {
        CarStatus::Maintenance => CarStatus::Maintenance,
        _ if held_by_other => CarStatus::Booked,
        _ => CarStatus::Available,
    }
}

/// Cambio manual de estado por un administrador. `held` indica que hay una
/// reserva aprobada y `open_maintenance` un mantenimiento sin cerrar.
pub fn check_manual_status_change(
    current: CarStatus,
    target: CarStatus,
    held: bool,
    open_maintenance: bool,
) -> AppResult<()> {
    if current == target {
        return Ok(());
    }
    if held {
        return Err(AppError::Conflict(
            "El vehículo tiene una reserva aprobada; usa la devolución o la cancelación".to_string(),
        ));
    }
    if open_maintenance {
        return Err(AppError::Conflict(
            "El vehículo tiene un mantenimiento abierto; complétalo o elimínalo".to_string(),
        ));
    }
    if target == CarStatus::Booked {
        return Err(AppError::Conflict(
            "Solo la aprobación de una reserva marca un vehículo como reservado".to_string(),
        ));
    }
    Ok(())
}
