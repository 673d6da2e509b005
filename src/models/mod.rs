//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL.

pub mod booking;
pub mod business_card;
pub mod car;
pub mod maintenance;
pub mod user;

pub use booking::{Booking, BookingAction, BookingDetails, BookingStatus};
pub use business_card::BusinessCard;
pub use car::{Car, CarStatus, CarType};
pub use maintenance::MaintenanceRecord;
pub use user::{User, UserRole};
