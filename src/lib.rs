//! Reserva de vehículos de empresa y tarjetas de visita
//!
//! API REST sobre axum + PostgreSQL: flota de vehículos, solicitudes de
//! reserva con aprobación, mantenimiento y tarjetas de visita en vCard.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
