//! Acceso a datos: una estructura por tabla sobre el `PgPool` compartido.
//! Las funciones asociadas que reciben `&mut PgConnection` se usan dentro
//! de transacciones.

pub mod booking_repository;
pub mod business_card_repository;
pub mod car_repository;
pub mod car_type_repository;
pub mod maintenance_repository;
pub mod user_repository;
