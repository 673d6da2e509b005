//! Servicios del sistema
//!
//! Reglas de negocio puras y servicios de apoyo (imágenes, vCard,
//! contraseñas, arranque).

pub mod booking_rules;
pub mod bootstrap;
pub mod image_storage;
pub mod password;
pub mod vcard;
