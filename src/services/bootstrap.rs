//! Creación del primer administrador
//!
//! Si no existe ningún administrador activo y están definidas
//! `ADMIN_USERNAME` y `ADMIN_PASSWORD`, se crea uno al arrancar.

use sqlx::PgPool;
use tracing::{info, warn};

use crate::models::user::UserRole;
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::services::password::hash_password;
use crate::utils::errors::AppResult;

pub async fn ensure_admin(pool: &PgPool) -> AppResult<()> {
    let repository = UserRepository::new(pool.clone());
    if repository.admin_exists().await? {
        return Ok(());
    }

    let (Ok(username), Ok(password)) = (std::env::var("ADMIN_USERNAME"), std::env::var("ADMIN_PASSWORD")) else {
        warn!("⚠️ No hay administradores y ADMIN_USERNAME/ADMIN_PASSWORD no están definidos");
        return Ok(());
    };

    if repository.username_exists(&username).await? {
        warn!(username = %username, "⚠️ El usuario administrador inicial ya existe con otro rol");
        return Ok(());
    }

    let password_hash = hash_password(&password).await?;
    repository
        .create(NewUser {
            username: username.clone(),
            password_hash,
            full_name: "Administrator".to_string(),
            email: None,
            phone: None,
            department: None,
            position: None,
            role: UserRole::Admin,
        })
        .await?;

    info!(username = %username, "👤 Administrador inicial creado");
    Ok(())
}
