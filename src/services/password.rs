//! Hash y verificación de contraseñas con bcrypt
//!
//! bcrypt bloquea la CPU, así que se ejecuta en `spawn_blocking`.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::utils::errors::{AppError, AppResult};

pub async fn hash_password(password: &str) -> AppResult<String> {
    hash_password_with_cost(password, DEFAULT_COST).await
}

pub async fn hash_password_with_cost(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Tarea de hash abortada: {}", e)))?
        .map_err(|e| AppError::Hash(format!("Error hasheando password: {}", e)))
}

pub async fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Tarea de verificación abortada: {}", e)))?
        .map_err(|e| AppError::Hash(format!("Error verificando password: {}", e)))
}
