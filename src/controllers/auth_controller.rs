use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::dto::user_dto::UserResponse;
use crate::repositories::user_repository::UserRepository;
use crate::services::password::{hash_password, verify_password};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    repository: UserRepository,
}

impl AuthController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn login(&self, request: LoginRequest, jwt: &JwtConfig) -> AppResult<LoginResponse> {
        request.validate()?;

        let user = self
            .repository
            .find_by_username(request.username.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        if !verify_password(&request.password, &user.password_hash).await? {
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        if !user.is_active {
            return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
        }

        let token = generate_token(user.id, user.role, jwt)?;
        info!(user_id = %user.id, role = user.role.as_str(), "🔑 Login correcto");

        Ok(LoginResponse {
            success: true,
            token,
            expires_in: jwt.expiration,
            user: UserResponse::from(user),
        })
    }

    pub async fn me(&self, user_id: Uuid) -> AppResult<UserResponse> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        Ok(UserResponse::from(user))
    }

    pub async fn change_password(&self, user_id: Uuid, request: ChangePasswordRequest) -> AppResult<()> {
        request.validate()?;

        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        if !verify_password(&request.current_password, &user.password_hash).await? {
            return Err(AppError::BadRequest("La contraseña actual no es correcta".to_string()));
        }

        let password_hash = hash_password(&request.new_password).await?;
        self.repository.update_password(user.id, &password_hash).await?;

        info!(user_id = %user.id, "🔑 Contraseña actualizada");
        Ok(())
    }
}
