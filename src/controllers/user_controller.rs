use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::user_dto::{CreateUserRequest, ResetPasswordRequest, UpdateUserRequest, UserFilters, UserResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::{User, UserRole};
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::services::password::hash_password;
use crate::utils::errors::{conflict_error, forbidden_error, not_found_error, AppError, AppResult};

pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("User", &id.to_string()))
    }

    pub async fn list(&self, filters: UserFilters) -> AppResult<Vec<UserResponse>> {
        let users = self.repository.list(&filters).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<UserResponse> {
        Ok(UserResponse::from(self.find(id).await?))
    }

    pub async fn create(&self, request: CreateUserRequest) -> AppResult<ApiResponse<UserResponse>> {
        request.validate()?;

        let username = request.username.trim().to_string();
        if self.repository.username_exists(&username).await? {
            return Err(conflict_error("User", "username", &username));
        }

        let password_hash = hash_password(&request.password).await?;

        let user = self
            .repository
            .create(NewUser {
                username,
                password_hash,
                full_name: request.full_name.trim().to_string(),
                email: request.email,
                phone: request.phone,
                department: request.department,
                position: request.position,
                role: request.role.unwrap_or(UserRole::Employee),
            })
            .await?;

        info!(user_id = %user.id, role = user.role.as_str(), "👤 Usuario creado");
        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "Usuario creado exitosamente",
        ))
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> AppResult<ApiResponse<UserResponse>> {
        request.validate()?;

        if actor.user_id == id {
            if request.is_active == Some(false) {
                return Err(forbidden_error("deactivate user", "you cannot deactivate your own account"));
            }
            if matches!(request.role, Some(role) if role != UserRole::Admin) {
                return Err(forbidden_error("change role", "you cannot remove your own admin role"));
            }
        }

        let current = self.find(id).await?;
        let user = self.repository.update(current, request).await?;

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "Usuario actualizado exitosamente",
        ))
    }

    pub async fn reset_password(&self, id: Uuid, request: ResetPasswordRequest) -> AppResult<()> {
        request.validate()?;

        let user = self.find(id).await?;
        let password_hash = hash_password(&request.new_password).await?;
        self.repository.update_password(user.id, &password_hash).await?;

        info!(user_id = %user.id, "🔑 Contraseña restablecida por un administrador");
        Ok(())
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        if actor.user_id == id {
            return Err(forbidden_error("delete user", "you cannot delete your own account"));
        }

        let user = self.find(id).await?;

        if self.repository.has_active_bookings(user.id).await? {
            return Err(AppError::Conflict(
                "El usuario tiene reservas pendientes o aprobadas".to_string(),
            ));
        }

        self.repository.delete(user.id).await?;
        info!(user_id = %user.id, "🗑️ Usuario eliminado");
        Ok(())
    }
}
