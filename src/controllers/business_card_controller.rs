use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::business_card_dto::{BusinessCardFilters, BusinessCardRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::business_card::BusinessCard;
use crate::repositories::business_card_repository::{BusinessCardFields, BusinessCardRepository};
use crate::repositories::user_repository::UserRepository;
use crate::services::vcard::{render_vcard, vcard_filename};
use crate::utils::errors::{forbidden_error, not_found_error, AppResult};

pub struct BusinessCardController {
    repository: BusinessCardRepository,
    users: UserRepository,
}

impl BusinessCardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BusinessCardRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    /// Buscar la tarjeta y comprobar que pertenece al usuario (o que es admin)
    async fn find_owned(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<BusinessCard> {
        let card = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Business card", &id.to_string()))?;
        actor.require_owner_or_admin(card.user_id)?;
        Ok(card)
    }

    pub async fn list(&self, actor: &AuthenticatedUser, filters: BusinessCardFilters) -> AppResult<Vec<BusinessCard>> {
        let owner = if filters.all.unwrap_or(false) {
            if !actor.is_admin() {
                return Err(forbidden_error("list business cards", "admin role required"));
            }
            None
        } else {
            Some(actor.user_id)
        };

        self.repository.list(owner).await
    }

    pub async fn get_by_id(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<BusinessCard> {
        self.find_owned(actor, id).await
    }

    /// Los campos omitidos se rellenan con el perfil del usuario y el nombre de la empresa
    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: BusinessCardRequest,
        company_name: &str,
    ) -> AppResult<ApiResponse<BusinessCard>> {
        request.validate()?;

        let user = self
            .users
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| not_found_error("User", &actor.user_id.to_string()))?;

        let fields = BusinessCardFields {
            full_name: clean(request.full_name).unwrap_or(user.full_name),
            position: clean(request.position).or(user.position),
            department: clean(request.department).or(user.department),
            company_name: clean(request.company_name).or_else(|| Some(company_name.to_string())),
            email: clean(request.email).or(user.email),
            phone: clean(request.phone).or(user.phone),
            address: clean(request.address),
            website: clean(request.website),
        };

        let card = self.repository.create(user.id, fields).await?;
        info!(card_id = %card.id, user_id = %user.id, "🪪 Tarjeta de visita creada");

        Ok(ApiResponse::success_with_message(card, "Tarjeta de visita creada"))
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: BusinessCardRequest,
    ) -> AppResult<ApiResponse<BusinessCard>> {
        request.validate()?;
        let current = self.find_owned(actor, id).await?;

        let fields = BusinessCardFields {
            full_name: clean(request.full_name).unwrap_or(current.full_name),
            position: clean(request.position).or(current.position),
            department: clean(request.department).or(current.department),
            company_name: clean(request.company_name).or(current.company_name),
            email: clean(request.email).or(current.email),
            phone: clean(request.phone).or(current.phone),
            address: clean(request.address).or(current.address),
            website: clean(request.website).or(current.website),
        };

        let card = self.repository.update(current.id, fields).await?;
        Ok(ApiResponse::success_with_message(card, "Tarjeta de visita actualizada"))
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        let card = self.find_owned(actor, id).await?;
        self.repository.delete(card.id).await?;

        info!(card_id = %card.id, "🗑️ Tarjeta de visita eliminada");
        Ok(())
    }

    /// Devuelve (nombre de archivo, documento vCard)
    pub async fn vcard(&self, actor: &AuthenticatedUser, id: Uuid) -> AppResult<(String, String)> {
        let card = self.find_owned(actor, id).await?;
        Ok((vcard_filename(&card), render_vcard(&card)))
    }
}

// Cadenas vacías cuentan como campo omitido
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean(Some("  Ventas ".to_string())), Some("Ventas".to_string()));
        assert_eq!(clean(Some("   ".to_string())), None);
        assert_eq!(clean(None), None);
    }
}
