use sqlx::PgPool;
use uuid::Uuid;

use crate::models::business_card::BusinessCard;
use crate::utils::errors::AppResult;

/// Campos finales de una tarjeta (ya combinados con el perfil)
#[derive(Debug, Clone, Default)]
pub struct BusinessCardFields {
    pub full_name: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
}

pub struct BusinessCardRepository {
    pool: PgPool,
}

impl BusinessCardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, fields: BusinessCardFields) -> AppResult<BusinessCard> {
        let card = sqlx::query_as::<_, BusinessCard>(
            r#"
            INSERT INTO business_cards (id, user_id, full_name, position, department, company_name,
                                        email, phone, address, website)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(fields.full_name)
        .bind(fields.position)
        .bind(fields.department)
        .bind(fields.company_name)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(fields.address)
        .bind(fields.website)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BusinessCard>> {
        let card = sqlx::query_as::<_, BusinessCard>("SELECT * FROM business_cards WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(card)
    }

    /// Tarjetas de un usuario, o de todos si `user_id` es None
    pub async fn list(&self, user_id: Option<Uuid>) -> AppResult<Vec<BusinessCard>> {
        let cards = sqlx::query_as::<_, BusinessCard>(
            r#"
            SELECT * FROM business_cards
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    pub async fn update(&self, id: Uuid, fields: BusinessCardFields) -> AppResult<BusinessCard> {
        let card = sqlx::query_as::<_, BusinessCard>(
            r#"
            UPDATE business_cards
            SET full_name = $2, position = $3, department = $4, company_name = $5,
                email = $6, phone = $7, address = $8, website = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.full_name)
        .bind(fields.position)
        .bind(fields.department)
        .bind(fields.company_name)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(fields.address)
        .bind(fields.website)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM business_cards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
