// src/db/customer_repo.rs

use uuid::Uuid;
use sqlx::PgPool;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::customer::{
        ContactPayload, CustomerContact, CustomerFilter, CustomerRow, CustomerTagRow, Tag,
    },
};

const CONTACT_COLUMNS: &str = "id, customer_id, name, company, email, address, contact_person, \
     phone, extra_info, created_at, updated_at";

// Clientes, cartões de contato e etiquetas
#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LISTAGEM
    // =========================================================================

    pub async fn list_customers(&self, filter: &CustomerFilter) -> Result<Vec<CustomerRow>, AppError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT u.id, u.name, u.email, u.phone, u.customer_type, u.is_subscribed,
                   u.created_at,
                   (SELECT COUNT(*) FROM projects p WHERE p.customer_id = u.id) AS project_count
            FROM users u
            WHERE u.role = 'CUSTOMER'
              AND ($1::customer_type IS NULL OR u.customer_type = $1)
              AND ($2::uuid IS NULL OR EXISTS (
                    SELECT 1 FROM customer_tags ct
                    WHERE ct.customer_id = u.id AND ct.tag_id = $2))
              AND ($3::text IS NULL
                   OR u.name ILIKE $3 OR u.email ILIKE $3 OR u.phone ILIKE $3)
            ORDER BY u.created_at DESC
            "#,
        )
        .bind(filter.customer_type)
        .bind(filter.tag_id)
        .bind(filter.search_pattern())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn tags_for_customers(&self, customer_ids: &[Uuid]) -> Result<Vec<CustomerTagRow>, AppError> {
        if customer_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, CustomerTagRow>(
            r#"
            SELECT ct.customer_id, t.id, t.name, t.color, t.created_at
            FROM customer_tags ct
            JOIN tags t ON t.id = ct.tag_id
            WHERE ct.customer_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(customer_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // =========================================================================
    //  CARTÃO DE CONTATO
    // =========================================================================

    pub async fn find_contact(&self, customer_id: Uuid) -> Result<Option<CustomerContact>, AppError> {
        let contact = sqlx::query_as::<_, CustomerContact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM customer_contacts WHERE customer_id = $1"
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(contact)
    }

    /// Um cartão por cliente: cria ou substitui.
    pub async fn upsert_contact(
        &self,
        customer_id: Uuid,
        contact: &ContactPayload,
    ) -> Result<CustomerContact, AppError> {
        let saved = sqlx::query_as::<_, CustomerContact>(&format!(
            r#"
            INSERT INTO customer_contacts (
                customer_id, name, company, email, address, contact_person, phone, extra_info
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (customer_id) DO UPDATE
                SET name = EXCLUDED.name,
                    company = EXCLUDED.company,
                    email = EXCLUDED.email,
                    address = EXCLUDED.address,
                    contact_person = EXCLUDED.contact_person,
                    phone = EXCLUDED.phone,
                    extra_info = EXCLUDED.extra_info,
                    updated_at = NOW()
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(&contact.name)
        .bind(&contact.company)
        .bind(&contact.email)
        .bind(&contact.address)
        .bind(&contact.contact_person)
        .bind(&contact.phone)
        .bind(&contact.extra_info)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    pub async fn delete_contact(&self, customer_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM customer_contacts WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  ETIQUETAS
    // =========================================================================

    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name, color, created_at FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    pub async fn tags_of(&self, customer_id: Uuid) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.color, t.created_at
            FROM customer_tags ct JOIN tags t ON t.id = ct.tag_id
            WHERE ct.customer_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    pub async fn create_tag(&self, name: &str, color: Option<&str>) -> Result<Tag, AppError> {
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, color) VALUES ($1, $2) RETURNING id, name, color, created_at",
        )
        .bind(name)
        .bind(color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, AppError::UniqueConstraintViolation(format!("A etiqueta '{}' já existe.", name)))
        })?;
        Ok(tag)
    }

    pub async fn update_tag(&self, id: Uuid, name: &str, color: Option<&str>) -> Result<Option<Tag>, AppError> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags SET name = $2, color = $3 WHERE id = $1
            RETURNING id, name, color, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(color)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, AppError::UniqueConstraintViolation(format!("A etiqueta '{}' já existe.", name)))
        })?;
        Ok(tag)
    }

    pub async fn delete_tag(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn tag_exists(&self, id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tags WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Vincular duas vezes não duplica nada.
    pub async fn add_tag_to_customer(&self, customer_id: Uuid, tag_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO customer_tags (customer_id, tag_id) VALUES ($1, $2)
            ON CONFLICT (customer_id, tag_id) DO NOTHING
            "#,
        )
        .bind(customer_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove_tag_from_customer(&self, customer_id: Uuid, tag_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM customer_tags WHERE customer_id = $1 AND tag_id = $2")
            .bind(customer_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
