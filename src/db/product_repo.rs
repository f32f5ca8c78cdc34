// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{ProductImageRow, ProductRow},
};

const PRODUCT_COLUMNS: &str = "id, name, description, price, category_id, color_id, size_id, \
     is_featured, is_archived, created_at, updated_at";

pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub category_id: Option<String>,
    pub color_id: Option<String>,
    pub size_id: Option<String>,
    pub is_featured: bool,
    pub is_archived: bool,
}

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Catálogo. `include_archived` só para o admin.
    pub async fn list(&self, include_archived: bool, featured_only: bool) -> Result<Vec<ProductRow>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE ($1 OR NOT is_archived)
              AND (NOT $2 OR is_featured)
            ORDER BY created_at DESC
            "#
        ))
        .bind(include_archived)
        .bind(featured_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductRow>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn images_for(&self, product_ids: &[Uuid]) -> Result<Vec<ProductImageRow>, AppError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, ProductImageRow>(
            r#"
            SELECT product_id, url FROM product_images
            WHERE product_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create<'e, E>(&self, executor: E, product: &NewProduct<'_>) -> Result<ProductRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (
                name, description, price, category_id, color_id, size_id, is_featured, is_archived
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.category_id.as_deref())
        .bind(product.color_id.as_deref())
        .bind(product.size_id.as_deref())
        .bind(product.is_featured)
        .bind(product.is_archived)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn add_image<'e, E>(&self, executor: E, product_id: Uuid, url: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO product_images (product_id, url) VALUES ($1, $2)")
            .bind(product_id)
            .bind(url)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        price: Decimal,
    ) -> Result<Option<ProductRow>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products SET name = $2, description = $3, price = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
