// src/services/product_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{product_repo::NewProduct, ProductRepository},
    models::product::{
        sanitize_ref_id, CreateProductPayload, Product, ProductImageRow, ProductRow,
        UpdateProductPayload,
    },
};

fn with_images(rows: Vec<ProductRow>, images: Vec<ProductImageRow>) -> Vec<Product> {
    let mut by_product: HashMap<Uuid, Vec<String>> = HashMap::new();
    for image in images {
        by_product.entry(image.product_id).or_default().push(image.url);
    }
    rows.into_iter()
        .map(|row| {
            let urls = by_product.remove(&row.id).unwrap_or_default();
            Product::from_row(row, urls)
        })
        .collect()
}

#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
    pool: PgPool,
}

impl ProductService {
    pub fn new(repo: ProductRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    /// Vitrine pública: só produtos não arquivados.
    pub async fn list_public(&self, featured_only: bool) -> Result<Vec<Product>, AppError> {
        self.list(false, featured_only).await
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, AppError> {
        self.list(true, false).await
    }

    async fn list(&self, include_archived: bool, featured_only: bool) -> Result<Vec<Product>, AppError> {
        let rows = self.repo.list(include_archived, featured_only).await?;
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let images = self.repo.images_for(&ids).await?;
        Ok(with_images(rows, images))
    }

    /// Produto visível ao público (arquivado conta como inexistente).
    pub async fn get_public(&self, id: Uuid) -> Result<Product, AppError> {
        let product = self.get(id).await?;
        if product.is_archived {
            return Err(AppError::ProductNotFound);
        }
        Ok(product)
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, AppError> {
        let row = self.repo.find_by_id(id).await?.ok_or(AppError::ProductNotFound)?;
        let images = self.repo.images_for(&[id]).await?;
        with_images(vec![row], images)
            .pop()
            .ok_or(AppError::ProductNotFound)
    }

    /// Produto e imagens na mesma transação.
    pub async fn create(&self, payload: &CreateProductPayload) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = self
            .repo
            .create(
                &mut *tx,
                &NewProduct {
                    name: payload.name.trim(),
                    description: payload.description.as_deref(),
                    price: payload.price,
                    category_id: sanitize_ref_id(payload.category_id.as_deref()),
                    color_id: sanitize_ref_id(payload.color_id.as_deref()),
                    size_id: sanitize_ref_id(payload.size_id.as_deref()),
                    is_featured: payload.is_featured,
                    is_archived: payload.is_archived,
                },
            )
            .await?;

        let mut urls = Vec::new();
        for url in payload.images.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
            self.repo.add_image(&mut *tx, row.id, url).await?;
            urls.push(url.to_string());
        }

        tx.commit().await?;

        tracing::info!("🏷️ Produto criado: {} ({} imagens)", row.id, urls.len());
        Ok(Product::from_row(row, urls))
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateProductPayload) -> Result<Product, AppError> {
        self.repo
            .update(id, payload.name.trim(), payload.description.as_deref(), payload.price)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn row(id: Uuid) -> ProductRow {
        let now = Utc::now();
        ProductRow {
            id,
            name: "Rolo".into(),
            description: None,
            price: Decimal::new(1990, 2),
            category_id: None,
            color_id: None,
            size_id: None,
            is_featured: false,
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn images_follow_their_product() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let products = with_images(
            vec![row(a), row(b)],
            vec![
                ProductImageRow { product_id: b, url: "/uploads/b1.png".into() },
                ProductImageRow { product_id: b, url: "/uploads/b2.png".into() },
            ],
        );
        assert!(products[0].images.is_empty());
        assert_eq!(products[1].images, vec!["/uploads/b1.png", "/uploads/b2.png"]);
    }
}
