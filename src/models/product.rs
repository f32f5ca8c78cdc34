// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Ids que o formulário antigo envia quando nada foi escolhido
const PLACEHOLDER_IDS: &[&str] = &["", "null", "null_value", "undefined", "cat1", "col1", "sz1"];

/// Converte ids de categoria/cor/tamanho de placeholder em NULL.
pub fn sanitize_ref_id(id: Option<&str>) -> Option<String> {
    id.map(str::trim)
        .filter(|v| !PLACEHOLDER_IDS.contains(&v.to_ascii_lowercase().as_str()))
        .map(str::to_string)
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Option<String>,
    pub color_id: Option<String>,
    pub size_id: Option<String>,
    pub is_featured: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = f64, example = 99.90)]
    pub price: Decimal,
    pub category_id: Option<String>,
    pub color_id: Option<String>,
    pub size_id: Option<String>,
    pub is_featured: bool,
    pub is_archived: bool,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn from_row(row: ProductRow, images: Vec<String>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category_id: row.category_id,
            color_id: row.color_id,
            size_id: row.size_id,
            is_featured: row.is_featured,
            is_archived: row.is_archived,
            images,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductImageRow {
    pub product_id: Uuid,
    pub url: String,
}

fn validate_non_negative(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("range").with_message("price_negative".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub category_id: Option<String>,
    pub color_id: Option<String>,
    pub size_id: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = f64)]
    pub price: Decimal,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Só destaques
    pub featured: Option<bool>,
}

// Pedido do cliente a partir de um produto do catálogo
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ApplyProductPayload {
    #[validate(length(min = 1, message = "title_required"))]
    pub title: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn placeholder_ids_become_null() {
        for raw in ["", "null", "NULL", "null_value", "cat1", "col1", "sz1", "  "] {
            assert_eq!(sanitize_ref_id(Some(raw)), None, "{raw:?}");
        }
        assert_eq!(sanitize_ref_id(None), None);
        assert_eq!(sanitize_ref_id(Some(" cat-rolls ")).as_deref(), Some("cat-rolls"));
    }

    #[test]
    fn price_may_be_zero_but_not_negative() {
        let mut payload = CreateProductPayload {
            name: "Etiqueta térmica".into(),
            description: None,
            price: Decimal::ZERO,
            category_id: None,
            color_id: None,
            size_id: None,
            is_featured: false,
            is_archived: false,
            images: vec![],
        };
        assert!(payload.validate().is_ok());

        payload.price = Decimal::new(-1, 2);
        assert!(payload.validate().is_err());
    }
}
