// src/common/form.rs
//
// Leitura de formulários multipart (texto + uma imagem opcional).

use std::collections::HashMap;

use axum::{body::Bytes, extract::Multipart};

use crate::common::error::AppError;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Regras de imagem: não vazia, até 5MB, JPG/PNG/GIF/WebP.
    pub fn validate_image(&self) -> Result<(), AppError> {
        if self.bytes.is_empty() {
            return Err(AppError::UnsupportedImage);
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::ImageTooLarge);
        }
        if !ALLOWED_IMAGE_TYPES.contains(&self.content_type.as_str()) {
            return Err(AppError::UnsupportedImage);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FormFields {
    fields: HashMap<String, String>,
    pub image: Option<UploadedFile>,
}

impl FormFields {
    /// Consome o multipart. O arquivo do campo `image` vira `image`; campos de
    /// arquivo vazios (navegador sem seleção) são ignorados.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = FormFields::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadMultipart(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadMultipart(e.to_string()))?;

                if !bytes.is_empty() {
                    form.image = Some(UploadedFile { file_name, content_type, bytes });
                }
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadMultipart(e.to_string()))?;
            form.fields.insert(name, value);
        }

        Ok(form)
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    /// Texto do campo; string vazia ou só espaços conta como ausente.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Texto obrigatório, sem trim (o conteúdo é do usuário).
    pub fn raw(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content_type: &str, len: usize) -> UploadedFile {
        UploadedFile {
            file_name: "logo.png".into(),
            content_type: content_type.into(),
            bytes: Bytes::from(vec![0u8; len]),
        }
    }

    #[test]
    fn accepts_supported_images_up_to_the_limit() {
        assert!(file("image/png", 10).validate_image().is_ok());
        assert!(file("image/webp", MAX_IMAGE_BYTES).validate_image().is_ok());
    }

    #[test]
    fn rejects_oversized_images() {
        let err = file("image/jpeg", MAX_IMAGE_BYTES + 1).validate_image().unwrap_err();
        assert!(matches!(err, AppError::ImageTooLarge));
    }

    #[test]
    fn rejects_other_content_types() {
        let err = file("application/pdf", 10).validate_image().unwrap_err();
        assert!(matches!(err, AppError::UnsupportedImage));
    }

    #[test]
    fn rejects_empty_files() {
        assert!(matches!(file("image/png", 0).validate_image(), Err(AppError::UnsupportedImage)));
    }

    #[test]
    fn blank_text_fields_count_as_missing() {
        let form = FormFields::from_pairs(&[("videoUrl", "   "), ("title", " Promo ")]);
        assert_eq!(form.text("videoUrl"), None);
        assert_eq!(form.text("title").as_deref(), Some("Promo"));
        assert_eq!(form.text("missing"), None);
    }
}
