// src/services/storage.rs
//
// Armazenamento de imagens enviadas (S3, disco local ou memória) via opendal.

use axum::body::Bytes;
use chrono::Utc;

use crate::common::{error::AppError, form::UploadedFile};

#[derive(Debug, Clone)]
pub enum StorageBackend {
    S3 {
        endpoint: String,
        bucket: String,
        region: String,
        access_key_id: String,
        secret_access_key: String,
    },
    Fs {
        root: String,
    },
    Memory,
}

#[derive(Clone)]
pub struct Storage {
    operator: opendal::Operator,
    public_base_url: String,
}

impl Storage {
    pub fn new(backend: &StorageBackend, public_base_url: &str) -> anyhow::Result<Self> {
        let operator = match backend {
            StorageBackend::S3 {
                endpoint,
                bucket,
                region,
                access_key_id,
                secret_access_key,
            } => {
                let builder = opendal::services::S3::default()
                    .endpoint(endpoint)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .bucket(bucket)
                    .region(region);
                opendal::Operator::new(builder)?.finish()
            }
            StorageBackend::Fs { root } => {
                let builder = opendal::services::Fs::default().root(root);
                opendal::Operator::new(builder)?.finish()
            }
            StorageBackend::Memory => {
                opendal::Operator::new(opendal::services::Memory::default())?.finish()
            }
        };

        tracing::info!("📦 Armazenamento de arquivos pronto ({:?})", operator.info().scheme());

        Ok(Self {
            operator,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Armazenamento em memória (testes e desenvolvimento).
    pub fn memory(public_base_url: &str) -> anyhow::Result<Self> {
        Self::new(&StorageBackend::Memory, public_base_url)
    }

    /// Valida a imagem, grava em `{folder}/{millis}-{nome}` e devolve a URL pública.
    pub async fn upload_image(&self, folder: &str, file: &UploadedFile) -> Result<String, AppError> {
        file.validate_image()?;

        let key = object_key(folder, &file.file_name, Utc::now().timestamp_millis());
        self.operator.write(&key, file.bytes.clone()).await?;

        tracing::info!("🖼️ Imagem enviada: {} ({} bytes)", key, file.bytes.len());
        Ok(self.public_url(&key))
    }

    pub async fn read(&self, key: &str) -> Result<Bytes, AppError> {
        let buffer = self.operator.read(key).await?;
        Ok(buffer.to_bytes())
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

/// Espaços viram `-`; barras não podem escapar da pasta.
pub fn object_key(folder: &str, file_name: &str, millis: i64) -> String {
    let sanitized: String = file_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    let name = if sanitized.is_empty() { "upload".to_string() } else { sanitized };
    format!("{}/{}-{}", folder.trim_matches('/'), millis, name)
}

/// Content-Type a partir da extensão (para servir arquivos do disco/memória).
pub fn content_type_for(key: &str) -> &'static str {
    let ext = key.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str, len: usize) -> UploadedFile {
        UploadedFile {
            file_name: name.into(),
            content_type: "image/png".into(),
            bytes: Bytes::from(vec![1u8; len]),
        }
    }

    #[test]
    fn key_replaces_whitespace_and_keeps_folder() {
        assert_eq!(
            object_key("broadcasts", "my  summer label.png", 42),
            "broadcasts/42-my-summer-label.png"
        );
        assert_eq!(object_key("/uploads/", "a/b.png", 1), "uploads/1-a-b.png");
        assert_eq!(object_key("x", "   ", 1), "x/1-upload");
    }

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type_for("a/1-x.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a/1-x.webp"), "image/webp");
        assert_eq!(content_type_for("a/1-x"), "application/octet-stream");
    }

    #[tokio::test]
    async fn upload_then_read_back_from_memory() {
        let storage = Storage::memory("/uploads/").unwrap();
        let url = storage.upload_image("messages/u1/2025-01-01", &png("chat pic.png", 16)).await.unwrap();
        assert!(url.starts_with("/uploads/messages/u1/2025-01-01/"));
        assert!(url.ends_with("-chat-pic.png"));

        let key = url.trim_start_matches("/uploads/");
        let bytes = storage.read(key).await.unwrap();
        assert_eq!(bytes.len(), 16);
    }

    #[tokio::test]
    async fn upload_rejects_invalid_images_before_writing() {
        let storage = Storage::memory("/uploads").unwrap();
        let mut pdf = png("doc.pdf", 8);
        pdf.content_type = "application/pdf".into();
        assert!(matches!(
            storage.upload_image("x", &pdf).await,
            Err(AppError::UnsupportedImage)
        ));
    }
}
