// src/services/broadcast_service.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, form::UploadedFile},
    db::{broadcast_repo::BroadcastRecord, BroadcastRepository, UserRepository},
    models::{
        auth::User,
        broadcast::{Broadcast, BroadcastInput, SubscriptionState},
    },
    services::storage::Storage,
};

const IMAGE_FOLDER: &str = "broadcasts";

#[derive(Clone)]
pub struct BroadcastService {
    broadcast_repo: BroadcastRepository,
    user_repo: UserRepository,
    storage: Storage,
}

impl BroadcastService {
    pub fn new(broadcast_repo: BroadcastRepository, user_repo: UserRepository, storage: Storage) -> Self {
        Self { broadcast_repo, user_repo, storage }
    }

    async fn store_image(&self, image: Option<&UploadedFile>) -> Result<Option<String>, AppError> {
        match image {
            Some(file) => Ok(Some(self.storage.upload_image(IMAGE_FOLDER, file).await?)),
            None => Ok(None),
        }
    }

    pub async fn create(
        &self,
        author: &User,
        input: &BroadcastInput,
        image: Option<&UploadedFile>,
    ) -> Result<Broadcast, AppError> {
        input.validate()?;
        let scheduled_at = input.parse_schedule(Utc::now())?;
        let image_url = self.store_image(image).await?;

        let broadcast = self
            .broadcast_repo
            .create(
                author.id,
                &BroadcastRecord {
                    title: input.title.trim(),
                    content: &input.content,
                    image_url: image_url.as_deref(),
                    video_url: input.video_url.as_deref(),
                    scheduled_at,
                },
            )
            .await?;

        match broadcast.scheduled_at {
            Some(at) => tracing::info!("📣 Anúncio {} agendado para {}", broadcast.id, at),
            None => tracing::info!("📣 Anúncio {} publicado", broadcast.id),
        }
        Ok(broadcast)
    }

    /// Sem imagem nova, a imagem anterior é mantida.
    pub async fn update(
        &self,
        id: Uuid,
        input: &BroadcastInput,
        image: Option<&UploadedFile>,
    ) -> Result<Broadcast, AppError> {
        input.validate()?;
        let scheduled_at = input.parse_schedule(Utc::now())?;

        let existing = self
            .broadcast_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::BroadcastNotFound)?;

        let image_url = match self.store_image(image).await? {
            Some(url) => Some(url),
            None => existing.image_url,
        };

        self.broadcast_repo
            .update(
                id,
                &BroadcastRecord {
                    title: input.title.trim(),
                    content: &input.content,
                    image_url: image_url.as_deref(),
                    video_url: input.video_url.as_deref(),
                    scheduled_at,
                },
            )
            .await?
            .ok_or(AppError::BroadcastNotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.broadcast_repo.delete(id).await? {
            return Err(AppError::BroadcastNotFound);
        }
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<Broadcast>, AppError> {
        self.broadcast_repo.list_all().await
    }

    pub async fn toggle_subscription(&self, user: &User) -> Result<SubscriptionState, AppError> {
        let is_subscribed = self
            .user_repo
            .toggle_subscription(user.id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        tracing::info!("🔔 Usuário {} assinatura = {}", user.id, is_subscribed);
        Ok(SubscriptionState { is_subscribed })
    }

    /// Anúncios publicados, só para quem assina.
    pub async fn visible_for(&self, user: &User) -> Result<Vec<Broadcast>, AppError> {
        if !user.is_subscribed {
            return Ok(Vec::new());
        }
        self.broadcast_repo.list_published(Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::form::FormFields,
        models::auth::{fixtures::user, CustomerType, Role},
    };
    use sqlx::postgres::PgPoolOptions;

    fn service() -> BroadcastService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        BroadcastService::new(
            BroadcastRepository::new(pool.clone()),
            UserRepository::new(pool),
            Storage::memory("/uploads").unwrap(),
        )
    }

    #[tokio::test]
    async fn unsubscribed_customers_see_nothing() {
        let mut customer = user(Role::Customer, Some(CustomerType::Normal));
        customer.is_subscribed = false;
        assert!(service().visible_for(&customer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn past_schedule_is_rejected_before_any_write() {
        let admin = user(Role::Admin, None);
        let input = BroadcastInput::from_form(&FormFields::from_pairs(&[
            ("title", "Promo"),
            ("content", "Etiquetas com desconto"),
            ("scheduledAt", "2000-01-01T10:00"),
        ]));
        let err = service().create(&admin, &input, None).await.unwrap_err();
        assert!(matches!(err, AppError::FormError(_)));
    }
}
