// src/services/messaging_service.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, form::UploadedFile},
    db::{ConversationRepository, ProjectRepository},
    models::{
        auth::User,
        conversation::{
            is_empty_message, may_participate, Conversation, ConversationWithMessages, Message,
            SenderRole,
        },
    },
    services::storage::Storage,
};

pub fn message_image_folder(sender_id: Uuid, at: DateTime<Utc>) -> String {
    format!("messages/{}/{}", sender_id, at.format("%Y-%m-%d"))
}

#[derive(Clone)]
pub struct MessagingService {
    conversation_repo: ConversationRepository,
    project_repo: ProjectRepository,
    storage: Storage,
    pool: PgPool,
}

impl MessagingService {
    pub fn new(
        conversation_repo: ConversationRepository,
        project_repo: ProjectRepository,
        storage: Storage,
        pool: PgPool,
    ) -> Self {
        Self { conversation_repo, project_repo, storage, pool }
    }

    // Carrega a conversa e confere se o usuário participa dela
    async fn authorize(&self, user: &User, conversation_id: Uuid) -> Result<Conversation, AppError> {
        let conversation = self
            .conversation_repo
            .find_by_id(conversation_id)
            .await?
            .ok_or(AppError::ConversationNotFound)?;

        let serves_customer = user.is_employee()
            && self
                .project_repo
                .employee_serves_customer(user.id, conversation.customer_id)
                .await?;

        if !may_participate(user, &conversation, serves_customer) {
            return Err(AppError::Forbidden);
        }
        Ok(conversation)
    }

    pub async fn send(
        &self,
        user: &User,
        conversation_id: Uuid,
        content: &str,
        image: Option<&UploadedFile>,
    ) -> Result<Message, AppError> {
        let conversation = self.authorize(user, conversation_id).await?;
        let sender_role = SenderRole::for_user(user).ok_or(AppError::Forbidden)?;

        if is_empty_message(content, image.is_some()) {
            return Err(AppError::EmptyMessage);
        }

        let image_url = match image {
            Some(file) => Some(
                self.storage
                    .upload_image(&message_image_folder(user.id, Utc::now()), file)
                    .await?,
            ),
            None => None,
        };

        let message = self
            .conversation_repo
            .add_message(
                &self.pool,
                conversation.id,
                sender_role,
                content.trim(),
                image_url.as_deref(),
                Some(user.id),
            )
            .await?;
        tracing::debug!("💬 Mensagem {} na conversa {}", message.id, conversation.id);
        Ok(message)
    }

    /// Polling: com `after`, só as mensagens mais novas.
    pub async fn list_messages(
        &self,
        user: &User,
        conversation_id: Uuid,
        after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Message>, AppError> {
        let conversation = self.authorize(user, conversation_id).await?;
        self.conversation_repo.list_messages(conversation.id, after).await
    }

    /// Conversas do próprio cliente (POTENTIAL), mensagens em ordem crescente.
    pub async fn my_conversations(&self, customer: &User) -> Result<Vec<ConversationWithMessages>, AppError> {
        if !customer.is_potential_customer() {
            return Err(AppError::Forbidden);
        }

        let conversations = self.conversation_repo.list_by_customer(customer.id).await?;
        let mut result = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let messages = self.conversation_repo.list_messages(conversation.id, None).await?;
            result.push(ConversationWithMessages { conversation, messages });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::{fixtures::user, CustomerType, Role};
    use chrono::TimeZone;
    use sqlx::postgres::PgPoolOptions;

    #[test]
    fn image_folder_is_per_sender_and_day() {
        let sender = Uuid::nil();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 23, 59, 0).unwrap();
        assert_eq!(
            message_image_folder(sender, at),
            "messages/00000000-0000-0000-0000-000000000000/2025-06-01"
        );
    }

    #[tokio::test]
    async fn normal_customers_have_no_thread_access() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let service = MessagingService::new(
            ConversationRepository::new(pool.clone()),
            ProjectRepository::new(pool.clone()),
            Storage::memory("/uploads").unwrap(),
            pool,
        );
        let customer = user(Role::Customer, Some(CustomerType::Normal));
        assert!(matches!(
            service.my_conversations(&customer).await,
            Err(AppError::Forbidden)
        ));
    }
}
