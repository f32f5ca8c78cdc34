// src/db/conversation_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::conversation::{Conversation, CustomerLatestMessage, Message, SenderRole},
};

const MESSAGE_COLUMNS: &str =
    "id, conversation_id, sender_role, content, image_url, user_id, created_at";

#[derive(Clone)]
pub struct ConversationRepository {
    pool: PgPool,
}

impl ConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A conversa do cliente (no máximo uma, garantida pelo UNIQUE).
    pub async fn find_by_customer<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<Option<Conversation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, customer_id, created_at FROM conversations
            WHERE customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(executor)
        .await?;
        Ok(conversation)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Conversation>, AppError> {
        let conversation = sqlx::query_as::<_, Conversation>(
            "SELECT id, customer_id, created_at FROM conversations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(conversation)
    }

    pub async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<Conversation>, AppError> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, customer_id, created_at FROM conversations
            WHERE customer_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(conversations)
    }

    /// Uma conversa por cliente. Devolve None se ela já existia.
    pub async fn create_if_absent<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<Option<Conversation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (customer_id) VALUES ($1)
            ON CONFLICT (customer_id) DO NOTHING
            RETURNING id, customer_id, created_at
            "#,
        )
        .bind(customer_id)
        .fetch_optional(executor)
        .await?;
        Ok(conversation)
    }

    pub async fn add_message<'e, E>(
        &self,
        executor: E,
        conversation_id: Uuid,
        sender_role: SenderRole,
        content: &str,
        image_url: Option<&str>,
        user_id: Option<Uuid>,
    ) -> Result<Message, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let message = sqlx::query_as::<_, Message>(&format!(
            r#"
            INSERT INTO messages (conversation_id, sender_role, content, image_url, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(conversation_id)
        .bind(sender_role)
        .bind(content)
        .bind(image_url)
        .bind(user_id)
        .fetch_one(executor)
        .await?;
        Ok(message)
    }

    /// Mensagens em ordem crescente; `after` filtra as novas (polling).
    pub async fn list_messages(
        &self,
        conversation_id: Uuid,
        after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Message>, AppError> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE conversation_id = $1
              AND ($2::timestamptz IS NULL OR created_at > $2)
            ORDER BY created_at ASC
            "#
        ))
        .bind(conversation_id)
        .bind(after)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    /// Última mensagem de cada cliente da lista, numa consulta só.
    pub async fn latest_messages_for_customers(
        &self,
        customer_ids: &[Uuid],
    ) -> Result<Vec<CustomerLatestMessage>, AppError> {
        if customer_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, CustomerLatestMessage>(
            r#"
            SELECT DISTINCT ON (c.customer_id)
                   c.customer_id, m.id, m.conversation_id, m.sender_role, m.content,
                   m.image_url, m.user_id, m.created_at
            FROM conversations c
            JOIN messages m ON m.conversation_id = c.id
            WHERE c.customer_id = ANY($1)
            ORDER BY c.customer_id, m.created_at DESC
            "#,
        )
        .bind(customer_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
