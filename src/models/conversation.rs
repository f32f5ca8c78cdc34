// src/models/conversation.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::auth::{Role, User};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "sender_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SenderRole {
    Customer,
    Employee,
    System,
}

impl SenderRole {
    pub fn for_user(user: &User) -> Option<Self> {
        match user.role {
            Role::Customer => Some(SenderRole::Customer),
            Role::Employee => Some(SenderRole::Employee),
            Role::Admin => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_role: SenderRole,
    pub content: String,
    pub image_url: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Linha do lote "última mensagem por cliente"
#[derive(Debug, Clone, FromRow)]
pub struct CustomerLatestMessage {
    pub customer_id: Uuid,
    #[sqlx(flatten)]
    pub message: Message,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationWithMessages {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MessagesQuery {
    /// Só mensagens criadas depois deste instante (polling)
    pub after: Option<DateTime<Utc>>,
}

// Texto e imagem não podem faltar ao mesmo tempo
pub fn is_empty_message(content: &str, has_image: bool) -> bool {
    content.trim().is_empty() && !has_image
}

pub fn assignment_notice(project_title: &str, employee_name: &str) -> String {
    format!(
        "{} has been assigned to your project \"{}\" and will contact you here.",
        employee_name, project_title
    )
}

/// Quem participa de uma conversa: o próprio cliente (se POTENTIAL) ou um
/// funcionário com ao menos um projeto desse cliente.
pub fn may_participate(user: &User, conversation: &Conversation, serves_customer: bool) -> bool {
    match user.role {
        Role::Customer => conversation.customer_id == user.id && user.is_potential_customer(),
        Role::Employee => serves_customer,
        Role::Admin => false,
    }
}

#[allow(dead_code)]
#[derive(ToSchema)]
pub struct MessageForm {
    pub content: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::{fixtures::user, CustomerType};

    #[test]
    fn empty_text_requires_an_image() {
        assert!(is_empty_message("   ", false));
        assert!(!is_empty_message("", true));
        assert!(!is_empty_message("Olá", false));
    }

    #[test]
    fn admins_do_not_post_in_threads() {
        assert_eq!(SenderRole::for_user(&user(Role::Admin, None)), None);
        assert_eq!(
            SenderRole::for_user(&user(Role::Customer, Some(CustomerType::Potential))),
            Some(SenderRole::Customer)
        );
        assert_eq!(SenderRole::for_user(&user(Role::Employee, None)), Some(SenderRole::Employee));
    }

    #[test]
    fn only_potential_owner_or_serving_employee_participates() {
        let owner = user(Role::Customer, Some(CustomerType::Potential));
        let conversation = Conversation {
            id: uuid::Uuid::new_v4(),
            customer_id: owner.id,
            created_at: chrono::Utc::now(),
        };
        assert!(may_participate(&owner, &conversation, false));

        let mut demoted = owner.clone();
        demoted.customer_type = Some(CustomerType::Normal);
        assert!(!may_participate(&demoted, &conversation, false));

        let stranger = user(Role::Customer, Some(CustomerType::Potential));
        assert!(!may_participate(&stranger, &conversation, true));

        let employee = user(Role::Employee, None);
        assert!(may_participate(&employee, &conversation, true));
        assert!(!may_participate(&employee, &conversation, false));
        assert!(!may_participate(&user(Role::Admin, None), &conversation, true));
    }

    #[test]
    fn assignment_notice_mentions_employee_and_project() {
        let text = assignment_notice("Rótulos de cerveja", "Ana");
        assert!(text.contains("Ana"));
        assert!(text.contains("Rótulos de cerveja"));
    }
}
