// src/models/staff.rs

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    auth::User,
    conversation::{ConversationWithMessages, CustomerLatestMessage, Message},
    project::ProjectWithQuotes,
};

// Um cliente na lista "meus clientes" do funcionário
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffClient {
    pub client: User,
    pub projects: Vec<ProjectWithQuotes>,
    pub latest_message: Option<Message>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffClientDetail {
    pub client: User,
    pub projects: Vec<ProjectWithQuotes>,
    pub conversation: Option<ConversationWithMessages>,
}

/// Monta a lista a partir das consultas em lote, mantendo a ordem dos clientes.
pub fn group_staff_clients(
    clients: Vec<User>,
    projects: Vec<ProjectWithQuotes>,
    latest: Vec<CustomerLatestMessage>,
) -> Vec<StaffClient> {
    let mut by_customer: HashMap<Uuid, Vec<ProjectWithQuotes>> = HashMap::new();
    for project in projects {
        by_customer.entry(project.project.customer_id).or_default().push(project);
    }
    let mut messages: HashMap<Uuid, Message> = latest
        .into_iter()
        .map(|row| (row.customer_id, row.message))
        .collect();

    clients
        .into_iter()
        .map(|client| StaffClient {
            projects: by_customer.remove(&client.id).unwrap_or_default(),
            latest_message: messages.remove(&client.id),
            client,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        auth::{fixtures::user, CustomerType, Role},
        conversation::SenderRole,
        project::{Project, ProjectStatus},
    };
    use chrono::Utc;

    fn project_of(customer_id: Uuid) -> ProjectWithQuotes {
        ProjectWithQuotes {
            project: Project {
                id: Uuid::new_v4(),
                title: "Rótulos".into(),
                description: None,
                status: ProjectStatus::Assigned,
                customer_id,
                assigned_employee_id: Some(Uuid::new_v4()),
                deadline: None,
                is_completed: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            quotes: Vec::new(),
        }
    }

    #[test]
    fn batches_are_split_back_per_client() {
        let a = user(Role::Customer, Some(CustomerType::Potential));
        let b = user(Role::Customer, Some(CustomerType::Potential));
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id: Uuid::new_v4(),
            sender_role: SenderRole::System,
            content: "olá".into(),
            image_url: None,
            user_id: None,
            created_at: Utc::now(),
        };

        let grouped = group_staff_clients(
            vec![a.clone(), b.clone()],
            vec![project_of(a.id), project_of(b.id), project_of(a.id)],
            vec![CustomerLatestMessage { customer_id: b.id, message }],
        );

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].client.id, a.id);
        assert_eq!(grouped[0].projects.len(), 2);
        assert!(grouped[0].latest_message.is_none());
        assert_eq!(grouped[1].projects.len(), 1);
        assert_eq!(grouped[1].latest_message.as_ref().map(|m| m.content.as_str()), Some("olá"));
    }
}
