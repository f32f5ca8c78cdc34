// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::{
    auth::CustomerType,
    broadcast::Broadcast,
    project::{DashboardProject, ProjectStatus},
};

// 1. Números que aparecem nos cards do topo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub completion_rate: i64, // Percentual arredondado (0 sem projetos)
}

impl ProjectStats {
    pub fn from_projects(projects: &[DashboardProject]) -> Self {
        let total = projects.len() as i64;
        let completed = projects.iter().filter(|p| p.is_completed).count() as i64;
        let pending = projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Pending)
            .count() as i64;
        Self {
            total,
            completed,
            pending,
            completion_rate: completion_rate(completed, total),
        }
    }
}

pub fn completion_rate(completed: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as i64
}

// 2. Painel do administrador
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub projects: Vec<DashboardProject>,
    pub stats: ProjectStats,
    pub potential_customers: i64,
    #[schema(value_type = f64)]
    pub monthly_sales: Decimal, // Soma dos orçamentos criados no mês corrente
}

// 3. Painel do funcionário
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    pub projects: Vec<DashboardProject>,
    pub stats: ProjectStats,
    pub potential_customer_projects: i64,
}

impl EmployeeDashboard {
    pub fn from_projects(projects: Vec<DashboardProject>) -> Self {
        let stats = ProjectStats::from_projects(&projects);
        let potential_customer_projects = projects
            .iter()
            .filter(|p| p.customer_type == Some(CustomerType::Potential))
            .count() as i64;
        Self { projects, stats, potential_customer_projects }
    }
}

// 4. Painel do cliente
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDashboard {
    pub application_count: i64,
    pub recent_broadcasts: i64, // Publicados nos últimos 7 dias
    pub is_subscribed: bool,
    pub broadcasts: Vec<Broadcast>,
}

#[derive(Debug, FromRow)]
pub struct AdminCounters {
    pub potential_customers: i64,
    pub monthly_sales: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn project(status: ProjectStatus, done: bool, tier: Option<CustomerType>) -> DashboardProject {
        DashboardProject {
            id: Uuid::new_v4(),
            title: "Projeto".into(),
            status,
            is_completed: done,
            deadline: None,
            customer_name: "Cliente".into(),
            customer_type: tier,
        }
    }

    #[test]
    fn completion_rate_is_zero_without_projects() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(ProjectStats::from_projects(&[]).completion_rate, 0);
    }

    #[test]
    fn completion_rate_is_rounded_percent() {
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(3, 3), 100);
    }

    #[test]
    fn stats_count_pending_and_completed() {
        let projects = vec![
            project(ProjectStatus::Pending, false, None),
            project(ProjectStatus::Assigned, true, None),
            project(ProjectStatus::Assigned, false, None),
        ];
        let stats = ProjectStats::from_projects(&projects);
        assert_eq!(
            stats,
            ProjectStats { total: 3, completed: 1, pending: 1, completion_rate: 33 }
        );
    }

    #[test]
    fn employee_dashboard_counts_potential_customers() {
        let dash = EmployeeDashboard::from_projects(vec![
            project(ProjectStatus::Assigned, false, Some(CustomerType::Potential)),
            project(ProjectStatus::Assigned, false, Some(CustomerType::Normal)),
            project(ProjectStatus::Assigned, true, Some(CustomerType::Potential)),
        ]);
        assert_eq!(dash.potential_customer_projects, 2);
        assert_eq!(dash.stats.completed, 1);
    }
}
