// src/services/dashboard_service.rs

use chrono::{Duration, Utc};
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{BroadcastRepository, DashboardRepository},
    models::{
        auth::User,
        dashboard::{AdminDashboard, CustomerDashboard, EmployeeDashboard, ProjectStats},
    },
};

const RECENT_BROADCAST_DAYS: i64 = 7;

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    broadcast_repo: BroadcastRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, broadcast_repo: BroadcastRepository) -> Self {
        Self { repo, broadcast_repo }
    }

    pub async fn admin<'e, E>(&self, executor: E) -> Result<AdminDashboard, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let (projects, counters) = self.repo.admin_snapshot(executor).await?;
        let stats = ProjectStats::from_projects(&projects);
        Ok(AdminDashboard {
            projects,
            stats,
            potential_customers: counters.potential_customers,
            monthly_sales: counters.monthly_sales,
        })
    }

    pub async fn employee(&self, employee: &User) -> Result<EmployeeDashboard, AppError> {
        let projects = self.repo.employee_projects(employee.id).await?;
        Ok(EmployeeDashboard::from_projects(projects))
    }

    /// Os anúncios só aparecem para quem assina; a contagem dos recentes, sempre.
    pub async fn customer(&self, customer: &User) -> Result<CustomerDashboard, AppError> {
        let now = Utc::now();
        let application_count = self.repo.customer_application_count(customer.id).await?;
        let recent_broadcasts = self
            .broadcast_repo
            .count_published_since(now - Duration::days(RECENT_BROADCAST_DAYS), now)
            .await?;
        let broadcasts = if customer.is_subscribed {
            self.broadcast_repo.list_published(now).await?
        } else {
            Vec::new()
        };

        Ok(CustomerDashboard {
            application_count,
            recent_broadcasts,
            is_subscribed: customer.is_subscribed,
            broadcasts,
        })
    }
}
