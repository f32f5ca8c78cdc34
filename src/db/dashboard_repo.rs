// src/db/dashboard_repo.rs

use sqlx::{Acquire, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{dashboard::AdminCounters, project::DashboardProject},
};

const DASHBOARD_PROJECT_SELECT: &str = r#"
    SELECT p.id, p.title, p.status, p.is_completed, p.deadline,
           c.name AS customer_name, c.customer_type
    FROM projects p
    JOIN users c ON c.id = p.customer_id
"#;

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Painel do admin: projetos + contadores na mesma fotografia dos dados
    pub async fn admin_snapshot<'e, E>(
        &self,
        executor: E,
    ) -> Result<(Vec<DashboardProject>, AdminCounters), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let projects = sqlx::query_as::<_, DashboardProject>(&format!(
            "{DASHBOARD_PROJECT_SELECT} ORDER BY p.created_at DESC"
        ))
        .fetch_all(&mut *tx)
        .await?;

        // Soma dos orçamentos do mês corrente e clientes POTENTIAL
        let counters = sqlx::query_as::<_, AdminCounters>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users
                 WHERE role = 'CUSTOMER' AND customer_type = 'POTENTIAL') AS potential_customers,
                (SELECT COALESCE(SUM(amount), 0) FROM quotes
                 WHERE date_trunc('month', created_at) = date_trunc('month', NOW())) AS monthly_sales
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((projects, counters))
    }

    // 2. Painel do funcionário
    pub async fn employee_projects(&self, employee_id: Uuid) -> Result<Vec<DashboardProject>, AppError> {
        let projects = sqlx::query_as::<_, DashboardProject>(&format!(
            "{DASHBOARD_PROJECT_SELECT} WHERE p.assigned_employee_id = $1 \
             ORDER BY p.deadline ASC NULLS LAST, p.created_at DESC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    // 3. Painel do cliente
    pub async fn customer_application_count(&self, customer_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE customer_id = $1")
            .bind(customer_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
