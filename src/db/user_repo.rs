// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{CustomerType, NewUser, Role, User},
        employee::EmployeeSummary,
    },
};

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, image, role, customer_type, \
     is_subscribed, created_at, updated_at";

// Traduz violações de unicidade da tabela users
fn map_user_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    // Nomes padrão que o Postgres cria para UNIQUE nas colunas
                    "users_email_key" => AppError::EmailAlreadyExists,
                    "users_phone_key" => AppError::PhoneAlreadyExists,
                    _ => AppError::UniqueConstraintViolation(constraint.to_string()),
                };
            }
        }
    }
    e.into()
}

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_phone<'e, E>(&self, executor: E, phone: &str) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE phone = $1"))
                .bind(phone)
                .fetch_optional(executor)
                .await?;
        Ok(maybe_user)
    }

    /// Busca por id exigindo um papel (clientes e funcionários nas telas de admin).
    pub async fn find_with_role(&self, id: Uuid, role: Role) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND role = $2"
        ))
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário no banco de dados
    // Com tratamento de erro específico para e-mail/telefone duplicados.
    pub async fn create_user<'e, E>(&self, executor: E, new_user: &NewUser<'_>) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, phone, password_hash, image, role, customer_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new_user.name)
        .bind(new_user.email)
        .bind(new_user.phone)
        .bind(new_user.password_hash)
        .bind(new_user.image)
        .bind(new_user.role)
        .bind(new_user.customer_type)
        .fetch_one(executor)
        .await
        .map_err(map_user_write_error)?;

        Ok(user)
    }

    pub async fn admin_exists(&self) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE role = 'ADMIN')")
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Define o tipo do cliente explicitamente (repetir é inofensivo).
    pub async fn set_customer_type<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        customer_type: CustomerType,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET customer_type = $2, updated_at = NOW()
            WHERE id = $1 AND role = 'CUSTOMER'
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(customer_type)
        .fetch_optional(executor)
        .await?;
        Ok(user)
    }

    /// NORMAL -> POTENTIAL. Devolve true se houve promoção; nunca rebaixa.
    pub async fn promote_to_potential<'e, E>(&self, executor: E, customer_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE users SET customer_type = 'POTENTIAL', updated_at = NOW()
            WHERE id = $1
              AND role = 'CUSTOMER'
              AND customer_type IS DISTINCT FROM 'POTENTIAL'
            "#,
        )
        .bind(customer_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Inverte a assinatura de anúncios e devolve o novo valor.
    pub async fn toggle_subscription(&self, user_id: Uuid) -> Result<Option<bool>, AppError> {
        let state: Option<bool> = sqlx::query_scalar(
            r#"
            UPDATE users SET is_subscribed = NOT is_subscribed, updated_at = NOW()
            WHERE id = $1
            RETURNING is_subscribed
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(state)
    }

    pub async fn update_customer(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        customer_type: CustomerType,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET name = $2, email = $3, customer_type = $4, updated_at = NOW()
            WHERE id = $1 AND role = 'CUSTOMER'
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(customer_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_write_error)?;
        Ok(user)
    }

    /// Atualiza um funcionário; a senha só muda quando um novo hash é enviado.
    pub async fn update_employee(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $2,
                email = $3,
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE id = $1 AND role = 'EMPLOYEE'
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_write_error)?;
        Ok(user)
    }

    pub async fn delete_with_role<'e, E>(&self, executor: E, id: Uuid, role: Role) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = $2")
            .bind(id)
            .bind(role)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_customers(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ANY($1) AND role = 'CUSTOMER'")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_employees(&self) -> Result<Vec<EmployeeSummary>, AppError> {
        let employees = sqlx::query_as::<_, EmployeeSummary>(
            r#"
            SELECT u.id, u.name, u.email, u.image, u.created_at,
                   COUNT(p.id) AS assigned_projects
            FROM users u
            LEFT JOIN projects p ON p.assigned_employee_id = u.id
            WHERE u.role = 'EMPLOYEE'
            GROUP BY u.id
            ORDER BY u.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    /// Clientes POTENTIAL com ao menos um projeto atribuído ao funcionário.
    pub async fn list_clients_of_employee(&self, employee_id: Uuid) -> Result<Vec<User>, AppError> {
        let clients = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users u
            WHERE u.role = 'CUSTOMER'
              AND u.customer_type = 'POTENTIAL'
              AND EXISTS (
                  SELECT 1 FROM projects p
                  WHERE p.customer_id = u.id AND p.assigned_employee_id = $1
              )
            ORDER BY u.name
            "#
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(clients)
    }
}
