mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use labelcrm::{
    common::error::AppError,
    db::{ConversationRepository, ProjectRepository, UserRepository},
    models::{
        auth::{CustomerType, Role},
        conversation::SenderRole,
        product::ApplyProductPayload,
        project::ProjectStatus,
    },
};

// ---------------------------------------------------------------------------
// Atribuição de projetos
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn assigning_promotes_customer_and_opens_conversation_once(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let customer = helpers::insert_customer(&pool, "Ana Cliente").await;
    let employee = helpers::insert_employee(&pool, "Beto Staff").await;

    let projects = ProjectRepository::new(pool.clone());
    let first = projects
        .create_project(&pool, customer.id, "Rótulos de vinho", None, None)
        .await
        .expect("project");
    let second = projects
        .create_project(&pool, customer.id, "Etiquetas de café", None, None)
        .await
        .expect("project");

    let assigned = state
        .project_service
        .assign_employee(first.id, Some(employee.id))
        .await
        .expect("assign");
    assert_eq!(assigned.status, ProjectStatus::Assigned);
    assert_eq!(assigned.assigned_employee_id, Some(employee.id));
    assert_eq!(
        helpers::customer_type_of(&pool, customer.id).await,
        Some(CustomerType::Potential)
    );

    // Segunda atribuição para o mesmo cliente não abre outra conversa
    state
        .project_service
        .assign_employee(second.id, Some(employee.id))
        .await
        .expect("assign");

    let conversations = ConversationRepository::new(pool.clone());
    let conversation = conversations
        .find_by_customer(&pool, customer.id)
        .await
        .expect("lookup")
        .expect("conversation");
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversations WHERE customer_id = $1")
        .bind(customer.id)
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(count, 1);

    let messages = conversations
        .list_messages(conversation.id, None)
        .await
        .expect("messages");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender_role, SenderRole::System);
    assert!(messages[0].content.contains("Rótulos de vinho"));
}

#[sqlx::test(migrations = "./migrations")]
async fn unassigning_returns_project_to_pending_without_demoting(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let customer = helpers::insert_customer(&pool, "Caio Cliente").await;
    let employee = helpers::insert_employee(&pool, "Duda Staff").await;

    let project = ProjectRepository::new(pool.clone())
        .create_project(&pool, customer.id, "Selos", None, None)
        .await
        .expect("project");

    state
        .project_service
        .assign_employee(project.id, Some(employee.id))
        .await
        .expect("assign");
    let released = state
        .project_service
        .assign_employee(project.id, None)
        .await
        .expect("unassign");

    assert_eq!(released.status, ProjectStatus::Pending);
    assert_eq!(released.assigned_employee_id, None);
    assert_eq!(
        helpers::customer_type_of(&pool, customer.id).await,
        Some(CustomerType::Potential)
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn only_employees_can_be_assigned(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let customer = helpers::insert_customer(&pool, "Eva Cliente").await;
    let project = ProjectRepository::new(pool.clone())
        .create_project(&pool, customer.id, "Caixas", None, None)
        .await
        .expect("project");

    let err = state
        .project_service
        .assign_employee(project.id, Some(customer.id))
        .await
        .expect_err("customer is not an assignee");
    assert!(matches!(err, AppError::FormError(_)), "{err:?}");
    assert_eq!(
        helpers::customer_type_of(&pool, customer.id).await,
        Some(CustomerType::Normal)
    );
}

// ---------------------------------------------------------------------------
// Promoção de clientes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn promotion_only_moves_normal_customers_up(pool: PgPool) {
    let users = UserRepository::new(pool.clone());
    let customer = helpers::insert_customer(&pool, "Fabi Cliente").await;
    let employee = helpers::insert_employee(&pool, "Gil Staff").await;

    assert!(users.promote_to_potential(&pool, customer.id).await.expect("promote"));
    assert!(!users.promote_to_potential(&pool, customer.id).await.expect("promote"));
    assert_eq!(
        helpers::customer_type_of(&pool, customer.id).await,
        Some(CustomerType::Potential)
    );

    assert!(!users.promote_to_potential(&pool, employee.id).await.expect("promote"));
    assert_eq!(helpers::customer_type_of(&pool, employee.id).await, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn applying_for_a_product_creates_pending_project_and_promotes(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let customer = helpers::insert_customer(&pool, "Hugo Cliente").await;
    let product_id = helpers::insert_product(&pool, "Rótulo adesivo").await;

    let project = state
        .client_service
        .apply_for_product(
            &customer,
            product_id,
            &ApplyProductPayload {
                title: "  Rótulo para geleia  ".into(),
                description: Some("500 unidades".into()),
            },
        )
        .await
        .expect("apply");

    assert_eq!(project.title, "Rótulo para geleia");
    assert_eq!(project.status, ProjectStatus::Pending);
    assert_eq!(project.customer_id, customer.id);
    assert_eq!(project.assigned_employee_id, None);
    assert_eq!(
        helpers::customer_type_of(&pool, customer.id).await,
        Some(CustomerType::Potential)
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn archived_products_cannot_be_applied_for(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let customer = helpers::insert_customer(&pool, "Iris Cliente").await;
    let product_id = helpers::insert_product(&pool, "Fora de linha").await;
    sqlx::query("UPDATE products SET is_archived = TRUE WHERE id = $1")
        .bind(product_id)
        .execute(&pool)
        .await
        .expect("archive");

    let err = state
        .client_service
        .apply_for_product(
            &customer,
            product_id,
            &ApplyProductPayload { title: "Pedido".into(), description: None },
        )
        .await
        .expect_err("archived");
    assert!(matches!(err, AppError::ProductNotFound), "{err:?}");
    assert_eq!(
        helpers::customer_type_of(&pool, customer.id).await,
        Some(CustomerType::Normal)
    );
}

// ---------------------------------------------------------------------------
// Alternâncias
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn toggling_completion_twice_restores_the_flag(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let admin = helpers::insert_user(&pool, "Admin", Role::Admin, None).await;
    let customer = helpers::insert_customer(&pool, "Juca Cliente").await;
    let project = ProjectRepository::new(pool.clone())
        .create_project(&pool, customer.id, "Tags", None, None)
        .await
        .expect("project");
    assert!(!project.is_completed);

    let once = state
        .project_service
        .toggle_completion(&admin, project.id)
        .await
        .expect("toggle");
    assert!(once.is_completed);

    let twice = state
        .project_service
        .toggle_completion(&admin, project.id)
        .await
        .expect("toggle");
    assert!(!twice.is_completed);
}

#[sqlx::test(migrations = "./migrations")]
async fn unassigned_employee_cannot_toggle_completion(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let customer = helpers::insert_customer(&pool, "Lia Cliente").await;
    let outsider = helpers::insert_employee(&pool, "Mauro Staff").await;
    let project = ProjectRepository::new(pool.clone())
        .create_project(&pool, customer.id, "Faixas", None, None)
        .await
        .expect("project");

    let err = state
        .project_service
        .toggle_completion(&outsider, project.id)
        .await
        .expect_err("not the assignee");
    assert!(matches!(err, AppError::Forbidden), "{err:?}");
}

#[sqlx::test(migrations = "./migrations")]
async fn toggling_subscription_twice_restores_the_flag(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let customer = helpers::insert_customer(&pool, "Nina Cliente").await;
    assert!(!customer.is_subscribed);

    let once = state
        .broadcast_service
        .toggle_subscription(&customer)
        .await
        .expect("toggle");
    assert!(once.is_subscribed);

    let twice = state
        .broadcast_service
        .toggle_subscription(&customer)
        .await
        .expect("toggle");
    assert!(!twice.is_subscribed);
}

// ---------------------------------------------------------------------------
// OTP por telefone
// ---------------------------------------------------------------------------

async fn stored_code(pool: &PgPool, phone: &str) -> Option<String> {
    sqlx::query_scalar("SELECT code FROM phone_otps WHERE phone = $1")
        .bind(phone)
        .fetch_optional(pool)
        .await
        .expect("otp lookup")
}

#[sqlx::test(migrations = "./migrations")]
async fn valid_code_signs_in_a_new_normal_customer(pool: PgPool) {
    let state = helpers::test_state(pool.clone());

    let (phone, expires_at) = state.otp_service.request_code("9123 4567").await.expect("request");
    assert_eq!(phone, "+85291234567");
    assert!(expires_at > Utc::now());

    let code = stored_code(&pool, &phone).await.expect("code stored");
    let token = state.otp_service.verify_code(&phone, &code).await.expect("verify");
    assert!(!token.is_empty());
    assert_eq!(stored_code(&pool, &phone).await, None);

    let user = UserRepository::new(pool.clone())
        .find_by_phone(&pool, &phone)
        .await
        .expect("lookup")
        .expect("user created");
    assert_eq!(user.role, Role::Customer);
    assert_eq!(user.customer_type, Some(CustomerType::Normal));
}

#[sqlx::test(migrations = "./migrations")]
async fn expired_code_is_deleted(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let (phone, _) = state.otp_service.request_code("+85291110000").await.expect("request");
    let code = stored_code(&pool, &phone).await.expect("code stored");

    sqlx::query("UPDATE phone_otps SET expires_at = $2 WHERE phone = $1")
        .bind(&phone)
        .bind(Utc::now() - Duration::minutes(1))
        .execute(&pool)
        .await
        .expect("expire");

    let err = state.otp_service.verify_code(&phone, &code).await.expect_err("expired");
    assert!(matches!(err, AppError::OtpExpired), "{err:?}");
    assert_eq!(stored_code(&pool, &phone).await, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn five_failed_attempts_burn_the_code(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let (phone, _) = state.otp_service.request_code("+85292220000").await.expect("request");
    let code = stored_code(&pool, &phone).await.expect("code stored");
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..5 {
        let err = state.otp_service.verify_code(&phone, wrong).await.expect_err("mismatch");
        assert!(matches!(err, AppError::OtpInvalid), "{err:?}");
    }
    assert!(stored_code(&pool, &phone).await.is_some());

    // Nem o código certo vale depois do limite
    let err = state.otp_service.verify_code(&phone, &code).await.expect_err("exhausted");
    assert!(matches!(err, AppError::OtpTooManyAttempts), "{err:?}");
    assert_eq!(stored_code(&pool, &phone).await, None);
}

// ---------------------------------------------------------------------------
// Funcionários
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn deleting_an_employee_releases_their_projects(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let customer = helpers::insert_customer(&pool, "Olga Cliente").await;
    let employee = helpers::insert_employee(&pool, "Paulo Staff").await;

    let projects = ProjectRepository::new(pool.clone());
    let project = projects
        .create_project(&pool, customer.id, "Envelopes", None, None)
        .await
        .expect("project");
    state
        .project_service
        .assign_employee(project.id, Some(employee.id))
        .await
        .expect("assign");

    state.employee_service.delete_employee(employee.id).await.expect("delete");

    let released = projects.find_by_id(project.id).await.expect("lookup").expect("project");
    assert_eq!(released.status, ProjectStatus::Pending);
    assert_eq!(released.assigned_employee_id, None);
    assert!(UserRepository::new(pool.clone())
        .find_by_id(employee.id)
        .await
        .expect("lookup")
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_customer_through_the_employee_path_is_refused(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let customer = helpers::insert_customer(&pool, "Quita Cliente").await;

    let err = state
        .employee_service
        .delete_employee(customer.id)
        .await
        .expect_err("not an employee");
    assert!(matches!(err, AppError::EmployeeNotFound), "{err:?}");
}

// ---------------------------------------------------------------------------
// Papéis nas rotas
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn valid_token_with_the_wrong_role_is_forbidden(pool: PgPool) {
    let state = helpers::test_state(pool.clone());
    let employee = helpers::insert_employee(&pool, "Rui Staff").await;
    let customer = helpers::insert_customer(&pool, "Sara Cliente").await;
    let app = helpers::test_router(state.clone());

    let employee_token = state.auth_service.create_token(&employee).expect("token");
    let (status, _) = helpers::get_with_token(&app, &employee_token, "/api/admin/projects").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let customer_token = state.auth_service.create_token(&customer).expect("token");
    let (status, _) = helpers::get_with_token(&app, &customer_token, "/api/staff/clients").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = helpers::get_with_token(&app, &customer_token, "/api/client/broadcasts").await;
    assert_eq!(status, StatusCode::OK);
}
