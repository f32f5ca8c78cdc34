// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::init_admin,
        handlers::auth::request_otp,
        handlers::auth::verify_otp,
        handlers::auth::google_sign_in,

        // --- Users ---
        handlers::auth::get_me,

        // --- Products ---
        handlers::products::list_public_products,
        handlers::products::get_public_product,
        handlers::products::list_all_products,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Customers ---
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::customers::bulk_delete_customers,
        handlers::customers::set_customer_type,
        handlers::customers::save_contact,
        handlers::customers::delete_contact,
        handlers::customers::list_tags,
        handlers::customers::create_tag,
        handlers::customers::update_tag,
        handlers::customers::delete_tag,
        handlers::customers::add_customer_tag,
        handlers::customers::remove_customer_tag,

        // --- Employees ---
        handlers::employees::list_employees,
        handlers::employees::create_employee,
        handlers::employees::update_employee,
        handlers::employees::delete_employee,

        // --- Projects ---
        handlers::projects::list_projects,
        handlers::projects::create_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::projects::assign_employee,
        handlers::projects::set_deadline,
        handlers::projects::toggle_completion,
        handlers::projects::add_quote,
        handlers::projects::quote_pdf,

        // --- Reports ---
        handlers::reports::create_report,
        handlers::reports::list_reports,
        handlers::reports::update_report,
        handlers::reports::delete_report,
        handlers::reports::list_activities,
        handlers::reports::create_activity,
        handlers::reports::delete_activity,

        // --- Staff ---
        handlers::reports::workspace,
        handlers::reports::delete_own_report,
        handlers::staff::my_clients,
        handlers::staff::client_detail,
        handlers::staff::create_client_project,

        // --- Broadcasts ---
        handlers::broadcasts::list_broadcasts,
        handlers::broadcasts::create_broadcast,
        handlers::broadcasts::update_broadcast,
        handlers::broadcasts::delete_broadcast,

        // --- Client ---
        handlers::broadcasts::toggle_subscription,
        handlers::broadcasts::visible_broadcasts,
        handlers::client::apply_for_product,
        handlers::client::my_applications,
        handlers::messaging::my_conversations,

        // --- Messaging ---
        handlers::messaging::send_message,
        handlers::messaging::list_messages,
        handlers::client::upload_image,

        // --- Dashboard ---
        handlers::dashboard::admin_dashboard,
        handlers::dashboard::employee_dashboard,
        handlers::dashboard::customer_dashboard,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::CustomerType,
            models::auth::User,
            models::auth::RegisterCustomerPayload,
            models::auth::LoginPayload,
            models::auth::InitAdminPayload,
            models::auth::RequestOtpPayload,
            models::auth::VerifyOtpPayload,
            models::auth::GoogleSignInPayload,
            models::auth::AuthResponse,
            models::auth::OtpRequestedResponse,

            // --- Products ---
            models::product::Product,
            models::product::CreateProductPayload,
            models::product::UpdateProductPayload,
            models::product::ApplyProductPayload,

            // --- Customers ---
            models::customer::Tag,
            models::customer::TagPayload,
            models::customer::AddTagPayload,
            models::customer::CustomerContact,
            models::customer::ContactPayload,
            models::customer::CustomerSummary,
            models::customer::CustomerDetail,
            models::customer::CreateCustomerPayload,
            models::customer::UpdateCustomerPayload,
            models::customer::SetCustomerTypePayload,
            models::customer::BulkDeletePayload,
            models::customer::DeletedCount,

            // --- Employees ---
            models::employee::EmployeeSummary,
            models::employee::CreateEmployeePayload,
            models::employee::UpdateEmployeePayload,

            // --- Projects ---
            models::project::ProjectStatus,
            models::project::Project,
            models::project::Quote,
            models::project::PersonSummary,
            models::project::DisplayProject,
            models::project::ProjectWithQuotes,
            models::project::DashboardProject,
            models::project::CreateProjectPayload,
            models::project::UpdateProjectPayload,
            models::project::StaffProjectPayload,
            models::project::AssignEmployeePayload,
            models::project::DeadlinePayload,
            models::project::CreateQuotePayload,

            // --- Reports ---
            models::report::ReportType,
            models::report::Report,
            models::report::ReportListItem,
            models::report::CreateReportPayload,
            models::report::UpdateReportPayload,
            models::report::SalesActivity,
            models::report::ActivityForm,
            models::report::Workspace,

            // --- Staff ---
            models::staff::StaffClient,
            models::staff::StaffClientDetail,

            // --- Broadcasts ---
            models::broadcast::Broadcast,
            models::broadcast::SubscriptionState,
            models::broadcast::BroadcastForm,

            // --- Messaging ---
            models::conversation::SenderRole,
            models::conversation::Conversation,
            models::conversation::Message,
            models::conversation::ConversationWithMessages,
            models::conversation::MessageForm,
            handlers::client::UploadedImage,

            // --- Dashboard ---
            models::dashboard::ProjectStats,
            models::dashboard::AdminDashboard,
            models::dashboard::EmployeeDashboard,
            models::dashboard::CustomerDashboard,
        )
    ),
    tags(
        (name = "Auth", description = "Registro, login, OTP por SMS e Google"),
        (name = "Users", description = "Dados do Usuário logado"),
        (name = "Products", description = "Catálogo público e gestão de produtos"),
        (name = "Customers", description = "Clientes, contatos e etiquetas"),
        (name = "Employees", description = "Gestão de funcionários"),
        (name = "Projects", description = "Projetos, responsáveis e orçamentos"),
        (name = "Reports", description = "Relatórios e atividades de venda"),
        (name = "Staff", description = "Área do funcionário"),
        (name = "Broadcasts", description = "Anúncios para clientes assinantes"),
        (name = "Client", description = "Área do cliente"),
        (name = "Messaging", description = "Conversas entre cliente e funcionários"),
        (name = "Uploads", description = "Envio de imagens"),
        (name = "Dashboard", description = "Indicadores por papel")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_role_areas_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/admin/projects/{id}/assignee"));
        assert!(doc.paths.paths.contains_key("/api/conversations/{id}/messages"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
