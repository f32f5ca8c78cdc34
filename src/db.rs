pub mod user_repo;
pub use user_repo::UserRepository;
pub mod otp_repo;
pub use otp_repo::OtpRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod project_repo;
pub use project_repo::ProjectRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
pub mod broadcast_repo;
pub use broadcast_repo::BroadcastRepository;
pub mod conversation_repo;
pub use conversation_repo::ConversationRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
