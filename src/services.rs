pub mod auth;
pub mod broadcast_service;
pub mod client_service;
pub mod customer_service;
pub mod dashboard_service;
pub mod employee_service;
pub mod messaging_service;
pub mod oauth_service;
pub mod otp_service;
pub mod product_service;
pub mod project_service;
pub mod quote_document_service;
pub mod report_service;
pub mod sms;
pub mod staff_service;
pub mod storage;
