pub mod auth;
pub use auth::AuthService;
pub mod user_service;
pub use user_service::UserService;
pub mod company_service;
pub use company_service::CompanyService;
pub mod offer_service;
pub use offer_service::OfferService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod report_service;
pub use report_service::ReportService;
pub mod subscription_service;
pub use subscription_service::SubscriptionService;
pub mod payment_service;
pub use payment_service::PaymentService;
pub mod email_service;
pub use email_service::Mailer;
