pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tenancy_repo;
pub use tenancy_repo::HotelRepository;
pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod offer_repo;
pub use offer_repo::OfferRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
