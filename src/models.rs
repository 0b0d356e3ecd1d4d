pub mod auth;
pub mod company;
pub mod dashboard;
pub mod offer;
pub mod payment;
pub mod report;
pub mod tenancy;
