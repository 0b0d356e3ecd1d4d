pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod director;
pub mod offers;
pub mod payment;
pub mod reports;
pub mod users;
