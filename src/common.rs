pub mod error;
pub mod read_degrade;
