pub mod alerts;
pub mod auth;
pub mod billing;
pub mod clients;
pub mod dashboard;
pub mod reports;
