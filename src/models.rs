pub mod alert;
pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod report;
