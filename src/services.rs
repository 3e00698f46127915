pub mod alert_service;
pub mod auth;
pub mod billing_service;
pub mod client_service;
pub mod dashboard_service;
pub mod report_service;
pub mod seed;
