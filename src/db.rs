pub mod alert_repo;
pub use alert_repo::{AlertRepository, AlertStore};
pub mod billing_repo;
pub use billing_repo::{BillingRepository, BillingStore};
pub mod report_repo;
pub use report_repo::ReportRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
