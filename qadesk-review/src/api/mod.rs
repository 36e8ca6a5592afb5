//! HTTP handlers for qadesk-review

pub mod health;
pub mod pages;
pub mod records;
pub mod review;
pub mod session;

pub use health::health_routes;
pub use records::{edit_page, records_page, update_record};
pub use review::{review_page, skip_record, submit_record};
pub use session::{login, login_page, logout, session_gate, Operator};
