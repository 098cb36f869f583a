//! Activity logging: validation rules and the member-facing service.

pub mod service;
pub mod validator;

pub use service::ActivityService;
pub use validator::{ensure_no_same_day, resolve_performed_at};
