//! Service layer for userdir
//!
//! The service layer sits on top of the entity stores: it validates input,
//! keeps user mutations and their audit records together, and answers
//! lookups.

pub mod audit;
pub mod user;

pub use audit::AuditService;
pub use user::UserService;
