//! Display formatting for terminal output
//!
//! Turns users and change records into tables and detail views.

pub mod audit;
pub mod user;

pub use audit::{format_record_details, format_record_list};
pub use user::{format_user_details, format_user_list};
