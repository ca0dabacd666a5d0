//! User display formatting
//!
//! Formats users for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::User;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Born")]
    date_of_birth: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

fn status(user: &User) -> &'static str {
    if user.is_active {
        "Active"
    } else {
        "Inactive"
    }
}

/// Format a list of users as a table
pub fn format_user_list(users: &[User], date_format: &str) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let rows = users.iter().map(|user| UserRow {
        id: user.id.to_string(),
        name: user.full_name(),
        email: user.email.clone(),
        date_of_birth: user
            .date_of_birth
            .map(|dob| dob.format(date_format).to_string())
            .unwrap_or_default(),
        status: status(user),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());

    let active = users.iter().filter(|user| user.is_active).count();
    format!(
        "{}\n\nTotal: {} users ({} active)",
        table,
        users.len(),
        active
    )
}

/// Format a single user's details
pub fn format_user_details(user: &User, date_format: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("User:     {}\n", user.full_name()));
    output.push_str(&format!("ID:       {}\n", user.id));
    output.push_str(&format!("Email:    {}\n", user.email));
    output.push_str(&format!(
        "Born:     {}\n",
        user.date_of_birth
            .map(|dob| dob.format(date_format).to_string())
            .unwrap_or_else(|| "(unknown)".to_string())
    ));
    output.push_str(&format!("Status:   {}\n", status(user)));

    output
}
