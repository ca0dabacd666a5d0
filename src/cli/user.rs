//! User CLI commands
//!
//! Implements CLI commands for maintaining the directory.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_record_list, format_user_details, format_user_list};
use crate::error::{UserDirError, UserDirResult};
use crate::models::{User, UserPatch};
use crate::services::UserService;
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List {
        /// Only active users
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        /// Only inactive users
        #[arg(long)]
        inactive: bool,
    },
    /// Show user details
    Show {
        /// User ID, email or full name
        user: String,
    },
    /// Add a new user
    Add {
        /// Given name
        #[arg(long)]
        forename: String,
        /// Family name
        #[arg(long)]
        surname: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
        /// Create the user as inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Edit an existing user
    Edit {
        /// User ID, email or full name
        user: String,
        /// New given name
        #[arg(long)]
        forename: Option<String>,
        /// New family name
        #[arg(long)]
        surname: Option<String>,
        /// New email address
        #[arg(long)]
        email: Option<String>,
        /// New date of birth (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_dob")]
        dob: Option<String>,
        /// Remove the recorded date of birth
        #[arg(long)]
        clear_dob: bool,
        /// Mark the user active
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        /// Mark the user inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Delete a user
    Delete {
        /// User ID, email or full name
        user: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Show the change history of a user
    Logs {
        /// User ID, email or full name
        user: String,
    },
}

/// Handle a user command
pub fn handle_user_command(
    storage: &Storage,
    settings: &Settings,
    cmd: UserCommands,
) -> UserDirResult<()> {
    let service = UserService::new(storage);

    match cmd {
        UserCommands::List { active, inactive } => {
            let users = match active_filter(active, inactive) {
                Some(is_active) => service.filter_by_active(is_active)?,
                None => service.get_all()?,
            };
            println!("{}", format_user_list(&users, &settings.date_format));
        }

        UserCommands::Show { user } => {
            let found = find_user(&service, &user)?;
            print!("{}", format_user_details(&found, &settings.date_format));
        }

        UserCommands::Add {
            forename,
            surname,
            email,
            dob,
            inactive,
        } => {
            let mut new_user =
                User::new(forename.trim(), surname.trim(), email.trim()).with_active(!inactive);
            if let Some(dob) = dob {
                new_user = new_user.with_date_of_birth(parse_date(&dob)?);
            }

            let created = service.create(new_user)?;
            println!("Created user: {} ({})", created.full_name(), created.id);
        }

        UserCommands::Edit {
            user,
            forename,
            surname,
            email,
            dob,
            clear_dob,
            active,
            inactive,
        } => {
            let existing = find_user(&service, &user)?;

            let patch = UserPatch {
                forename,
                surname,
                email,
                is_active: active_filter(active, inactive),
                date_of_birth: dob_change(dob.as_deref(), clear_dob)?,
            };

            if patch.is_empty() {
                println!("No changes specified for {}", existing.full_name());
                return Ok(());
            }

            let updated = service.update(patch.apply_to(&existing))?;
            println!("Updated user: {} ({})", updated.full_name(), updated.id);
        }

        UserCommands::Delete { user, force } => {
            let existing = find_user(&service, &user)?;

            if !force {
                println!("About to delete user: {}", existing.full_name());
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            service.delete(&existing)?;
            println!("Deleted user: {} ({})", existing.full_name(), existing.id);
        }

        UserCommands::Logs { user } => {
            let found = find_user(&service, &user)?;
            let records = service.history(found.id)?;
            println!("{}", format_record_list(&records, &settings.timestamp_format));
        }
    }

    Ok(())
}

fn find_user(service: &UserService, identifier: &str) -> UserDirResult<User> {
    service
        .find(identifier)?
        .ok_or_else(|| UserDirError::user_not_found(identifier))
}

fn active_filter(active: bool, inactive: bool) -> Option<bool> {
    match (active, inactive) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn dob_change(dob: Option<&str>, clear: bool) -> UserDirResult<Option<Option<NaiveDate>>> {
    if clear {
        return Ok(Some(None));
    }
    dob.map(|d| parse_date(d).map(Some)).transpose()
}

fn parse_date(date_str: &str) -> UserDirResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        UserDirError::InvalidArgument(format!(
            "Invalid date format: '{}'. Use YYYY-MM-DD",
            date_str
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("1968-01-08").unwrap(),
            NaiveDate::from_ymd_opt(1968, 1, 8).unwrap()
        );
        assert!(parse_date("08/01/1968").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_dob_change() {
        assert_eq!(dob_change(None, false).unwrap(), None);
        assert_eq!(dob_change(None, true).unwrap(), Some(None));
        assert_eq!(
            dob_change(Some("1968-01-08"), false).unwrap(),
            Some(NaiveDate::from_ymd_opt(1968, 1, 8))
        );
        assert!(dob_change(Some("yesterday"), false).is_err());
    }

    #[test]
    fn test_active_filter() {
        assert_eq!(active_filter(true, false), Some(true));
        assert_eq!(active_filter(false, true), Some(false));
        assert_eq!(active_filter(false, false), None);
    }
}
