//! Audit log CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_record_details, format_record_list};
use crate::error::{UserDirError, UserDirResult};
use crate::models::{ChangeRecordId, UserId};
use crate::services::AuditService;
use crate::storage::Storage;

/// Audit log subcommands
#[derive(Subcommand)]
pub enum LogCommands {
    /// List change records, most recent last
    List {
        /// Only records for this user ID (deleted users included)
        #[arg(short, long)]
        user: Option<UserId>,
        /// Number of records to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one change record with its before/after state
    Show {
        /// Record ID
        id: ChangeRecordId,
    },
}

/// Handle an audit log command
pub fn handle_log_command(
    storage: &Storage,
    settings: &Settings,
    cmd: LogCommands,
) -> UserDirResult<()> {
    let service = AuditService::new(storage);

    match cmd {
        LogCommands::List { user, limit } => {
            let limit = limit.unwrap_or(settings.audit_list_limit);

            let (records, total) = match user {
                Some(user_id) => {
                    let mut records = service.get_by_user_id(user_id)?;
                    let total = records.len();
                    let start = total.saturating_sub(limit);
                    (records.split_off(start), total)
                }
                None => (service.get_recent(limit)?, service.count()?),
            };

            println!("{}", format_record_list(&records, &settings.timestamp_format));
            if records.len() < total {
                println!("\nShowing {} of {} records", records.len(), total);
            }
        }

        LogCommands::Show { id } => {
            let details = service
                .details(id)?
                .ok_or_else(|| UserDirError::record_not_found(id.value().to_string()))?;
            print!(
                "{}",
                format_record_details(&details, &settings.timestamp_format)
            );
        }
    }

    Ok(())
}
