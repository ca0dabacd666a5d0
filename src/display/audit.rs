//! Audit record display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::audit::{AuditDetails, ChangeRecord};

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "When")]
    timestamp: String,
    #[tabled(rename = "Change")]
    kind: String,
    #[tabled(rename = "User")]
    subject: String,
    #[tabled(rename = "Name")]
    label: String,
}

/// Format change records as a table
pub fn format_record_list(records: &[ChangeRecord], timestamp_format: &str) -> String {
    if records.is_empty() {
        return "No change records found.".to_string();
    }

    let rows = records.iter().map(|record| RecordRow {
        id: record.id.to_string(),
        timestamp: record.timestamp.format(timestamp_format).to_string(),
        kind: record.kind.to_string(),
        subject: record.subject_id.to_string(),
        label: record.subject_label.clone(),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

/// Format one record with its before/after state
pub fn format_record_details(details: &AuditDetails, timestamp_format: &str) -> String {
    let record = &details.record;
    let mut output = String::new();

    output.push_str(&format!("Record:   {}\n", record.id));
    output.push_str(&format!(
        "When:     {}\n",
        record.timestamp.format(timestamp_format)
    ));
    output.push_str(&format!("Change:   {}\n", record.kind));
    output.push_str(&format!(
        "User:     {} ({})\n",
        record.subject_id, record.subject_label
    ));

    // An unreadable payload still shows the header and empty sections
    if let Ok(payload) = record.payload() {
        let changed = payload.changed_fields();
        if !changed.is_empty() {
            output.push_str(&format!("Fields:   {}\n", changed.join(", ")));
        }
        if let Some(summary) = payload.summary() {
            output.push_str(&format!("Summary:  {}\n", summary));
        }
    }

    output.push_str(&format!("\nBefore:   {}\n", or_none(&details.old_details)));
    output.push_str(&format!("After:    {}\n", or_none(&details.new_details)));

    output
}

fn or_none(section: &str) -> &str {
    if section.is_empty() {
        "(none)"
    } else {
        section
    }
}
