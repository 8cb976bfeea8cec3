//! `velokiosk report` -- print the 24-hour audit report.

use std::sync::Arc;

use chrono::Utc;
use tabled::{Table, Tabled, settings::Style};

use velokiosk_core::{BlobStore, HistoryLedger};

use crate::cli::GlobalOpts;
use crate::config::build_kiosk_config;
use crate::error::CliError;

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Bike")]
    bike: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Transition")]
    transition: String,
    #[tabled(rename = "Duration")]
    duration: String,
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let config = build_kiosk_config(global, None)?;
    let blobs = Arc::new(BlobStore::open(&config.data_dir)?);
    let ledger = HistoryLedger::open(blobs)?;

    let rows = ledger.daily_report(Utc::now().timestamp_millis()).await;
    print!("{}", render(&rows));
    Ok(())
}

/// Render report rows as a table; shared with the interactive runner.
pub fn render(rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "No completed rentals in the last 24 hours.\n".into();
    }

    let cell = |row: &[String], i: usize| row.get(i).cloned().unwrap_or_default();
    let table_rows: Vec<ReportRow> = rows
        .iter()
        .map(|row| ReportRow {
            bike: cell(row, 0),
            from: cell(row, 1),
            to: cell(row, 2),
            transition: cell(row, 3),
            duration: cell(row, 4),
        })
        .collect();

    format!("{}\n", Table::new(table_rows).with(Style::rounded()))
}
