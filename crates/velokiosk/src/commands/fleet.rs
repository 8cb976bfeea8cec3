//! `velokiosk fleet` -- print the current fleet snapshot.

use std::sync::Arc;

use tabled::{Table, Tabled, settings::Style};

use velokiosk_core::timefmt::format_countdown;
use velokiosk_core::{BlobStore, FleetStore};

use crate::cli::GlobalOpts;
use crate::config::build_kiosk_config;
use crate::error::CliError;

#[derive(Tabled)]
struct FleetRow {
    #[tabled(rename = "Bike")]
    name: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let config = build_kiosk_config(global, None)?;
    let blobs = Arc::new(BlobStore::open(&config.data_dir)?);
    let store = FleetStore::open(blobs, &config.fleet)?;

    let rows: Vec<FleetRow> = store
        .snapshot()
        .await
        .iter()
        .map(|bike| FleetRow {
            name: bike.name.clone(),
            status: bike.status.label(),
            price: bike.price.clone(),
            remaining: format_countdown(bike.remaining_ms),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}
