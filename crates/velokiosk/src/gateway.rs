//! Tracing-backed stand-in for the external spreadsheet client.
//!
//! The real ledger service is owned outside this repository; the binary
//! plugs this gateway in so every prepared write is observable in the
//! logs. Swap in a real `SyncGateway` implementation to ship rows to an
//! actual sheet.

use async_trait::async_trait;
use tracing::{debug, info};

use velokiosk_core::{SyncError, SyncGateway};

pub struct TracingSyncGateway;

impl TracingSyncGateway {
    fn log(operation: &str, range: &str, rows: &[Vec<String>]) {
        info!(operation, range, rows = rows.len(), "sync dispatch");
        for row in rows {
            debug!(row = row.join(" | "), "sync row");
        }
    }
}

#[async_trait]
impl SyncGateway for TracingSyncGateway {
    async fn write(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), SyncError> {
        Self::log("write", range, &rows);
        Ok(())
    }

    async fn append(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), SyncError> {
        Self::log("append", range, &rows);
        Ok(())
    }

    async fn clear_and_write(&self, range: &str, rows: Vec<Vec<String>>) -> Result<(), SyncError> {
        Self::log("clear_and_write", range, &rows);
        Ok(())
    }
}
