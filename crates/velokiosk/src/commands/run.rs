//! `velokiosk run` -- the interactive kiosk runner.
//!
//! Starts the reconcile loop and bridges stdin to the press operation:
//! a bike number presses that bike, `report` prints the audit report,
//! `quit` (or ctrl-c) shuts down cleanly.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use velokiosk_core::{AppEvent, Kiosk};

use crate::cli::{GlobalOpts, RunArgs};
use crate::commands::report;
use crate::config::build_kiosk_config;
use crate::error::CliError;
use crate::gateway::TracingSyncGateway;

pub async fn handle(args: &RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = build_kiosk_config(global, args.tick_ms)?;
    let kiosk = Kiosk::new(config, Arc::new(TracingSyncGateway))?;

    let mut notices = kiosk.notices();
    kiosk.start().await;
    println!(
        "velokiosk running. Enter a bike number to press it, 'report' for the audit report, 'quit' to exit."
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            notice = notices.recv() => match notice {
                Ok(AppEvent::Success(message)) => println!("{message}"),
                Ok(AppEvent::Error(message)) => eprintln!("error: {message}"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "notice stream lagged"),
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(&kiosk, line.trim()).await {
                    break;
                }
            },
        }
    }

    kiosk.stop().await;
    Ok(())
}

/// Dispatch one stdin line. Returns `false` to stop the runner.
async fn handle_line(kiosk: &Kiosk, line: &str) -> bool {
    match line {
        "" => true,
        "quit" | "exit" => false,
        "report" => {
            print!("{}", report::render(&kiosk.daily_report().await));
            true
        }
        other => {
            // Bike numbers are entered as displayed (1-based).
            match other.parse::<u32>() {
                Ok(number) if number >= 1 => {
                    if let Err(e) = kiosk.press(number - 1) {
                        eprintln!("error: {e}");
                    }
                }
                _ => eprintln!("unrecognized input '{other}' (bike number, 'report', or 'quit')"),
            }
            true
        }
    }
}
