//! Filekit CLI - interactive file manager shell
//!
//! Usage:
//!   filekit                        # start as Guest in the home directory
//!   filekit --username=Alice       # banner name
//!
//! One command per line on stdin; `.exit` or Ctrl+C leaves the shell.

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use filekit::{Outcome, Session, EXIT_SENTINEL};

/// Filekit - interactive file manager shell
#[derive(Parser, Debug)]
#[command(name = "filekit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Display name shown in the welcome and farewell banners
    #[arg(long, default_value = "Guest")]
    username: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut session = Session::builder().build();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Welcome to the File Manager, {}!", args.username);
    println!("You are currently in {}", session.cwd().display());
    println!("Please enter commands and press Enter. Type \"{EXIT_SENTINEL}\" to quit.");

    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => line?,
        };
        // stdin closed
        let Some(line) = line else { break };

        // An interrupt mid-command aborts the in-flight pipeline; the
        // farewell below still prints.
        let outcome = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            outcome = session.dispatch(&line, &mut stdout) => outcome,
        };
        if outcome == Outcome::Exit {
            break;
        }
    }

    println!("Thank you for using File Manager, {}, goodbye!", args.username);
    Ok(())
}
