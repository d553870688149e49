//! Host information command (os)
//!
//! Pure queries, no cursor access and no mutation. Values come from the
//! environment and, for CPUs on Linux, from `/proc/cpuinfo`; there is no
//! system-information dependency behind this.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{render_table, Arity, Command, Context};
use crate::error::{Error, Result};

/// Platform line ending.
const EOL: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// The os command - host information behind one flag.
///
/// Exactly one flag from a fixed set is accepted; anything else is a usage
/// error (`Invalid input`), distinct from a runtime failure.
pub struct Os;

#[async_trait]
impl Command for Os {
    fn arity(&self) -> Arity {
        Arity::exact(1)
    }

    async fn execute(&self, mut ctx: Context<'_>) -> Result<()> {
        match ctx.args[0].as_str() {
            "--EOL" => ctx.write_line(&format!("{:?}", EOL)).await,
            "--cpus" => {
                let rows = cpu_rows().await;
                ctx.write(&render_table(("Model", "Speed"), &rows)).await
            }
            "--homedir" => {
                let home = home_dir().display().to_string();
                ctx.write_line(&home).await
            }
            "--username" => ctx.write_line(&os_username()).await,
            "--architecture" => ctx.write_line(std::env::consts::ARCH).await,
            flag => Err(Error::InvalidInput(format!("unrecognized os flag: {flag}"))),
        }
    }
}

/// The current user's home directory, environment-derived.
pub(crate) fn home_dir() -> PathBuf {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"))
}

fn os_username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// One (model, speed) row per logical CPU.
async fn cpu_rows() -> Vec<(String, String)> {
    #[cfg(target_os = "linux")]
    {
        if let Ok(info) = tokio::fs::read_to_string("/proc/cpuinfo").await {
            let rows = parse_cpuinfo(&info);
            if !rows.is_empty() {
                return rows;
            }
        }
    }

    // Model and clock speed are not portably available; fall back to one
    // row per logical CPU with the target architecture as the model.
    let count = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    vec![(std::env::consts::ARCH.to_string(), "unknown".to_string()); count]
}

#[cfg(target_os = "linux")]
fn parse_cpuinfo(text: &str) -> Vec<(String, String)> {
    fn push_row(rows: &mut Vec<(String, String)>, model: Option<String>, mhz: Option<f64>) {
        if let Some(model) = model {
            let speed = mhz
                .map(|v| format!("{:.1} GHz", v / 1000.0))
                .unwrap_or_else(|| "unknown".to_string());
            rows.push((model, speed));
        }
    }

    let mut rows = Vec::new();
    let mut model: Option<String> = None;
    let mut mhz: Option<f64> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            push_row(&mut rows, model.take(), mhz.take());
            mhz = None;
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "model name" => model = Some(value.trim().to_string()),
            "cpu MHz" => mhz = value.trim().parse().ok(),
            _ => {}
        }
    }
    push_row(&mut rows, model.take(), mhz.take());

    rows
}
