use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use aarchup::config::Overrides;
use aarchup::types::Urgency;
use clap::{ArgAction, Parser};
use humantime::parse_duration;

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Shows pending package updates in a desktop notification",
    long_about = None
)]
pub struct Cli {
    /// Command that lists pending updates.
    #[arg(short = 'c', long, value_name = "COMMAND")]
    pub command: Option<String>,

    /// Icon shown in the notification.
    #[arg(short = 'p', long, value_name = "PATH")]
    pub icon: Option<PathBuf>,

    /// Maximum number of lines in the notification.
    #[arg(short = 'm', long = "maxentries", value_name = "N")]
    pub max_entries: Option<usize>,

    /// Auto-dismiss timeout (bare number = seconds, or e.g. "1h").
    #[arg(short = 't', long, value_parser = parse_seconds)]
    pub timeout: Option<Duration>,

    /// Urgency level: low, normal or critical.
    #[arg(short = 'u', long, value_parser = Urgency::from_str)]
    pub urgency: Option<Urgency>,

    /// Keep running and check every interval (bare number = minutes).
    #[arg(short = 'l', long = "loop-time", value_parser = parse_minutes)]
    pub loop_time: Option<Duration>,

    /// Close the notification after this delay; needs --loop-time
    /// (bare number = minutes).
    #[arg(short = 'f', long = "ftimeout", value_parser = parse_minutes)]
    pub force_close: Option<Duration>,

    /// Check the AUR for updates too.
    #[arg(long, action = ArgAction::SetTrue)]
    pub aur: bool,

    /// Command that lists pending AUR updates.
    #[arg(long, value_name = "COMMAND")]
    pub aur_command: Option<String>,

    /// Configuration file (TOML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log only what would be shown instead of notifying.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Print debug information.
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    pub debug: bool,

    /// Emit JSON logs (needs `--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "aarchup=trace").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            update_command: self.command.clone(),
            aur_command: self.aur_command.clone(),
            aur: self.aur,
            max_lines: self.max_entries,
            timeout: self.timeout,
            urgency: self.urgency,
            icon: self.icon.clone(),
            loop_interval: self.loop_time,
            force_close: self.force_close,
        }
    }
}

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    parse_with_unit(raw, 1)
}

fn parse_minutes(raw: &str) -> Result<Duration, String> {
    parse_with_unit(raw, 60)
}

/// Un entier nu compte en `unit` secondes ; le reste passe par humantime.
fn parse_with_unit(raw: &str, unit: u64) -> Result<Duration, String> {
    let raw = raw.trim();
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(unit))
            .map(Duration::from_secs)
            .ok_or_else(|| format!("{raw} is out of range"));
    }
    parse_duration(raw).map_err(|err| format!("{raw} is not a number or duration: {err}"))
}
