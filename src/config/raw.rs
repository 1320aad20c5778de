use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::error::ConfigError;
use crate::notify::MAX_TIMEOUT;
use crate::types::Urgency;

use super::defaults::{
    default_appname, default_aur_command, default_category, default_loop_interval,
    default_max_lines, default_timeout, default_update_command, default_urgency,
};
use super::{AurSettings, Config, HumantimeDuration, NotifySettings, Overrides, RunMode};

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix("AARCHUP")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) commands: RawCommands,
    #[serde(default)]
    pub(super) notify: RawNotify,
    #[serde(default)]
    pub(super) schedule: RawSchedule,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawCommands {
    #[serde(default = "default_update_command")]
    pub(super) update: String,
    #[serde(default = "default_aur_command")]
    pub(super) aur: String,
    #[serde(default)]
    pub(super) aur_enabled: bool,
    #[serde(default = "default_max_lines")]
    pub(super) max_lines: usize,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawNotify {
    #[serde(default = "default_appname")]
    pub(super) appname: String,
    #[serde(default = "default_category")]
    pub(super) category: String,
    #[serde(default = "default_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) timeout: Duration,
    #[serde(default = "default_urgency")]
    pub(super) urgency: String,
    #[serde(default)]
    pub(super) icon: Option<PathBuf>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawSchedule {
    #[serde(default, rename = "loop")]
    pub(super) looping: bool,
    #[serde(default = "default_loop_interval")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) interval: Duration,
    #[serde(default)]
    #[serde_as(as = "Option<HumantimeDuration>")]
    pub(super) force_close: Option<Duration>,
}

impl RawConfig {
    pub(super) fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(command) = &overrides.update_command {
            self.commands.update.clone_from(command);
        }
        if let Some(command) = &overrides.aur_command {
            self.commands.aur.clone_from(command);
        }
        if overrides.aur {
            self.commands.aur_enabled = true;
        }
        if let Some(max_lines) = overrides.max_lines {
            self.commands.max_lines = max_lines;
        }
        if let Some(timeout) = overrides.timeout {
            self.notify.timeout = timeout;
        }
        if let Some(urgency) = overrides.urgency {
            self.notify.urgency = urgency.as_str().to_string();
        }
        if let Some(icon) = &overrides.icon {
            self.notify.icon = Some(icon.clone());
        }
        if let Some(interval) = overrides.loop_interval {
            self.schedule.looping = true;
            self.schedule.interval = interval;
        }
        if let Some(force_close) = overrides.force_close {
            self.schedule.force_close = Some(force_close);
        }
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        if self.commands.update.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "commands.update",
            }
            .into());
        }
        if self.commands.aur_enabled && self.commands.aur.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "commands.aur",
                message: "AUR checking is enabled but no AUR command is set".to_string(),
            }
            .into());
        }
        if self.commands.max_lines == 0 {
            return Err(ConfigError::InvalidField {
                field: "commands.max_lines",
                message: "at least one line must be displayed".to_string(),
            }
            .into());
        }
        if self.notify.timeout > MAX_TIMEOUT {
            return Err(ConfigError::InvalidField {
                field: "notify.timeout",
                message: format!(
                    "{} exceeds the longest notification timeout ({})",
                    humantime::format_duration(self.notify.timeout),
                    humantime::format_duration(MAX_TIMEOUT)
                ),
            }
            .into());
        }
        let urgency = Urgency::from_str(&self.notify.urgency).map_err(|message| {
            ConfigError::InvalidField {
                field: "notify.urgency",
                message,
            }
        })?;

        let mode = self.schedule.build_mode()?;

        Ok(Config {
            update_command: self.commands.update,
            aur: AurSettings {
                enabled: self.commands.aur_enabled,
                command: self.commands.aur,
            },
            max_lines: self.commands.max_lines,
            notify: NotifySettings {
                appname: self.notify.appname,
                category: self.notify.category,
                timeout: self.notify.timeout,
                urgency,
                icon: self.notify.icon,
            },
            mode,
        })
    }
}

impl RawSchedule {
    fn build_mode(&self) -> std::result::Result<RunMode, ConfigError> {
        if !self.looping {
            if self.force_close.is_some() {
                return Err(ConfigError::InvalidField {
                    field: "schedule.force_close",
                    message: "a force-close delay requires loop mode".to_string(),
                });
            }
            return Ok(RunMode::Once);
        }

        // En boucle, un délai nul désactive la fermeture forcée (`-f 0`).
        let force_close = self.force_close.filter(|delay| !delay.is_zero());

        if self.interval.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "schedule.interval",
                message: "loop interval must be greater than zero".to_string(),
            });
        }
        if let Some(delay) = force_close {
            if delay > self.interval {
                return Err(ConfigError::InvalidField {
                    field: "schedule.force_close",
                    message: format!(
                        "force-close delay ({}) must not exceed the loop interval ({})",
                        humantime::format_duration(delay),
                        humantime::format_duration(self.interval)
                    ),
                });
            }
        }

        Ok(RunMode::Loop {
            interval: self.interval,
            force_close,
        })
    }
}

impl Default for RawCommands {
    fn default() -> Self {
        Self {
            update: default_update_command(),
            aur: default_aur_command(),
            aur_enabled: false,
            max_lines: default_max_lines(),
        }
    }
}

impl Default for RawNotify {
    fn default() -> Self {
        Self {
            appname: default_appname(),
            category: default_category(),
            timeout: default_timeout(),
            urgency: default_urgency(),
            icon: None,
        }
    }
}

impl Default for RawSchedule {
    fn default() -> Self {
        Self {
            looping: false,
            interval: default_loop_interval(),
            force_close: None,
        }
    }
}
