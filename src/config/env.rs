//! Variables plates `AARCHUP_*`, appliquées après le fichier et les clés
//! imbriquées `AARCHUP__SECTION__CLE`.

use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use humantime::parse_duration;

use crate::error::ConfigError;

use super::raw::RawConfig;

const COMMAND: &str = "AARCHUP_COMMAND";
const AUR_COMMAND: &str = "AARCHUP_AUR_COMMAND";
const AUR: &str = "AARCHUP_AUR";
const MAX_LINES: &str = "AARCHUP_MAX_LINES";
const TIMEOUT: &str = "AARCHUP_TIMEOUT";
const URGENCY: &str = "AARCHUP_URGENCY";
const ICON: &str = "AARCHUP_ICON";
const LOOP: &str = "AARCHUP_LOOP";
const LOOP_INTERVAL: &str = "AARCHUP_LOOP_INTERVAL";
const FORCE_CLOSE: &str = "AARCHUP_FORCE_CLOSE";

pub(super) fn apply(raw: &mut RawConfig) -> Result<(), ConfigError> {
    apply_from(raw, std::env::var_os)
}

fn apply_from<F>(raw: &mut RawConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&'static str) -> Option<OsString>,
{
    let env = Vars(lookup);

    if let Some(command) = env.string(COMMAND)? {
        raw.commands.update = command;
    }
    if let Some(command) = env.string(AUR_COMMAND)? {
        raw.commands.aur = command;
    }
    if let Some(enabled) = env.flag(AUR)? {
        raw.commands.aur_enabled = enabled;
    }
    if let Some(max_lines) = env.parse::<usize>(MAX_LINES)? {
        raw.commands.max_lines = max_lines;
    }
    if let Some(timeout) = env.duration(TIMEOUT)? {
        raw.notify.timeout = timeout;
    }
    if let Some(urgency) = env.string(URGENCY)? {
        raw.notify.urgency = urgency;
    }
    if let Some(icon) = env.string(ICON)? {
        raw.notify.icon = Some(PathBuf::from(icon));
    }
    if let Some(looping) = env.flag(LOOP)? {
        raw.schedule.looping = looping;
    }
    if let Some(interval) = env.duration(LOOP_INTERVAL)? {
        raw.schedule.interval = interval;
    }
    if let Some(force_close) = env.duration(FORCE_CLOSE)? {
        raw.schedule.force_close = Some(force_close);
    }
    Ok(())
}

/// Lecture typée des variables ; une valeur vide vaut absence.
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&'static str) -> Option<OsString>,
{
    fn string(&self, key: &'static str) -> Result<Option<String>, ConfigError> {
        let Some(value) = (self.0)(key) else {
            return Ok(None);
        };
        let value = value.into_string().map_err(|_| ConfigError::InvalidField {
            field: key,
            message: "value is not valid UTF-8".to_string(),
        })?;
        let value = value.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    fn parse<T>(&self, key: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.string(key)?
            .map(|value| {
                value.parse::<T>().map_err(|err| ConfigError::InvalidField {
                    field: key,
                    message: err.to_string(),
                })
            })
            .transpose()
    }

    fn flag(&self, key: &'static str) -> Result<Option<bool>, ConfigError> {
        self.string(key)?
            .map(|value| match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidField {
                    field: key,
                    message: format!("expected a boolean, got {value:?}"),
                }),
            })
            .transpose()
    }

    fn duration(&self, key: &'static str) -> Result<Option<Duration>, ConfigError> {
        self.string(key)?
            .map(|value| {
                parse_duration(&value).map_err(|err| ConfigError::InvalidField {
                    field: key,
                    message: err.to_string(),
                })
            })
            .transpose()
    }
}
