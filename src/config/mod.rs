use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;
use crate::error::Error as AarchupError;
use crate::types::Urgency;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use self::serde::HumantimeDuration;

/// Configuration validée et immuable.
#[derive(Debug, Clone)]
pub struct Config {
    pub update_command: String,
    pub aur: AurSettings,
    pub max_lines: usize,
    pub notify: NotifySettings,
    pub mode: RunMode,
}

#[derive(Debug, Clone)]
pub struct AurSettings {
    pub enabled: bool,
    pub command: String,
}

#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub appname: String,
    pub category: String,
    pub timeout: Duration,
    pub urgency: Urgency,
    pub icon: Option<PathBuf>,
}

/// Exécution unique ou en boucle. Le délai de fermeture forcée n'existe
/// qu'en boucle et ne dépasse jamais l'intervalle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Once,
    Loop {
        interval: Duration,
        force_close: Option<Duration>,
    },
}

impl RunMode {
    #[must_use]
    pub const fn force_close(&self) -> Option<Duration> {
        match self {
            Self::Once => None,
            Self::Loop { force_close, .. } => *force_close,
        }
    }
}

/// Valeurs de la ligne de commande, prioritaires sur le fichier et l'ENV.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub update_command: Option<String>,
    pub aur_command: Option<String>,
    pub aur: bool,
    pub max_lines: Option<usize>,
    pub timeout: Option<Duration>,
    pub urgency: Option<Urgency>,
    pub icon: Option<PathBuf>,
    pub loop_interval: Option<Duration>,
    pub force_close: Option<Duration>,
}

impl Config {
    /// Load configuration from a file, the environment and CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be read, parsed,
    /// when environment overrides are invalid, or when the resulting values
    /// fail validation.
    pub fn load(path: impl AsRef<Path>, overrides: &Overrides) -> Result<Self> {
        let mut raw = raw::load(path).map_err(AarchupError::from)?;
        env::apply(&mut raw).map_err(AarchupError::from)?;
        raw.apply_overrides(overrides);
        raw.validate_and_build()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update_command: defaults::default_update_command(),
            aur: AurSettings {
                enabled: false,
                command: defaults::default_aur_command(),
            },
            max_lines: defaults::default_max_lines(),
            notify: NotifySettings {
                appname: defaults::default_appname(),
                category: defaults::default_category(),
                timeout: defaults::default_timeout(),
                urgency: Urgency::default(),
                icon: None,
            },
            mode: RunMode::Once,
        }
    }
}
