//! Exécution des commandes de listage et capture de leur sortie standard.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::ExecError;

const DEFAULT_SHELL: &str = "/bin/sh";

/// Exécute une ligne de commande et renvoie ce qu'elle a imprimé.
pub trait CommandRunner {
    /// Lance `command` et renvoie toute sa sortie standard.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Spawn`] when the process cannot be started.
    fn capture(&self, command: &str) -> impl Future<Output = Result<String, ExecError>> + Send;
}

/// Passe par un shell POSIX : pipes et arguments de la commande configurée
/// se comportent comme dans un terminal.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
}

impl ShellRunner {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl CommandRunner for ShellRunner {
    async fn capture(&self, command: &str) -> Result<String, ExecError> {
        debug!(command, "running command");
        // `output` keeps reading until the pipe reports EOF, so short reads
        // never end the capture early.
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExecError::Spawn {
                command: command.to_string(),
                source,
            })?;

        // Listing tools exit non-zero to signal "updates available".
        debug!(
            command,
            status = %output.status,
            bytes = output.stdout.len(),
            "command finished"
        );
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
