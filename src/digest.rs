//! Construit le texte de la notification à partir des listings.

use tracing::debug;

use crate::config::Config;
use crate::error::ExecError;
use crate::exec::CommandRunner;

pub const HEADER: &str = "There are updates for:";
pub const AUR_HEADER: &str = "AUR updates:";

/// Texte borné en lignes affiché dans la notification. Jamais vide : un
/// listing vide donne `None` dans [`Digest::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    lines: Vec<String>,
    dropped: usize,
}

impl Digest {
    /// Combine les sorties brutes et garde au plus `max_lines` lignes.
    ///
    /// Renvoie `None` quand les deux sorties sont vides : rien à mettre à
    /// jour ce cycle.
    #[must_use]
    pub fn build(base: &str, aur: &str, max_lines: usize) -> Option<Self> {
        if base.is_empty() && aur.is_empty() {
            return None;
        }

        let mut lines: Vec<String> = std::iter::once(HEADER)
            .chain(base.lines())
            .map(str::to_string)
            .collect();
        if !aur.is_empty() {
            lines.push(AUR_HEADER.to_string());
            lines.extend(aur.lines().map(str::to_string));
        }

        let dropped = lines.len().saturating_sub(max_lines);
        lines.truncate(max_lines);
        Some(Self { lines, dropped })
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Nombre de lignes coupées par la limite.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    #[must_use]
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }
}

/// Lance les commandes configurées et construit le digest du cycle.
///
/// # Errors
///
/// Propagates spawn failures from the runner; they end the current cycle.
pub async fn collect<R: CommandRunner>(
    runner: &R,
    config: &Config,
) -> Result<Option<Digest>, ExecError> {
    let base = runner.capture(&config.update_command).await?;
    let aur = if config.aur.enabled {
        runner.capture(&config.aur.command).await?
    } else {
        String::new()
    };

    let digest = Digest::build(&base, &aur, config.max_lines);
    if let Some(digest) = &digest {
        debug!(
            lines = digest.line_count(),
            dropped = digest.dropped(),
            "digest built"
        );
    }
    Ok(digest)
}
