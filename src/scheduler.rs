//! Pilote le cycle interrogation, agrégation, notification.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::Result;
use crate::config::{Config, RunMode};
use crate::digest;
use crate::exec::CommandRunner;
use crate::notify::{Deliverer, Delivery, NotifyBackend};
use crate::util::time::fmt_local_after;

/// Ce qu'a fait un cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub delivery: Delivery,
    /// Temps déjà passé dans ce cycle à attendre la fermeture forcée.
    pub offset: Duration,
}

pub struct Scheduler<R, B: NotifyBackend> {
    config: Config,
    runner: R,
    deliverer: Deliverer<B>,
}

impl<R: CommandRunner, B: NotifyBackend> Scheduler<R, B> {
    pub fn new(config: Config, runner: R, backend: B) -> Self {
        let deliverer = Deliverer::new(backend, config.notify.clone());
        Self {
            config,
            runner,
            deliverer,
        }
    }

    pub const fn deliverer(&self) -> &Deliverer<B> {
        &self.deliverer
    }

    /// Enchaîne les cycles jusqu'à un échec de lancement, ou un seul cycle
    /// hors boucle.
    ///
    /// # Errors
    ///
    /// Returns the spawn failure that ended the loop.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let span = info_span!("cycle", id = %Uuid::new_v4());
            let report = self.run_cycle().instrument(span).await?;

            let Some(wait) = self.next_sleep(report.offset) else {
                debug!("one-shot mode, exiting");
                return Ok(());
            };
            info!(
                next_run = %fmt_local_after(wait),
                "next check in {}",
                humantime::format_duration(wait)
            );
            sleep(wait).await;
        }
    }

    /// Interroge les commandes, livre le digest, applique la fermeture forcée.
    ///
    /// # Errors
    ///
    /// Returns an error when a listing command cannot be spawned.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let mut offset = Duration::ZERO;

        let digest = digest::collect(&self.runner, &self.config).await?;
        if digest.is_none() {
            info!("no updates found");
        }
        let delivery = self.deliverer.deliver(digest.as_ref());

        if delivery.is_shown() {
            if let Some(delay) = self.config.mode.force_close() {
                debug!(
                    "closing notification in {} (deducted from the loop interval)",
                    humantime::format_duration(delay)
                );
                sleep(delay).await;
                self.deliverer.force_close();
                offset = delay;
            }
        }

        Ok(CycleReport { delivery, offset })
    }

    /// Attente avant le cycle suivant, ou `None` hors boucle.
    #[must_use]
    pub fn next_sleep(&self, offset: Duration) -> Option<Duration> {
        match self.config.mode {
            RunMode::Once => None,
            RunMode::Loop { interval, .. } => Some(interval.saturating_sub(offset)),
        }
    }
}
