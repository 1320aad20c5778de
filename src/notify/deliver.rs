use tracing::{debug, error, info, warn};

use crate::config::NotifySettings;
use crate::digest::Digest;
use crate::error::NotifyError;

use super::{Content, NotifyBackend, TITLE};

/// Résultat d'un appel à [`Deliverer::deliver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Le digest est affiché.
    Shown,
    /// Aucune mise à jour ; la notification d'un cycle précédent est fermée.
    ClosedStale,
    /// Aucune mise à jour et rien à l'écran.
    Idle,
    /// Les deux tentatives d'affichage ont échoué.
    Failed(NotifyError),
}

impl Delivery {
    #[must_use]
    pub const fn is_shown(&self) -> bool {
        matches!(self, Self::Shown)
    }
}

/// Détient l'unique handle de notification du processus.
pub struct Deliverer<B: NotifyBackend> {
    backend: B,
    settings: NotifySettings,
    handle: Option<B::Handle>,
}

impl<B: NotifyBackend> Deliverer<B> {
    pub const fn new(backend: B, settings: NotifySettings) -> Self {
        Self {
            backend,
            settings,
            handle: None,
        }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Affiche `digest`, ou ferme la notification périmée s'il n'y en a pas.
    ///
    /// Un affichage refusé est retenté une seule fois après réinitialisation
    /// du backend ; un second refus donne [`Delivery::Failed`].
    pub fn deliver(&mut self, digest: Option<&Digest>) -> Delivery {
        match digest {
            Some(digest) => self.show(digest),
            None => self.close_stale(),
        }
    }

    /// Ferme la notification en avance en gardant le handle, que le cycle
    /// suivant met à jour sur place.
    pub fn force_close(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            match self.backend.close(handle) {
                Ok(()) => debug!("notification closed"),
                Err(err) => warn!(error = %err, "failed to close notification"),
            }
        }
    }

    fn close_stale(&mut self) -> Delivery {
        let Some(mut handle) = self.handle.take() else {
            return Delivery::Idle;
        };
        debug!("previous notification found, closing it in case it is still open");
        match self.backend.close(&mut handle) {
            Ok(()) => debug!("notification closed"),
            Err(err) => warn!(error = %err, "failed to close stale notification"),
        }
        Delivery::ClosedStale
    }

    fn show(&mut self, digest: &Digest) -> Delivery {
        if !self.backend.is_initialized() {
            self.backend.init(&self.settings.appname);
        }

        let body = digest.body();
        let icon = self.settings.icon.clone();
        let content = Content {
            title: TITLE,
            body: &body,
            icon: icon.as_deref(),
        };

        let Err(err) = self.attempt(&content) else {
            info!(lines = digest.line_count(), "notification shown");
            return Delivery::Shown;
        };
        warn!(
            error = %err,
            "notification failed, re-initialising the backend in case the desktop session restarted"
        );
        self.handle = None;
        self.backend.uninit();
        self.backend.init(&self.settings.appname);

        match self.attempt(&content) {
            Ok(()) => {
                info!(lines = digest.line_count(), "notification shown after retry");
                Delivery::Shown
            }
            Err(err) => {
                error!(error = %err, "notification failed again, giving up for this cycle");
                Delivery::Failed(err)
            }
        }
    }

    /// Crée ou met à jour le handle, applique les réglages, affiche une fois.
    fn attempt(&mut self, content: &Content<'_>) -> Result<(), NotifyError> {
        let handle = match self.handle.take() {
            Some(mut handle) => {
                self.backend.update(&mut handle, content);
                handle
            }
            None => self.backend.create(content),
        };
        let handle = self.handle.insert(handle);
        self.backend.set_timeout(handle, self.settings.timeout);
        self.backend.set_category(handle, &self.settings.category);
        self.backend.set_urgency(handle, self.settings.urgency);
        self.backend.show(handle)
    }
}
