use std::time::Duration;

use tracing::info;

use crate::error::NotifyError;
use crate::types::Urgency;

use super::{Content, NotifyBackend};

#[cfg(target_os = "linux")]
pub use linux::{DesktopBackend, DesktopHandle};

/// Backend de simulation : journalise ce qui serait affiché, réussit toujours.
#[derive(Debug, Default)]
pub struct LogBackend {
    appname: Option<String>,
    next_id: u32,
}

#[derive(Debug)]
pub struct LogHandle {
    id: u32,
    title: String,
    body: String,
    timeout: Duration,
    category: String,
    urgency: Urgency,
}

impl NotifyBackend for LogBackend {
    type Handle = LogHandle;

    fn init(&mut self, appname: &str) {
        self.appname = Some(appname.to_string());
    }

    fn is_initialized(&self) -> bool {
        self.appname.is_some()
    }

    fn uninit(&mut self) {
        self.appname = None;
    }

    fn create(&mut self, content: &Content<'_>) -> LogHandle {
        self.next_id += 1;
        LogHandle {
            id: self.next_id,
            title: content.title.to_string(),
            body: content.body.to_string(),
            timeout: Duration::ZERO,
            category: String::new(),
            urgency: Urgency::default(),
        }
    }

    fn update(&mut self, handle: &mut LogHandle, content: &Content<'_>) {
        content.title.clone_into(&mut handle.title);
        content.body.clone_into(&mut handle.body);
    }

    fn set_timeout(&mut self, handle: &mut LogHandle, timeout: Duration) {
        handle.timeout = timeout;
    }

    fn set_category(&mut self, handle: &mut LogHandle, category: &str) {
        category.clone_into(&mut handle.category);
    }

    fn set_urgency(&mut self, handle: &mut LogHandle, urgency: Urgency) {
        handle.urgency = urgency;
    }

    fn show(&mut self, handle: &mut LogHandle) -> Result<(), NotifyError> {
        info!(
            id = handle.id,
            appname = self.appname.as_deref().unwrap_or_default(),
            title = %handle.title,
            timeout = %humantime::format_duration(handle.timeout),
            category = %handle.category,
            urgency = %handle.urgency,
            "dry-run: would show notification:\n{}",
            handle.body
        );
        Ok(())
    }

    fn close(&mut self, handle: &mut LogHandle) -> Result<(), NotifyError> {
        info!(id = handle.id, "dry-run: would close notification");
        Ok(())
    }
}

#[cfg(target_os = "linux")]
mod linux {
    use std::time::Duration;

    use notify_rust::{
        Hint, Notification, NotificationHandle, Timeout as LibTimeout, Urgency as LibUrgency,
    };
    use tracing::trace;

    use crate::error::NotifyError;
    use crate::types::Urgency;

    use super::super::{Content, NotifyBackend, expire_millis};

    /// Serveur de notifications freedesktop via D-Bus.
    #[derive(Debug, Default)]
    pub struct DesktopBackend {
        appname: Option<String>,
    }

    /// Notification en construction et, une fois affichée, son id côté
    /// serveur pour que les affichages suivants la remplacent.
    pub struct DesktopHandle {
        notification: Notification,
        shown: Option<NotificationHandle>,
    }

    impl NotifyBackend for DesktopBackend {
        type Handle = DesktopHandle;

        fn init(&mut self, appname: &str) {
            trace!(appname, "notification backend initialised");
            self.appname = Some(appname.to_string());
        }

        fn is_initialized(&self) -> bool {
            self.appname.is_some()
        }

        fn uninit(&mut self) {
            trace!("notification backend released");
            self.appname = None;
        }

        fn create(&mut self, content: &Content<'_>) -> DesktopHandle {
            let mut notification = Notification::new();
            if let Some(appname) = &self.appname {
                notification.appname(appname);
            }
            let mut handle = DesktopHandle {
                notification,
                shown: None,
            };
            apply_content(&mut handle.notification, content);
            handle
        }

        fn update(&mut self, handle: &mut DesktopHandle, content: &Content<'_>) {
            apply_content(&mut handle.notification, content);
        }

        fn set_timeout(&mut self, handle: &mut DesktopHandle, timeout: Duration) {
            handle
                .notification
                .timeout(LibTimeout::Milliseconds(expire_millis(timeout)));
        }

        fn set_category(&mut self, handle: &mut DesktopHandle, category: &str) {
            handle
                .notification
                .hint(Hint::Category(category.to_string()));
        }

        fn set_urgency(&mut self, handle: &mut DesktopHandle, urgency: Urgency) {
            handle.notification.urgency(map_urgency(urgency));
        }

        fn show(&mut self, handle: &mut DesktopHandle) -> Result<(), NotifyError> {
            if let Some(shown) = &handle.shown {
                handle.notification.id(shown.id());
            }
            let shown = handle
                .notification
                .show()
                .map_err(|err| NotifyError::Show {
                    message: err.to_string(),
                })?;
            trace!(id = shown.id(), "notification accepted by server");
            handle.shown = Some(shown);
            Ok(())
        }

        fn close(&mut self, handle: &mut DesktopHandle) -> Result<(), NotifyError> {
            // notify-rust sends CloseNotification without reporting errors.
            if let Some(shown) = handle.shown.take() {
                shown.close();
            }
            Ok(())
        }
    }

    fn apply_content(notification: &mut Notification, content: &Content<'_>) {
        let icon = content
            .icon
            .map(|icon| icon.to_string_lossy().into_owned())
            .unwrap_or_default();
        notification
            .summary(content.title)
            .body(content.body)
            .icon(&icon);
    }

    const fn map_urgency(urgency: Urgency) -> LibUrgency {
        match urgency {
            Urgency::Low => LibUrgency::Low,
            Urgency::Normal => LibUrgency::Normal,
            Urgency::Critical => LibUrgency::Critical,
        }
    }
}
