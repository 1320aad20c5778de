mod backends;
mod deliver;

use std::path::Path;
use std::time::Duration;

use crate::error::NotifyError;
use crate::types::Urgency;

#[cfg(target_os = "linux")]
pub use backends::{DesktopBackend, DesktopHandle};
pub use backends::{LogBackend, LogHandle};
pub use deliver::{Deliverer, Delivery};

pub const TITLE: &str = "New updates for Arch Linux available!";

/// Plus long délai d'expiration transmissible : le serveur le reçoit en
/// millisecondes sur un `i32`.
pub const MAX_TIMEOUT: Duration = Duration::from_millis(2_147_483_647);

/// Délai d'expiration en millisecondes, borné à [`MAX_TIMEOUT`].
#[must_use]
pub fn expire_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.min(MAX_TIMEOUT).as_millis()).unwrap_or(i32::MAX.unsigned_abs())
}

/// Contenu affiché par une notification.
#[derive(Clone, Copy, Debug)]
pub struct Content<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub icon: Option<&'a Path>,
}

/// Liaison vers un serveur de notifications. Le handle appartient à
/// l'appelant et ne repasse que par le backend qui l'a créé.
pub trait NotifyBackend {
    type Handle;

    fn init(&mut self, appname: &str);
    fn is_initialized(&self) -> bool;
    fn uninit(&mut self);

    fn create(&mut self, content: &Content<'_>) -> Self::Handle;
    fn update(&mut self, handle: &mut Self::Handle, content: &Content<'_>);

    fn set_timeout(&mut self, handle: &mut Self::Handle, timeout: Duration);
    fn set_category(&mut self, handle: &mut Self::Handle, category: &str);
    fn set_urgency(&mut self, handle: &mut Self::Handle, urgency: Urgency);

    /// # Errors
    ///
    /// Returns [`NotifyError::Show`] when the notification server rejects it.
    fn show(&mut self, handle: &mut Self::Handle) -> Result<(), NotifyError>;

    /// # Errors
    ///
    /// Returns [`NotifyError::Close`] when the close request fails.
    fn close(&mut self, handle: &mut Self::Handle) -> Result<(), NotifyError>;
}
