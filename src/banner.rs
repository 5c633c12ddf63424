// src/banner.rs
//! Banner system: [`ConsentBanner`], [`BannerController`], and [`BannerId`].

pub mod controller;
pub mod presenter;
pub mod state;
pub mod view;

use std::fmt::Display;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::banner_builder::ConsentBannerBuilder;
use crate::events::EventListener;
pub use controller::BannerController;
pub use state::BannerState;
pub use view::{BannerView, CategoryEntry};

/// A unique identifier for a banner instance, represented as a UUID.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BannerId(Uuid);

impl BannerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BannerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BannerId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for BannerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The frozen handle to a banner instance.
///
/// Built once through [`ConsentBanner::builder`]; after construction the
/// only reachable surface is the method set below. Settings and internal
/// state are private and cannot be replaced or patched from outside.
///
/// The host's UI layer wires its click handlers to [`accept`](Self::accept),
/// [`customize`](Self::customize), and [`set_checked`](Self::set_checked),
/// drives the display delay through [`poll`](Self::poll), and queries
/// consent through [`preference`](Self::preference).
pub struct ConsentBanner {
    pub(crate) inner: BannerController,
}

impl ConsentBanner {
    /// Entry point to start building a banner.
    pub fn builder() -> ConsentBannerBuilder {
        ConsentBannerBuilder::new()
    }

    /// Forced display: renders immediately regardless of stored consent.
    /// No-op while already showing.
    pub fn show(&mut self) {
        self.inner.show()
    }

    /// Drives the display-delay timer; returns the remaining delay while
    /// the banner is still pending.
    pub fn poll(&mut self) -> Option<Duration> {
        self.inner.poll()
    }

    /// Expands the category detail list (one-way).
    pub fn customize(&mut self) {
        self.inner.customize()
    }

    /// Persists the current checkbox state and dismisses the banner.
    pub fn accept(&mut self) {
        self.inner.accept()
    }

    /// Sets a category checkbox while the banner is rendered.
    pub fn set_checked(&mut self, id: &str, checked: bool) {
        self.inner.set_checked(id, checked)
    }

    /// Whether the category identified by `id` is currently accepted.
    pub fn preference(&self, id: &str) -> bool {
        self.inner.preference(id)
    }

    /// The full current consent record, or `None` when no valid decision
    /// exists.
    pub fn preferences(&self) -> Option<Vec<String>> {
        self.inner.preferences()
    }

    /// Subscribes to the banner's advisory notifications.
    pub fn subscribe(&mut self, listener: EventListener) {
        self.inner.subscribe(listener)
    }

    pub fn state(&self) -> BannerState {
        self.inner.state()
    }

    pub fn id(&self) -> BannerId {
        self.inner.id()
    }

    /// The live render model, while a surface is up.
    pub fn view(&self) -> Option<&BannerView> {
        self.inner.view()
    }
}
