//! Banner notification events.
//!
//! The controller emits advisory notifications to the host page on a shared
//! event bus. Hosts may subscribe, but the controller never depends on any
//! response; publishing with zero subscribers is a no-op.
//!
//! Events carry no payload beyond the [`BannerId`](crate::banner::BannerId)
//! of the controller instance that fired them.

use std::fmt::Display;

use crate::banner::BannerId;

/// Events emitted by a banner controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerEvent {
    /// The banner surface became visible.
    Show { banner: BannerId },
    /// The detailed category list was expanded.
    Advanced { banner: BannerId },
    /// A consent decision was persisted.
    Accept { banner: BannerId },
    /// The banner surface was concealed.
    Hide { banner: BannerId },
}

impl BannerEvent {
    /// The signal name as exposed on a host page's event surface.
    pub fn name(&self) -> &'static str {
        match self {
            BannerEvent::Show { .. } => "show",
            BannerEvent::Advanced { .. } => "advanced",
            BannerEvent::Accept { .. } => "accept",
            BannerEvent::Hide { .. } => "hide",
        }
    }

    /// The controller instance that fired the event.
    pub fn banner(&self) -> BannerId {
        match self {
            BannerEvent::Show { banner }
            | BannerEvent::Advanced { banner }
            | BannerEvent::Accept { banner }
            | BannerEvent::Hide { banner } => *banner,
        }
    }
}

impl Display for BannerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A subscriber callback on the banner event bus.
pub type EventListener = Box<dyn FnMut(&BannerEvent)>;

/// Single-threaded fan-out bus for [`BannerEvent`]s.
///
/// The banner runs on the UI thread only, so this is a plain list of boxed
/// callbacks rather than a channel.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<EventListener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    /// Delivers `event` to every subscriber. If nobody listens, that's fine.
    pub fn publish(&mut self, event: &BannerEvent) {
        for listener in self.listeners.iter_mut() {
            listener(event);
        }
    }
}
