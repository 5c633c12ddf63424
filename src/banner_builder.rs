use std::cell::RefCell;
use std::rc::Rc;

use crate::banner::controller::BannerController;
use crate::banner::presenter::{DefaultPresenter, Presenter, PresenterHandle, PresenterHooks};
use crate::banner::{BannerId, ConsentBanner};
use crate::config::{BannerOptions, Settings};
use crate::consent::ConsentStore;
use crate::cookies::{CookieBackendHandle, InMemoryCookieBackend};
use crate::events::{BannerEvent, EventBus};

/// Builder for [`ConsentBanner`].
///
/// `build()` resolves the configuration layers, wires the storage and
/// presentation collaborators, runs the initialization transition (which
/// may immediately render, arm the display delay, or dismiss against an
/// existing consent record), and returns the frozen handle.
pub struct ConsentBannerBuilder {
    options: BannerOptions,
    global: Option<BannerOptions>,
    backend: Option<CookieBackendHandle>,
    presenter: Option<PresenterHandle>,
    hooks: PresenterHooks,
    bus: EventBus,
}

impl ConsentBannerBuilder {
    pub fn new() -> Self {
        ConsentBannerBuilder {
            options: BannerOptions::default(),
            global: None,
            backend: None,
            presenter: None,
            hooks: PresenterHooks::default(),
            bus: EventBus::new(),
        }
    }

    /// Per-call options, the strongest configuration layer.
    pub fn options(mut self, options: BannerOptions) -> Self {
        self.options = options;
        self
    }

    /// Host-global override layer, beneath the per-call options.
    pub fn global_defaults(mut self, global: BannerOptions) -> Self {
        self.global = Some(global);
        self
    }

    /// Cookie backend to persist the consent record through. Defaults to
    /// an [`InMemoryCookieBackend`].
    pub fn backend(mut self, backend: CookieBackendHandle) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Presenter driving the actual UI. Defaults to a headless
    /// [`DefaultPresenter`].
    pub fn presenter(mut self, presenter: PresenterHandle) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Overrides the reveal transition.
    pub fn on_show<F: FnMut(&mut dyn Presenter) + 'static>(mut self, hook: F) -> Self {
        self.hooks.on_show = Some(Box::new(hook));
        self
    }

    /// Overrides the conceal transition.
    pub fn on_hide<F: FnMut(&mut dyn Presenter) + 'static>(mut self, hook: F) -> Self {
        self.hooks.on_hide = Some(Box::new(hook));
        self
    }

    /// Overrides the category-detail reveal.
    pub fn on_expand<F: FnMut(&mut dyn Presenter) + 'static>(mut self, hook: F) -> Self {
        self.hooks.on_expand = Some(Box::new(hook));
        self
    }

    /// Subscribes a listener before initialization runs, so it also sees
    /// the events fired by the initial transition.
    pub fn subscribe<F: FnMut(&BannerEvent) + 'static>(mut self, listener: F) -> Self {
        self.bus.subscribe(Box::new(listener));
        self
    }

    /// Resolves everything and runs the initialization transition.
    pub fn build(self) -> ConsentBanner {
        let settings = Settings::resolve(self.global, self.options);
        let backend = self
            .backend
            .unwrap_or_else(|| Rc::new(RefCell::new(InMemoryCookieBackend::new())));
        let presenter = self
            .presenter
            .unwrap_or_else(|| Rc::new(RefCell::new(DefaultPresenter::new())));
        let store = ConsentStore::for_categories(
            backend,
            settings.cookie_name.clone(),
            &settings.categories,
        );

        let mut controller = BannerController::new(
            BannerId::new(),
            settings,
            store,
            presenter,
            self.hooks,
            self.bus,
        );
        controller.initialize();

        ConsentBanner { inner: controller }
    }
}

impl Default for ConsentBannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::BannerState;
    use std::time::Duration;

    #[test]
    fn default_build_arms_the_standard_delay() {
        let mut banner = ConsentBanner::builder().build();
        assert_eq!(banner.state(), BannerState::PendingShow);
        assert!(banner.poll().unwrap() <= Duration::from_millis(2000));
    }

    #[test]
    fn full_flow_through_the_frozen_handle() {
        let accepted = Rc::new(RefCell::new(false));
        let flag = accepted.clone();

        let mut banner = ConsentBanner::builder()
            .options(BannerOptions::new().delay(0.0))
            .subscribe(move |ev| {
                if ev.name() == "accept" {
                    *flag.borrow_mut() = true;
                }
            })
            .build();

        assert_eq!(banner.state(), BannerState::Summary);
        banner.customize();
        banner.set_checked("marketing", false);
        banner.accept();

        assert_eq!(banner.state(), BannerState::Dismissed);
        assert!(*accepted.borrow());
        assert!(banner.preference("analytics"));
        assert!(!banner.preference("marketing"));
    }

    #[test]
    fn shared_backend_carries_consent_across_instances() {
        let backend: CookieBackendHandle =
            Rc::new(RefCell::new(InMemoryCookieBackend::new()));

        let mut first = ConsentBanner::builder()
            .options(BannerOptions::new().delay(0.0))
            .backend(backend.clone())
            .build();
        first.accept();

        // a new page load with the same backend sees the decision
        let second = ConsentBanner::builder()
            .options(BannerOptions::new().delay(0.0))
            .backend(backend)
            .build();
        assert_eq!(second.state(), BannerState::Dismissed);
        assert!(second.preference("marketing"));
    }

    #[test]
    fn builder_hooks_reach_the_controller() {
        let shown = Rc::new(RefCell::new(0u32));
        let counter = shown.clone();

        let banner = ConsentBanner::builder()
            .options(BannerOptions::new().delay(0.0))
            .on_show(move |_| *counter.borrow_mut() += 1)
            .build();

        assert_eq!(banner.state(), BannerState::Summary);
        assert_eq!(*shown.borrow(), 1);
    }
}
