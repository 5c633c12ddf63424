//! The banner controller state machine.
//!
//! One [`BannerController`] instance drives one banner for one page load:
//! whether the prompt is visible, whether the category detail is expanded,
//! and the two outward actions (persisting consent, reloading the page).
//! The `showing` flag and the resolved settings live on the instance, so
//! independent banners can coexist.
//!
//! # Concurrency model
//! Single-threaded, event-driven. The only suspension point is the display
//! delay between `Hidden`/`PendingShow` and `Summary`, modeled as an armed
//! deadline the host drives through [`BannerController::poll`]. The fire is
//! a one-shot: once the controller has left `PendingShow` (shown, or
//! dismissed by a concurrent code path) a late poll is a no-op. There is no
//! cancellation beyond that guard, and no retry on storage writes.

use std::time::{Duration, Instant};

use crate::banner::presenter::{Presenter, PresenterHandle, PresenterHooks};
use crate::banner::state::BannerState;
use crate::banner::view::BannerView;
use crate::banner::BannerId;
use crate::config::{Settings, ESSENTIAL_CATEGORY};
use crate::consent::ConsentStore;
use crate::events::{BannerEvent, EventBus, EventListener};

pub struct BannerController {
    id: BannerId,
    settings: Settings,
    store: ConsentStore,
    presenter: PresenterHandle,
    hooks: PresenterHooks,
    bus: EventBus,
    state: BannerState,
    /// Re-entry guard: true while a surface minted by this controller is up.
    showing: bool,
    deadline: Option<Instant>,
    view: Option<BannerView>,
}

impl BannerController {
    pub(crate) fn new(
        id: BannerId,
        settings: Settings,
        store: ConsentStore,
        presenter: PresenterHandle,
        hooks: PresenterHooks,
        bus: EventBus,
    ) -> Self {
        Self {
            id,
            settings,
            store,
            presenter,
            hooks,
            bus,
            state: BannerState::Hidden,
            showing: false,
            deadline: None,
            view: None,
        }
    }

    /// Initialization transition. Runs exactly once, from the builder.
    ///
    /// With a valid consent record on file the controller goes straight to
    /// `Dismissed` without rendering; a surface left mounted by an earlier
    /// init is concealed. This path never reloads the page; only a fresh
    /// user decision does.
    pub(crate) fn initialize(&mut self) {
        if self.store.read().is_some() {
            log::debug!("Banner {}: valid consent on file, dismissing", self.id);
            self.state = BannerState::Dismissed;
            if self.presenter.borrow().is_mounted() {
                self.conceal_surface();
            }
            return;
        }

        if self.settings.delay.is_zero() {
            self.render();
        } else {
            self.state = BannerState::PendingShow;
            self.deadline = Some(Instant::now() + self.settings.delay);
        }
    }

    /// Drives the display-delay timer. Returns the remaining delay while
    /// the banner is still pending, `None` otherwise.
    pub fn poll(&mut self) -> Option<Duration> {
        self.poll_at(Instant::now())
    }

    pub(crate) fn poll_at(&mut self, now: Instant) -> Option<Duration> {
        if self.state != BannerState::PendingShow {
            return None;
        }
        let deadline = self.deadline?;
        if now < deadline {
            return Some(deadline - now);
        }
        self.deadline = None;
        self.render();
        None
    }

    /// Forced display: renders immediately regardless of stored consent.
    /// A no-op while a surface is already showing.
    pub fn show(&mut self) {
        if self.showing {
            log::debug!("Banner {}: already showing, ignoring display request", self.id);
            return;
        }
        self.deadline = None;
        self.render();
    }

    /// User activated the customize control: expands the category detail
    /// and permanently disables the control for this rendering instance.
    pub fn customize(&mut self) {
        if self.state != BannerState::Summary {
            return;
        }
        if let Some(view) = self.view.as_mut() {
            view.expanded = true;
            view.advanced_enabled = false;
        }

        if let Some(hook) = self.hooks.on_expand.as_mut() {
            hook(&mut *self.presenter.borrow_mut());
        } else {
            self.presenter.borrow_mut().expand();
        }

        self.state = BannerState::Expanded;
        self.bus.publish(&BannerEvent::Advanced { banner: self.id });
    }

    /// Sets a category checkbox while the banner is rendered. Locked
    /// (essential) entries are ignored.
    pub fn set_checked(&mut self, id: &str, checked: bool) {
        if !self.state.is_rendered() {
            return;
        }
        if let Some(view) = self.view.as_mut() {
            view.set_checked(id, checked);
        }
    }

    /// User activated the accept control: persists the current checkbox
    /// state, removes the surface, reloads if configured, and notifies.
    pub fn accept(&mut self) {
        if !self.state.is_rendered() {
            return;
        }

        let accepted = self
            .view
            .as_ref()
            .map(|v| v.accepted_ids())
            .unwrap_or_default();
        self.store.write(&accepted, self.settings.expires_days);

        self.conceal_surface();
        self.state = BannerState::Dismissed;

        if self.settings.accept_reload {
            self.presenter.borrow_mut().reload();
        }

        self.bus.publish(&BannerEvent::Accept { banner: self.id });
    }

    /// Whether the category identified by `id` is accepted. Essential is
    /// always accepted; without a valid record everything else is not.
    pub fn preference(&self, id: &str) -> bool {
        if id == ESSENTIAL_CATEGORY {
            return true;
        }
        match self.store.read() {
            Some(record) => record.iter().any(|r| r == id),
            None => false,
        }
    }

    /// The full current consent record, or `None` when no valid decision
    /// exists.
    pub fn preferences(&self) -> Option<Vec<String>> {
        self.store.read()
    }

    pub fn subscribe(&mut self, listener: EventListener) {
        self.bus.subscribe(listener);
    }

    pub fn state(&self) -> BannerState {
        self.state
    }

    pub fn id(&self) -> BannerId {
        self.id
    }

    /// The live render model, while a surface is up.
    pub fn view(&self) -> Option<&BannerView> {
        self.view.as_ref()
    }

    fn render(&mut self) {
        if self.showing {
            return;
        }

        let prior = self.store.read();
        let view = BannerView::build(&self.settings, prior.as_deref());
        self.presenter.borrow_mut().mount(&view);

        if let Some(hook) = self.hooks.on_show.as_mut() {
            hook(&mut *self.presenter.borrow_mut());
        } else {
            self.presenter.borrow_mut().reveal();
        }

        self.view = Some(view);
        self.showing = true;
        self.state = BannerState::Summary;
        self.bus.publish(&BannerEvent::Show { banner: self.id });
    }

    fn conceal_surface(&mut self) {
        if let Some(hook) = self.hooks.on_hide.as_mut() {
            hook(&mut *self.presenter.borrow_mut());
        } else {
            self.presenter.borrow_mut().conceal();
        }
        self.presenter.borrow_mut().unmount();

        self.showing = false;
        self.view = None;
        self.bus.publish(&BannerEvent::Hide { banner: self.id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::presenter::DefaultPresenter;
    use crate::config::BannerOptions;
    use crate::cookies::{CookieBackend, CookieBackendHandle, InMemoryCookieBackend};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Rig {
        controller: BannerController,
        presenter: Rc<RefCell<DefaultPresenter>>,
        backend: CookieBackendHandle,
        events: Rc<RefCell<Vec<&'static str>>>,
    }

    fn rig(opts: BannerOptions) -> Rig {
        rig_with(opts, PresenterHooks::default(), None)
    }

    fn rig_with(
        opts: BannerOptions,
        hooks: PresenterHooks,
        backend: Option<CookieBackendHandle>,
    ) -> Rig {
        let settings = Settings::resolve(None, opts);
        let backend =
            backend.unwrap_or_else(|| Rc::new(RefCell::new(InMemoryCookieBackend::new())));
        let presenter = Rc::new(RefCell::new(DefaultPresenter::new()));
        let store = ConsentStore::for_categories(
            backend.clone(),
            settings.cookie_name.clone(),
            &settings.categories,
        );

        let events = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let sink = events.clone();
        bus.subscribe(Box::new(move |ev| sink.borrow_mut().push(ev.name())));

        let mut controller = BannerController::new(
            BannerId::new(),
            settings,
            store,
            presenter.clone(),
            hooks,
            bus,
        );
        controller.initialize();

        Rig {
            controller,
            presenter,
            backend,
            events,
        }
    }

    fn immediate() -> BannerOptions {
        BannerOptions::new().delay(0.0)
    }

    #[test]
    fn renders_immediately_without_prior_cookie_and_zero_delay() {
        let r = rig(immediate());

        assert_eq!(r.controller.state(), BannerState::Summary);
        assert!(r.presenter.borrow().is_mounted());
        assert!(r.presenter.borrow().visible());

        let view = r.controller.view().unwrap();
        for id in ["preferences", "analytics", "marketing"] {
            assert!(view.entry(id).unwrap().checked, "{id} should default checked");
        }
        let essential = view.entry("essential").unwrap();
        assert!(essential.checked && essential.locked);

        assert_eq!(*r.events.borrow(), vec!["show"]);
    }

    #[test]
    fn arms_delay_timer_when_configured() {
        let mut r = rig(BannerOptions::new().delay(2000.0));
        assert_eq!(r.controller.state(), BannerState::PendingShow);
        assert!(!r.presenter.borrow().is_mounted());

        // before the deadline: still pending, remaining delay reported
        let now = Instant::now();
        let remaining = r.controller.poll_at(now).unwrap();
        assert!(remaining <= Duration::from_millis(2000));
        assert_eq!(r.controller.state(), BannerState::PendingShow);

        // past the deadline: renders
        assert!(r.controller.poll_at(now + Duration::from_secs(3)).is_none());
        assert_eq!(r.controller.state(), BannerState::Summary);
        assert!(r.presenter.borrow().visible());
    }

    #[test]
    fn late_timer_fire_after_dismissal_is_a_noop() {
        let mut r = rig(BannerOptions::new().delay(2000.0));

        // Forced display pre-empts the timer, then the user accepts.
        r.controller.show();
        r.controller.accept();
        assert_eq!(r.controller.state(), BannerState::Dismissed);
        let mounts = r.presenter.borrow().mounts();

        // The armed deadline firing now must not resurrect the banner.
        assert!(r
            .controller
            .poll_at(Instant::now() + Duration::from_secs(10))
            .is_none());
        assert_eq!(r.controller.state(), BannerState::Dismissed);
        assert_eq!(r.presenter.borrow().mounts(), mounts);
    }

    #[test]
    fn forced_display_is_idempotent_while_showing() {
        let mut r = rig(immediate());
        assert_eq!(r.presenter.borrow().mounts(), 1);

        r.controller.show();
        r.controller.show();
        assert_eq!(r.presenter.borrow().mounts(), 1);
        assert_eq!(*r.events.borrow(), vec!["show"]);
    }

    #[test]
    fn customize_is_one_way_and_disables_the_control() {
        let mut r = rig(immediate());
        r.controller.customize();

        assert_eq!(r.controller.state(), BannerState::Expanded);
        assert!(r.presenter.borrow().expanded());
        let view = r.controller.view().unwrap();
        assert!(view.expanded);
        assert!(!view.advanced_enabled);

        // a second activation changes nothing
        r.controller.customize();
        assert_eq!(*r.events.borrow(), vec!["show", "advanced"]);
    }

    #[test]
    fn accept_persists_checkbox_state_and_dismisses() {
        let mut r = rig(immediate());
        r.controller.set_checked("marketing", false);
        r.controller.accept();

        assert_eq!(r.controller.state(), BannerState::Dismissed);
        assert!(!r.presenter.borrow().is_mounted());
        assert_eq!(r.presenter.borrow().reloads(), 0);

        assert_eq!(
            r.controller.preferences(),
            Some(vec![
                "essential".to_string(),
                "preferences".to_string(),
                "analytics".to_string()
            ])
        );
        assert!(!r.controller.preference("marketing"));
        assert!(r.controller.preference("analytics"));

        // the stored payload itself omits the rejected category
        let raw = r.backend.borrow().get("cookieControlPrefs").unwrap();
        assert!(!raw.contains("marketing"));

        assert_eq!(*r.events.borrow(), vec!["show", "hide", "accept"]);
    }

    #[test]
    fn accept_reload_triggers_page_reload() {
        let mut r = rig(immediate().accept_reload(true));
        r.controller.accept();
        assert_eq!(r.presenter.borrow().reloads(), 1);
    }

    #[test]
    fn accept_without_rendered_surface_is_ignored() {
        let mut r = rig(BannerOptions::new().delay(5000.0));
        r.controller.accept();
        assert_eq!(r.controller.state(), BannerState::PendingShow);
        assert!(r.controller.preferences().is_none());
    }

    #[test]
    fn prior_consent_dismisses_without_rendering_or_reloading() {
        let backend: CookieBackendHandle =
            Rc::new(RefCell::new(InMemoryCookieBackend::new()));
        backend
            .borrow_mut()
            .set(
                "cookieControlPrefs",
                "[\"essential\",\"analytics\"]",
                Duration::from_secs(3600),
            )
            .unwrap();

        // accept_reload is set, but the implicit path must never reload
        let r = rig_with(
            immediate().accept_reload(true),
            PresenterHooks::default(),
            Some(backend),
        );

        assert_eq!(r.controller.state(), BannerState::Dismissed);
        assert_eq!(r.presenter.borrow().mounts(), 0);
        assert_eq!(r.presenter.borrow().reloads(), 0);
        assert!(r.events.borrow().is_empty());

        assert!(r.controller.preference("analytics"));
        assert!(!r.controller.preference("marketing"));
        assert!(r.controller.preference("essential"));
    }

    #[test]
    fn double_init_conceals_the_redundant_surface() {
        let backend: CookieBackendHandle =
            Rc::new(RefCell::new(InMemoryCookieBackend::new()));

        // First instance renders (no consent on file yet) and the user
        // accepts through it only after the second init starts... simulate
        // the rare overlap by leaving its surface mounted.
        let first = rig_with(immediate(), PresenterHooks::default(), Some(backend.clone()));
        assert!(first.presenter.borrow().is_mounted());

        // Consent lands on disk before the second init reads it.
        backend
            .borrow_mut()
            .set(
                "cookieControlPrefs",
                "[\"essential\"]",
                Duration::from_secs(3600),
            )
            .unwrap();

        // Second instance shares the presenter and finds the record.
        let settings = Settings::resolve(None, immediate());
        let store = ConsentStore::for_categories(
            backend.clone(),
            settings.cookie_name.clone(),
            &settings.categories,
        );
        let mut second = BannerController::new(
            BannerId::new(),
            settings,
            store,
            first.presenter.clone(),
            PresenterHooks::default(),
            EventBus::new(),
        );
        second.initialize();

        assert_eq!(second.state(), BannerState::Dismissed);
        assert!(!first.presenter.borrow().is_mounted());
        assert_eq!(first.presenter.borrow().reloads(), 0);
    }

    #[test]
    fn essential_is_accepted_before_any_decision_exists() {
        let r = rig(BannerOptions::new().delay(5000.0));
        assert!(r.controller.preference("essential"));
        assert!(!r.controller.preference("analytics"));
        assert!(r.controller.preferences().is_none());
    }

    #[test]
    fn forced_display_after_dismissal_prechecks_from_the_record() {
        let mut r = rig(immediate());
        r.controller.set_checked("marketing", false);
        r.controller.set_checked("preferences", false);
        r.controller.accept();

        // re-open: checkboxes now mirror the stored record, not defaults
        r.controller.show();
        assert_eq!(r.controller.state(), BannerState::Summary);
        let view = r.controller.view().unwrap();
        assert!(view.entry("analytics").unwrap().checked);
        assert!(!view.entry("marketing").unwrap().checked);
        assert!(!view.entry("preferences").unwrap().checked);
    }

    #[test]
    fn hooks_replace_the_default_toggles() {
        let fired = Rc::new(RefCell::new(Vec::new()));

        let mut hooks = PresenterHooks::default();
        for (name, slot) in [("show", &mut hooks.on_show), ("hide", &mut hooks.on_hide)] {
            let fired = fired.clone();
            *slot = Some(Box::new(move |_p: &mut dyn Presenter| {
                fired.borrow_mut().push(name)
            }));
        }

        let mut r = rig_with(immediate(), hooks, None);

        // the on_show hook ran instead of the default reveal
        assert!(r.presenter.borrow().is_mounted());
        assert!(!r.presenter.borrow().visible());
        assert_eq!(*fired.borrow(), vec!["show"]);

        r.controller.accept();
        assert_eq!(*fired.borrow(), vec!["show", "hide"]);
        assert!(!r.presenter.borrow().is_mounted());
    }

    #[test]
    fn expand_hook_replaces_default_expand() {
        let fired = Rc::new(RefCell::new(0u32));
        let mut hooks = PresenterHooks::default();
        let counter = fired.clone();
        hooks.on_expand = Some(Box::new(move |_| *counter.borrow_mut() += 1));

        let mut r = rig_with(immediate(), hooks, None);
        r.controller.customize();

        assert_eq!(*fired.borrow(), 1);
        assert!(!r.presenter.borrow().expanded());
        assert_eq!(r.controller.state(), BannerState::Expanded);
    }

    #[test]
    fn checkbox_edits_are_ignored_while_not_rendered() {
        let mut r = rig(BannerOptions::new().delay(5000.0));
        r.controller.set_checked("marketing", false);
        assert!(r.controller.view().is_none());
    }
}
