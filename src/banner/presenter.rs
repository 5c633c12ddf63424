//! Presentation seam.
//!
//! The controller never touches the DOM. Everything visual goes through the
//! [`Presenter`] trait: building and removing the surface, the default
//! visibility toggles, and the page-reload action. A real embedding
//! implements this against its UI toolkit; [`DefaultPresenter`] is the
//! headless built-in used when the embedder supplies none (and the test
//! double).
//!
//! Hosts can override the three visibility transitions individually with
//! [`PresenterHooks`]. A hook, when present, runs *instead of* the
//! corresponding default toggle and receives the presenter so it can drive
//! its own animation. Surface construction (`mount`/`unmount`) is never
//! overridable.
//!
//! ## Design notes
//! - Single UI thread only: the handle is `Rc<RefCell<_>>`, mirroring the
//!   backend handle in [`crate::cookies`].
//! - Hooks are resolved once at build time; "is this set?" is answered by
//!   `Option`, not by runtime capability probing.

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use crate::banner::view::BannerView;

/// A handle to a presenter.
pub type PresenterHandle = Rc<RefCell<dyn Presenter>>;

/// Object-safe presentation interface.
pub trait Presenter {
    /// Builds the banner surface for `view`, initially concealed.
    fn mount(&mut self, view: &BannerView);

    /// Removes the banner surface entirely.
    fn unmount(&mut self);

    /// Whether a surface is currently mounted.
    fn is_mounted(&self) -> bool;

    /// Default reveal transition (the built-in fade-in analog).
    fn reveal(&mut self);

    /// Default conceal transition (the built-in fade-out analog).
    fn conceal(&mut self);

    /// Default category-detail reveal (the built-in slide-down analog).
    fn expand(&mut self);

    /// Reloads the host page. Only ever called from the explicit accept
    /// path.
    fn reload(&mut self);
}

/// A presentation-override callback. Receives the presenter, which plays
/// the role of the rendered container.
pub type PresenterHook = Box<dyn FnMut(&mut dyn Presenter)>;

/// The three optional presentation overrides, resolved at build time.
#[derive(Default)]
pub struct PresenterHooks {
    /// Replaces [`Presenter::reveal`].
    pub on_show: Option<PresenterHook>,
    /// Replaces [`Presenter::conceal`].
    pub on_hide: Option<PresenterHook>,
    /// Replaces [`Presenter::expand`].
    pub on_expand: Option<PresenterHook>,
}

impl Debug for PresenterHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenterHooks")
            .field("on_show", &self.on_show.is_some())
            .field("on_hide", &self.on_hide.is_some())
            .field("on_expand", &self.on_expand.is_some())
            .finish()
    }
}

/// Headless presenter tracking visibility as plain flags. The default when
/// no presenter is supplied, and the reference implementation for tests.
#[derive(Debug, Default)]
pub struct DefaultPresenter {
    mounted: bool,
    visible: bool,
    expanded: bool,
    mounts: u32,
    reloads: u32,
    last_view: Option<BannerView>,
}

impl DefaultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    /// Total number of `mount` calls over this presenter's lifetime.
    pub fn mounts(&self) -> u32 {
        self.mounts
    }

    /// Number of page reloads requested.
    pub fn reloads(&self) -> u32 {
        self.reloads
    }

    pub fn last_view(&self) -> Option<&BannerView> {
        self.last_view.as_ref()
    }
}

impl Presenter for DefaultPresenter {
    fn mount(&mut self, view: &BannerView) {
        self.mounted = true;
        self.mounts += 1;
        self.last_view = Some(view.clone());
    }

    fn unmount(&mut self) {
        self.mounted = false;
        self.visible = false;
        self.expanded = false;
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn reveal(&mut self) {
        self.visible = true;
    }

    fn conceal(&mut self) {
        self.visible = false;
    }

    fn expand(&mut self) {
        self.expanded = true;
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }
}
