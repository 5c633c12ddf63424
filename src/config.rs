//! Banner configuration.
//!
//! Configuration is layered: built-in defaults, then an optional host-global
//! [`BannerOptions`] override set, then the per-call [`BannerOptions`]. The
//! result is a [`Settings`] value resolved once at build time and immutable
//! for the lifetime of the banner instance.
//!
//! All ingestion is defensive: malformed category entries are skipped, the
//! display delay is coerced to a non-negative number of milliseconds, the
//! consent TTL is clamped to `0..=730` days, and the cookie name is reduced
//! to the cookie-token-safe character range. None of these corrections are
//! surfaced to the host.
//!
//! # Example
//! ```rust
//! use consent_banner::config::{BannerOptions, Settings};
//!
//! let opts = BannerOptions::new()
//!     .title("Cookies & privacy")
//!     .delay(0.0)
//!     .expires(30.0);
//! let settings = Settings::resolve(None, opts);
//! assert_eq!(settings.expires_days, 30);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consent::store::sanitize_cookie_name;

/// Identifier of the always-accepted, non-deselectable category.
pub const ESSENTIAL_CATEGORY: &str = "essential";

/// Cookie name used when the configured name sanitizes to nothing.
pub const DEFAULT_COOKIE_NAME: &str = "cookieControlPrefs";

const DEFAULT_TITLE: &str = "Cookies & privacy";
const DEFAULT_SUBTITLE: &str = "Select cookies to accept";
const DEFAULT_MESSAGE: &str = "Cookies enable you to use shopping carts and to personalize your experience on our sites, tell us which parts of our websites people have visited, help us measure the effectiveness of ads and web searches, and give us insights into user behaviour so we can improve our communications and products.";
const DEFAULT_ACCEPT_LABEL: &str = "Accept cookies";
const DEFAULT_ADVANCED_LABEL: &str = "Customize cookies";
const DEFAULT_DELAY_MS: u64 = 2000;
const DEFAULT_TTL_DAYS: u32 = 30;

/// Upper bound for the consent TTL, in days.
pub const MAX_TTL_DAYS: u32 = 730;

/// A cookie category the user can separately accept or reject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookieCategory {
    /// Display name shown next to the checkbox.
    pub label: String,
    /// Stable identifier; this is the token persisted in the consent record.
    pub id: String,
    /// Explanatory text for the category.
    #[serde(default)]
    pub description: String,
    /// Pre-selection state when no prior consent record exists.
    #[serde(default)]
    pub checked: bool,
}

impl CookieCategory {
    pub fn new<S: Into<String>>(label: S, id: S, description: S, checked: bool) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
            description: description.into(),
            checked,
        }
    }

    /// A category without a display name or identifier cannot be rendered or
    /// persisted and is skipped at ingestion.
    pub fn is_valid(&self) -> bool {
        !self.label.is_empty() && !self.id.is_empty()
    }

    pub fn is_essential(&self) -> bool {
        self.id == ESSENTIAL_CATEGORY
    }
}

/// The built-in category set, used when the host supplies none (or only
/// invalid entries).
pub fn default_categories() -> Vec<CookieCategory> {
    vec![
        CookieCategory::new(
            "Essential",
            "essential",
            "These are cookies that are essential for the website to work correctly.",
            true,
        ),
        CookieCategory::new(
            "Site Preferences",
            "preferences",
            "These are cookies that are related to your site preferences, e.g. remembering your username, site colours, etc.",
            true,
        ),
        CookieCategory::new(
            "Analytics",
            "analytics",
            "Cookies related to site visits, browser types, etc.",
            true,
        ),
        CookieCategory::new(
            "Marketing",
            "marketing",
            "Cookies related to marketing, e.g. newsletters, social media, etc",
            true,
        ),
    ]
}

/// Host-supplied banner options. Every field is optional; unset fields fall
/// through to the global override layer and then to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerOptions {
    pub cookie_types: Option<Vec<CookieCategory>>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub message: Option<String>,
    /// Display delay in milliseconds.
    pub delay: Option<f64>,
    /// Consent TTL in days.
    pub expires: Option<f64>,
    pub cookie_name: Option<String>,
    /// Reload the page after the user accepts.
    pub accept_reload: Option<bool>,
    pub accept_btn_label: Option<String>,
    pub advanced_btn_label: Option<String>,
}

impl BannerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn map(mut self, f: impl FnOnce(&mut BannerOptions)) -> Self {
        f(&mut self);
        self
    }

    pub fn cookie_types(self, types: Vec<CookieCategory>) -> Self {
        self.map(|o| o.cookie_types = Some(types))
    }
    pub fn title<S: Into<String>>(self, s: S) -> Self {
        self.map(|o| o.title = Some(s.into()))
    }
    pub fn subtitle<S: Into<String>>(self, s: S) -> Self {
        self.map(|o| o.subtitle = Some(s.into()))
    }
    pub fn message<S: Into<String>>(self, s: S) -> Self {
        self.map(|o| o.message = Some(s.into()))
    }
    pub fn delay(self, ms: f64) -> Self {
        self.map(|o| o.delay = Some(ms))
    }
    pub fn expires(self, days: f64) -> Self {
        self.map(|o| o.expires = Some(days))
    }
    pub fn cookie_name<S: Into<String>>(self, s: S) -> Self {
        self.map(|o| o.cookie_name = Some(s.into()))
    }
    pub fn accept_reload(self, on: bool) -> Self {
        self.map(|o| o.accept_reload = Some(on))
    }
    pub fn accept_btn_label<S: Into<String>>(self, s: S) -> Self {
        self.map(|o| o.accept_btn_label = Some(s.into()))
    }
    pub fn advanced_btn_label<S: Into<String>>(self, s: S) -> Self {
        self.map(|o| o.advanced_btn_label = Some(s.into()))
    }
}

/// Resolved, immutable banner settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub categories: Vec<CookieCategory>,
    pub title: String,
    pub subtitle: String,
    pub message: String,
    pub accept_label: String,
    pub advanced_label: String,
    /// Delay before the banner is revealed. Zero means immediately.
    pub delay: Duration,
    /// Consent TTL in whole days, clamped to `0..=MAX_TTL_DAYS`.
    pub expires_days: u32,
    /// Sanitized name of the persisted cookie.
    pub cookie_name: String,
    pub accept_reload: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::resolve(None, BannerOptions::default())
    }
}

impl Settings {
    /// Resolves the three configuration layers into final settings:
    /// built-in defaults, then `global` overrides, then per-call `opts`.
    pub fn resolve(global: Option<BannerOptions>, opts: BannerOptions) -> Self {
        let global = global.unwrap_or_default();
        let pick = |a: Option<String>, b: Option<String>| a.or(b);

        let categories = validate_categories(opts.cookie_types.or(global.cookie_types));
        let delay_ms = opts
            .delay
            .or(global.delay)
            .map(coerce_delay_ms)
            .unwrap_or(DEFAULT_DELAY_MS);
        let expires_days = opts
            .expires
            .or(global.expires)
            .map(clamp_ttl_days)
            .unwrap_or(DEFAULT_TTL_DAYS);
        let cookie_name = pick(opts.cookie_name, global.cookie_name)
            .map(|n| sanitize_cookie_name(&n))
            .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string());

        Settings {
            categories,
            title: pick(opts.title, global.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            subtitle: pick(opts.subtitle, global.subtitle)
                .unwrap_or_else(|| DEFAULT_SUBTITLE.to_string()),
            message: pick(opts.message, global.message)
                .unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
            accept_label: pick(opts.accept_btn_label, global.accept_btn_label)
                .unwrap_or_else(|| DEFAULT_ACCEPT_LABEL.to_string()),
            advanced_label: pick(opts.advanced_btn_label, global.advanced_btn_label)
                .unwrap_or_else(|| DEFAULT_ADVANCED_LABEL.to_string()),
            delay: Duration::from_millis(delay_ms),
            expires_days,
            cookie_name,
            accept_reload: opts.accept_reload.or(global.accept_reload).unwrap_or(false),
        }
    }

    /// Identifiers of all configured categories, in configuration order.
    pub fn category_ids(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.id.clone()).collect()
    }
}

fn validate_categories(types: Option<Vec<CookieCategory>>) -> Vec<CookieCategory> {
    let kept: Vec<CookieCategory> = types
        .unwrap_or_default()
        .into_iter()
        .filter(|c| {
            if !c.is_valid() {
                log::debug!("Skipping cookie category without label or id: {c:?}");
            }
            c.is_valid()
        })
        .collect();

    if kept.is_empty() {
        default_categories()
    } else {
        kept
    }
}

/// Coerces a display delay to a non-negative whole number of milliseconds.
pub fn coerce_delay_ms(ms: f64) -> u64 {
    if !ms.is_finite() || ms < 0.0 {
        return 0;
    }
    ms.round() as u64
}

/// Clamps a TTL to `0..=MAX_TTL_DAYS` whole days, rounding to the nearest
/// day. Non-numeric and negative inputs coerce to 0.
pub fn clamp_ttl_days(days: f64) -> u32 {
    if !days.is_finite() || days < 0.0 {
        return 0;
    }
    (days.round() as u64).min(MAX_TTL_DAYS as u64) as u32
}
