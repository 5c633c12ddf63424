//! Cookie backend abstraction.
//!
//! A **cookie backend** is the seam between the consent store and whatever
//! the embedding environment uses for cookie persistence. In a real browser
//! embedding this wraps `document.cookie` (values written with `path=/` so
//! the consent decision is visible site-wide); in tests and headless hosts
//! the in-memory reference implementation is used.
//!
//! ## Design notes
//! - The component is single-threaded (UI thread only), so the handle type
//!   is `Rc<RefCell<_>>` rather than the `Arc<RwLock<_>>` shape a
//!   multi-threaded engine would use.
//! - Writes carry a `max_age`; the backend owns expiry enforcement. A
//!   browser-cookie implementation maps it onto the `expires`/`max-age`
//!   attributes and never reports failure back, so callers treat write
//!   errors as advisory only.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;

/// A handle to a cookie backend.
///
/// Reference-counted and interior-mutable; the banner runs on a single UI
/// thread, so no locking is involved.
pub type CookieBackendHandle = Rc<RefCell<dyn CookieBackend>>;

/// Object-safe cookie persistence interface.
pub trait CookieBackend {
    /// Stores `value` under `name`, expiring after `max_age`.
    ///
    /// A `max_age` of zero means the entry is immediately expired;
    /// implementations may treat that as "do not store".
    fn set(&mut self, name: &str, value: &str, max_age: Duration) -> Result<()>;

    /// Returns the live (non-expired) value stored under `name`, if any.
    fn get(&self, name: &str) -> Option<String>;

    /// Removes the entry stored under `name`.
    fn remove(&mut self, name: &str) -> Result<()>;
}
