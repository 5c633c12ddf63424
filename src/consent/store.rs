//! Durable, validated persistence of the consent decision.
//!
//! A [`ConsentStore`] owns the persisted cookie name and the list of
//! currently-configured category identifiers. Everything it reads or writes
//! passes through validation:
//!
//! - Writes are normalized to known identifiers in configuration order and
//!   serialized as a JSON string array.
//! - Reads fail closed: a missing key, an undecodable payload, or a payload
//!   with no recognized identifiers all come back as "no consent decision".
//! - The cookie name itself is restricted to the cookie-token-safe range,
//!   falling back to [`DEFAULT_COOKIE_NAME`] when nothing survives.
//!
//! Storage write failures are logged and swallowed. Browser cookie writes
//! give this layer no failure feedback, so there is nothing to recover.

use std::time::Duration;

use crate::config::{CookieCategory, DEFAULT_COOKIE_NAME};
use crate::consent::record;
use crate::cookies::{CookieBackend, CookieBackendHandle};
use crate::errors::ConsentError;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Restricts a cookie name to visible ASCII (0x21–0x7E) with the separator
/// characters `,`, `;`, `=` and all whitespace stripped. An empty result
/// falls back to [`DEFAULT_COOKIE_NAME`].
pub fn sanitize_cookie_name(raw: &str) -> String {
    let name: String = raw
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, ',' | ';' | '='))
        .collect();

    if name.is_empty() {
        log::debug!("Cookie name {raw:?} sanitized to nothing, using {DEFAULT_COOKIE_NAME:?}");
        DEFAULT_COOKIE_NAME.to_string()
    } else {
        name
    }
}

/// Reads and writes the persisted consent record through a
/// [`CookieBackend`](crate::cookies::CookieBackend).
pub struct ConsentStore {
    backend: CookieBackendHandle,
    cookie_name: String,
    /// Configured category identifiers, in configuration order.
    known_ids: Vec<String>,
}

impl ConsentStore {
    pub fn new<S: Into<String>>(
        backend: CookieBackendHandle,
        cookie_name: S,
        known_ids: Vec<String>,
    ) -> Self {
        Self {
            backend,
            cookie_name: sanitize_cookie_name(&cookie_name.into()),
            known_ids,
        }
    }

    /// Builds a store for the given category configuration.
    pub fn for_categories<S: Into<String>>(
        backend: CookieBackendHandle,
        cookie_name: S,
        categories: &[CookieCategory],
    ) -> Self {
        Self::new(
            backend,
            cookie_name,
            categories.iter().map(|c| c.id.clone()).collect(),
        )
    }

    /// Name of the persisted cookie (post-sanitization).
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Persists the accepted identifiers, overwriting any prior record.
    ///
    /// The stored order is configuration order regardless of the order of
    /// `accepted`, and identifiers not in the current configuration are not
    /// written. A `ttl_days` of zero is a silent no-op.
    pub fn write(&self, accepted: &[String], ttl_days: u32) {
        if ttl_days == 0 {
            log::debug!("Consent TTL is zero, skipping write of {:?}", self.cookie_name);
            return;
        }

        let normalized: Vec<String> = self
            .known_ids
            .iter()
            .filter(|known| accepted.iter().any(|a| a == *known))
            .cloned()
            .collect();
        let payload = record::encode(&normalized);
        let max_age = Duration::from_secs(ttl_days as u64 * SECS_PER_DAY);

        if let Err(e) = self
            .backend
            .borrow_mut()
            .set(&self.cookie_name, &payload, max_age)
        {
            // Unobservable by design: there is no feedback loop to the user.
            log::warn!("Failed to persist consent cookie {:?}: {e}", self.cookie_name);
        }
    }

    /// The currently persisted consent record, or `None` when no valid
    /// decision exists.
    pub fn read(&self) -> Option<Vec<String>> {
        let raw = self.backend.borrow().get(&self.cookie_name)?;
        match self.decode_checked(&raw) {
            Ok(ids) => Some(ids),
            Err(e) => {
                log::debug!("Treating consent as absent ({:?}): {e}", self.cookie_name);
                None
            }
        }
    }

    fn decode_checked(&self, raw: &str) -> Result<Vec<String>, ConsentError> {
        let ids = record::decode(raw)?;
        let kept = record::filter_known(ids, &self.known_ids);
        if kept.is_empty() {
            return Err(ConsentError::NoKnownCategories);
        }
        Ok(kept)
    }
}
