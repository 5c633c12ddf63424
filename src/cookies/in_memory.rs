use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::cookies::backend::CookieBackend;

/// In-memory cookie backend (no persistence). Used as the default when the
/// embedder supplies no backend, and as the test double.
///
/// Expiry is enforced on read: `get` returns `None` for entries whose
/// deadline has passed. A write with a zero `max_age` produces an entry that
/// is already expired, matching a browser dropping an immediately-expiring
/// cookie.
#[derive(Debug, Default)]
pub struct InMemoryCookieBackend {
    entries: HashMap<String, StoredCookie>,
}

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    expires_at: Instant,
}

impl InMemoryCookieBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under `name`, ignoring expiry. Diagnostics/tests only.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|c| c.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CookieBackend for InMemoryCookieBackend {
    fn set(&mut self, name: &str, value: &str, max_age: Duration) -> Result<()> {
        self.entries.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires_at: Instant::now() + max_age,
            },
        );
        Ok(())
    }

    fn get(&self, name: &str) -> Option<String> {
        let cookie = self.entries.get(name)?;
        if Instant::now() >= cookie.expires_at {
            return None;
        }
        Some(cookie.value.clone())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.entries.remove(name);
        Ok(())
    }
}
