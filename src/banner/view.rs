//! Render model for the banner surface.
//!
//! A [`BannerView`] is everything a presenter needs to build the prompt:
//! labels, the message text, and one [`CategoryEntry`] per configured
//! category with its current checkbox state. The controller owns the view
//! while the banner is rendered and mutates it as the user toggles
//! checkboxes; presenters treat it as read-only input.
//!
//! The structure is serializable so embedders can ship it across an FFI
//! boundary to whatever actually draws the prompt.

use serde::{Deserialize, Serialize};

use crate::config::Settings;

/// One category row in the banner's detail list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: String,
    pub label: String,
    pub description: String,
    /// Current checkbox state.
    pub checked: bool,
    /// A locked entry renders as checked and disabled (the essential
    /// category); it always counts as accepted.
    pub locked: bool,
}

/// Snapshot of everything rendered on the banner surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerView {
    pub title: String,
    pub subtitle: String,
    pub message: String,
    pub accept_label: String,
    pub advanced_label: String,
    /// Category rows, in configuration order.
    pub entries: Vec<CategoryEntry>,
    /// Whether the category detail list is currently visible.
    pub expanded: bool,
    /// The customize control is disabled for good once activated.
    pub advanced_enabled: bool,
}

impl BannerView {
    /// Builds the initial view. Checkbox defaults: membership in `prior`
    /// when a valid record exists, the category's configured `checked` flag
    /// otherwise. Essential categories are always checked and locked.
    pub(crate) fn build(settings: &Settings, prior: Option<&[String]>) -> Self {
        let entries = settings
            .categories
            .iter()
            .map(|cat| {
                let essential = cat.is_essential();
                let checked = essential
                    || match prior {
                        Some(record) => record.iter().any(|id| *id == cat.id),
                        None => cat.checked,
                    };
                CategoryEntry {
                    id: cat.id.clone(),
                    label: cat.label.clone(),
                    description: cat.description.clone(),
                    checked,
                    locked: essential,
                }
            })
            .collect();

        BannerView {
            title: settings.title.clone(),
            subtitle: settings.subtitle.clone(),
            message: settings.message.clone(),
            accept_label: settings.accept_label.clone(),
            advanced_label: settings.advanced_label.clone(),
            entries,
            expanded: false,
            advanced_enabled: true,
        }
    }

    /// Sets the checkbox state for `id`. Locked entries and unknown ids are
    /// ignored; returns whether anything changed.
    pub fn set_checked(&mut self, id: &str, checked: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id && !e.locked) {
            Some(entry) if entry.checked != checked => {
                entry.checked = checked;
                true
            }
            _ => false,
        }
    }

    /// Identifiers currently counting as accepted: checked entries plus
    /// locked ones, in configuration order.
    pub fn accepted_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.checked || e.locked)
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn entry(&self, id: &str) -> Option<&CategoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}
