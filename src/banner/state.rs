use std::fmt::Display;

/// Visibility states of a banner controller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    /// Nothing rendered, no timer armed.
    #[default]
    Hidden,
    /// Display delay armed, surface not yet mounted.
    PendingShow,
    /// Rendered, category detail collapsed.
    Summary,
    /// Rendered, category detail visible. One-way from [`BannerState::Summary`].
    Expanded,
    /// Terminal for this page load.
    Dismissed,
}

impl BannerState {
    /// True while the banner surface is rendered.
    pub fn is_rendered(&self) -> bool {
        matches!(self, BannerState::Summary | BannerState::Expanded)
    }
}

impl Display for BannerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BannerState::Hidden => "Hidden",
            BannerState::PendingShow => "PendingShow",
            BannerState::Summary => "Summary",
            BannerState::Expanded => "Expanded",
            BannerState::Dismissed => "Dismissed",
        };
        write!(f, "{s}")
    }
}
