//! Sidebar navigation: active-section tracking and the mobile toggle.

/// Distance from the viewport top at which a section counts as current.
pub const SCROLL_OFFSET: f64 = 160.0;

/// Section ids targeted by in-page links (`#about` -> `about`).
#[must_use]
pub fn section_ids<'a>(hrefs: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    hrefs
        .into_iter()
        .filter_map(|href| href.strip_prefix('#'))
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionPosition {
    pub id: String,
    /// Top edge relative to the viewport, in CSS pixels.
    pub top: f64,
}

/// Picks the link to highlight: the last section whose top has scrolled past
/// the offset, or the first section when none has.
#[must_use]
pub fn active_section(sections: &[SectionPosition]) -> Option<&str> {
    let first = sections.first()?;
    let current = sections
        .iter()
        .filter(|section| section.top - SCROLL_OFFSET <= 0.0)
        .last()
        .unwrap_or(first);
    Some(current.id.as_str())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SidebarNav {
    open: bool,
}

impl SidebarNav {
    /// Flips the menu; the result feeds `aria-expanded`.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Following a link closes the mobile menu.
    pub fn link_followed(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub fn is_open(self) -> bool {
        self.open
    }
}
