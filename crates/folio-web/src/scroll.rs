#![forbid(unsafe_code)]

//! Scroll-driven navbar shadow and active-section highlighting.
//!
//! Both are recomputed on every scroll event with no debouncing. The
//! highlighting rule is a pure function over `(scroll offset, section ranges)`
//! so it can be checked without a document.

/// Class marking the highlighted nav link.
pub const ACTIVE_LINK_CLASS: &str = "active";

/// Navbar shadow style, a pure function of the scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarShadow {
    Resting,
    Elevated,
}

impl NavbarShadow {
    /// Elevated iff `offset` is strictly greater than `threshold`.
    #[must_use]
    pub fn for_offset(offset: f64, threshold: f64) -> Self {
        if offset > threshold {
            Self::Elevated
        } else {
            Self::Resting
        }
    }

    /// Value for the navbar's inline `box-shadow`.
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::Resting => "0 1px 3px rgba(0, 0, 0, 0.1)",
            Self::Elevated => "0 2px 10px rgba(0, 0, 0, 0.1)",
        }
    }
}

/// Remembers the previous scroll offset.
///
/// Nothing reads it yet; the navbar rule is purely threshold based.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ScrollTracker {
    last_offset: f64,
}

impl ScrollTracker {
    #[must_use]
    pub const fn last_offset(&self) -> f64 {
        self.last_offset
    }

    pub fn record(&mut self, offset: f64) {
        self.last_offset = offset;
    }
}

/// Geometry of one `section[id]`, measured in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRange {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionRange {
    #[must_use]
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Whether `scroll_y` falls in `[top - offset, top + height - offset)`.
    #[must_use]
    pub fn contains(&self, scroll_y: f64, offset: f64) -> bool {
        let start = self.top - offset;
        scroll_y >= start && scroll_y < start + self.height
    }
}

/// Pick the section whose nav link should be highlighted.
///
/// Sections are visited in document order and every match overwrites the
/// previous one, so with overlapping ranges the last match wins.
#[must_use]
pub fn select_active_section(
    scroll_y: f64,
    sections: &[SectionRange],
    offset: f64,
) -> Option<&str> {
    sections
        .iter()
        .rfind(|section| section.contains(scroll_y, offset))
        .map(|section| section.id.as_str())
}

/// Which nav link currently carries the active marker.
///
/// Holds at most one link id, so at most one link is ever marked.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ActiveLink {
    current: Option<String>,
}

impl ActiveLink {
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Apply the outcome of a highlighting pass. Returns whether the marker moved.
    ///
    /// No match leaves the marker where it is. A matching section without a
    /// nav link of its own clears every marker.
    pub fn apply(&mut self, selected: Option<&str>, link_targets: &[String]) -> bool {
        let Some(section_id) = selected else {
            return false;
        };
        let next = link_targets
            .iter()
            .find(|target| target.as_str() == section_id)
            .cloned();
        if next == self.current {
            return false;
        }
        self.current = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<SectionRange> {
        vec![
            SectionRange::new("home", 0.0, 600.0),
            SectionRange::new("about", 600.0, 400.0),
            SectionRange::new("projects", 1000.0, 1200.0),
        ]
    }

    #[test]
    fn shadow_threshold_is_strict() {
        assert_eq!(NavbarShadow::for_offset(50.0, 50.0), NavbarShadow::Resting);
        assert_eq!(NavbarShadow::for_offset(50.5, 50.0), NavbarShadow::Elevated);
        assert_eq!(NavbarShadow::for_offset(0.0, 50.0).css(), "0 1px 3px rgba(0, 0, 0, 0.1)");
    }

    #[test]
    fn range_starts_one_offset_above_section() {
        let all = sections();
        assert_eq!(select_active_section(0.0, &all, 100.0), Some("home"));
        assert_eq!(select_active_section(499.0, &all, 100.0), Some("home"));
        assert_eq!(select_active_section(500.0, &all, 100.0), Some("about"));
        assert_eq!(select_active_section(900.0, &all, 100.0), Some("projects"));
        assert_eq!(select_active_section(2100.0, &all, 100.0), None);
    }

    #[test]
    fn overlapping_ranges_pick_last_in_document_order() {
        let overlapping = vec![
            SectionRange::new("outer", 0.0, 2000.0),
            SectionRange::new("inner", 300.0, 200.0),
        ];
        assert_eq!(select_active_section(250.0, &overlapping, 100.0), Some("inner"));
        assert_eq!(select_active_section(450.0, &overlapping, 100.0), Some("outer"));
    }

    #[test]
    fn active_link_keeps_marker_when_nothing_matches() {
        let targets = vec!["home".to_string(), "about".to_string()];
        let mut active = ActiveLink::default();
        assert!(active.apply(Some("about"), &targets));
        assert!(!active.apply(None, &targets));
        assert_eq!(active.current(), Some("about"));
        assert!(!active.apply(Some("about"), &targets));
    }

    #[test]
    fn section_without_link_clears_marker() {
        let targets = vec!["home".to_string()];
        let mut active = ActiveLink::default();
        active.apply(Some("home"), &targets);
        assert!(active.apply(Some("footer"), &targets));
        assert_eq!(active.current(), None);
    }

    #[test]
    fn tracker_records_last_offset() {
        let mut tracker = ScrollTracker::default();
        tracker.record(120.0);
        tracker.record(80.0);
        assert_eq!(tracker.last_offset(), 80.0);
    }
}
