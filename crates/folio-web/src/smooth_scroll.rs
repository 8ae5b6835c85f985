#![forbid(unsafe_code)]

//! Offset-aware smooth scrolling for in-page nav links.

/// Section id named by an in-page `href`, if it is a fragment.
///
/// `"#projects"` yields `Some("projects")`; a bare `"#"` or an external URL
/// yields `None`.
#[must_use]
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Whether a click on this `href` stays on the page and so must not navigate.
///
/// True for every fragment, including a bare `"#"` that has no target.
#[must_use]
pub fn is_in_page(href: &str) -> bool {
    href.starts_with('#')
}

/// Scroll position that puts a section just below the fixed navbar.
#[must_use]
pub fn scroll_target(section_top: f64, navbar_height: f64) -> f64 {
    section_top - navbar_height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fragments_resolve() {
        assert_eq!(fragment_target("#projects"), Some("projects"));
        assert_eq!(fragment_target("#"), None);
        assert_eq!(fragment_target("https://example.com/#projects"), None);
        assert_eq!(fragment_target(""), None);
    }

    #[test]
    fn bare_hash_stays_in_page_without_target() {
        assert!(is_in_page("#"));
        assert_eq!(fragment_target("#"), None);
        assert!(is_in_page("#about"));
        assert!(!is_in_page("/cv.pdf"));
        assert!(!is_in_page("https://example.com/#projects"));
    }

    #[test]
    fn target_clears_navbar() {
        assert_eq!(scroll_target(1200.0, 72.0), 1128.0);
    }
}
