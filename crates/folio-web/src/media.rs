#![forbid(unsafe_code)]

//! Deferred loading for embedded project videos.

/// Embedded frames that receive the lazy-loading hint.
pub const VIDEO_FRAME_SELECTOR: &str = ".project-video iframe";
pub const LAZY_LOADING_ATTR: &str = "loading";
pub const LAZY_LOADING_VALUE: &str = "lazy";

/// Whether a frame with the given `loading` attribute still needs the hint.
#[must_use]
pub fn needs_lazy_hint(current: Option<&str>) -> bool {
    current != Some(LAZY_LOADING_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_is_applied_once() {
        assert!(needs_lazy_hint(None));
        assert!(needs_lazy_hint(Some("eager")));
        assert!(!needs_lazy_hint(Some("lazy")));
    }
}
