#![forbid(unsafe_code)]

//! "See more" toggles for project descriptions.

/// Class on `.project-description` while expanded.
pub const EXPANDED_CLASS: &str = "expanded";
pub const SEE_MORE_LABEL: &str = "See more";
pub const SEE_LESS_LABEL: &str = "See less";

/// State of one description wrapper. Wrappers are independent of each other.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Expander {
    expanded: bool,
}

impl Expander {
    #[must_use]
    pub const fn new(expanded: bool) -> Self {
        Self { expanded }
    }

    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Flip the description. Returns the new expanded state.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Button text for the current state.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        if self.expanded {
            SEE_LESS_LABEL
        } else {
            SEE_MORE_LABEL
        }
    }

    /// Value for the button's `aria-expanded` attribute.
    #[must_use]
    pub const fn aria_expanded(&self) -> &'static str {
        if self.expanded { "true" } else { "false" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_label_and_aria() {
        let mut expander = Expander::default();
        assert_eq!((expander.label(), expander.aria_expanded()), ("See more", "false"));
        assert!(expander.toggle());
        assert_eq!((expander.label(), expander.aria_expanded()), ("See less", "true"));
    }

    #[test]
    fn double_toggle_restores_initial_state() {
        for initial in [false, true] {
            let mut expander = Expander::new(initial);
            let before = expander;
            expander.toggle();
            expander.toggle();
            assert_eq!(expander, before);
        }
    }
}
