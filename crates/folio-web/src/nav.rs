#![forbid(unsafe_code)]

//! Mobile navigation menu state.
//!
//! The menu container carries an `active` class while open, and the three
//! `span` bars inside the toggle morph between a hamburger and an "X".

/// Class marking the open menu.
pub const MENU_OPEN_CLASS: &str = "active";

/// One inline style write on an icon bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarStyle {
    pub property: &'static str,
    pub value: &'static str,
}

const fn bar(property: &'static str, value: &'static str) -> BarStyle {
    BarStyle { property, value }
}

/// Shape drawn by the toggle's three bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HamburgerIcon {
    Bars,
    Cross,
}

impl HamburgerIcon {
    /// Inline styles for bars 0, 1 and 2.
    #[must_use]
    pub const fn bar_styles(self) -> [BarStyle; 3] {
        match self {
            Self::Cross => [
                bar("transform", "rotate(45deg) translate(5px, 5px)"),
                bar("opacity", "0"),
                bar("transform", "rotate(-45deg) translate(7px, -6px)"),
            ],
            Self::Bars => [
                bar("transform", "none"),
                bar("opacity", "1"),
                bar("transform", "none"),
            ],
        }
    }
}

/// Open/closed state of the mobile menu. Starts closed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    #[must_use]
    pub const fn new() -> Self {
        Self { open: false }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn icon(&self) -> HamburgerIcon {
        if self.open {
            HamburgerIcon::Cross
        } else {
            HamburgerIcon::Bars
        }
    }

    /// Flip the menu. Returns the new open state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Close the menu. Returns whether anything changed.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    /// A nav link was clicked; narrow viewports close the menu.
    pub fn on_nav_link_click(&mut self, viewport_width: f64, breakpoint: f64) -> bool {
        viewport_width <= breakpoint && self.close()
    }

    /// A click landed somewhere in the document.
    ///
    /// `inside_nav` is true when the target is within the menu or the toggle.
    pub fn on_document_click(&mut self, inside_nav: bool) -> bool {
        !inside_nav && self.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_alternates_from_closed() {
        let mut menu = MobileMenu::new();
        assert!(!menu.is_open());
        assert!(menu.toggle());
        assert_eq!(menu.icon(), HamburgerIcon::Cross);
        assert!(!menu.toggle());
        assert_eq!(menu.icon(), HamburgerIcon::Bars);
    }

    #[test]
    fn nav_link_click_closes_only_on_narrow_viewports() {
        let mut menu = MobileMenu::new();
        menu.toggle();
        assert!(!menu.on_nav_link_click(1024.0, 768.0));
        assert!(menu.is_open());
        assert!(menu.on_nav_link_click(768.0, 768.0));
        assert!(!menu.is_open());
        assert!(!menu.on_nav_link_click(320.0, 768.0));
    }

    #[test]
    fn outside_click_closes_open_menu() {
        let mut menu = MobileMenu::new();
        assert!(!menu.on_document_click(false));
        menu.toggle();
        assert!(!menu.on_document_click(true));
        assert!(menu.is_open());
        assert!(menu.on_document_click(false));
        assert!(!menu.is_open());
    }

    #[test]
    fn cross_icon_hides_middle_bar() {
        let styles = HamburgerIcon::Cross.bar_styles();
        assert_eq!(styles[1], bar("opacity", "0"));
        let styles = HamburgerIcon::Bars.bar_styles();
        assert!(styles.iter().all(|s| s.value == "none" || s.value == "1"));
    }
}
