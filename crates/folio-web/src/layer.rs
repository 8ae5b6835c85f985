#![forbid(unsafe_code)]

//! The behavior layer: every piece of UI state on the page, driven by events.
//!
//! [`BehaviorLayer`] is host-driven: the shell measures the document, calls
//! exactly one `on_*` method per DOM event and renders whatever the method
//! returns. No method touches the DOM, blocks or reads a wall clock.
//!
//! # Lifecycle
//!
//! 1. [`BehaviorLayer::new`] with a validated [`BehaviorConfig`].
//! 2. Register what init found: [`BehaviorLayer::set_nav_links`],
//!    [`BehaviorLayer::register_expander`], [`BehaviorLayer::register_cards`],
//!    [`BehaviorLayer::register_tracks`].
//! 3. Forward events; advance time with [`BehaviorLayer::set_time`] before
//!    ripple operations.

use core::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use crate::audio::{AudioDeck, PlayOutcome};
use crate::clock::DeterministicClock;
use crate::config::BehaviorConfig;
use crate::expand::Expander;
use crate::nav::{HamburgerIcon, MobileMenu};
use crate::reveal::{CardReveal, RevealOptions, RevealSet};
use crate::ripple::{ButtonRect, RippleGeometry, RippleId, RippleRegistry};
use crate::scroll::{ActiveLink, NavbarShadow, ScrollTracker, SectionRange, select_active_section};
use crate::smooth_scroll::{fragment_target, scroll_target};

/// How many elements of each kind init bound listeners to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingCounts {
    pub nav_links: usize,
    pub sections: usize,
    pub expanders: usize,
    pub cards: usize,
    pub tracks: usize,
    pub buttons: usize,
    pub video_frames: usize,
}

/// New menu state to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuUpdate {
    pub open: bool,
    pub icon: HamburgerIcon,
}

impl MenuUpdate {
    fn from_menu(menu: &MobileMenu) -> Self {
        Self {
            open: menu.is_open(),
            icon: menu.icon(),
        }
    }
}

/// Result of one scroll event.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollUpdate {
    pub shadow: NavbarShadow,
    /// Set when the active marker moved; the inner value is the new link target
    /// (`None` clears every marker).
    pub highlight: Option<Option<String>>,
}

/// A freshly spawned ripple overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleSpawn {
    pub id: RippleId,
    pub geometry: RippleGeometry,
    /// Delay until the overlay must be removed.
    pub lifetime: Duration,
}

/// All UI state for one page.
#[derive(Debug, Clone)]
pub struct BehaviorLayer {
    config: BehaviorConfig,
    clock: DeterministicClock,
    menu: MobileMenu,
    tracker: ScrollTracker,
    active: ActiveLink,
    link_targets: Vec<String>,
    expanders: Vec<Expander>,
    reveals: RevealSet,
    ripples: RippleRegistry,
    audio: AudioDeck,
}

impl BehaviorLayer {
    #[must_use]
    pub fn new(config: BehaviorConfig) -> Self {
        Self {
            config,
            clock: DeterministicClock::new(),
            menu: MobileMenu::new(),
            tracker: ScrollTracker::default(),
            active: ActiveLink::default(),
            link_targets: Vec::new(),
            expanders: Vec::new(),
            reveals: RevealSet::default(),
            ripples: RippleRegistry::new(),
            audio: AudioDeck::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    // --- registration -----------------------------------------------------

    /// Record the `href` of every nav link, in document order.
    ///
    /// Links that are not in-page fragments never carry the active marker.
    pub fn set_nav_links<'a>(&mut self, hrefs: impl IntoIterator<Item = &'a str>) {
        self.link_targets = hrefs
            .into_iter()
            .filter_map(fragment_target)
            .map(str::to_owned)
            .collect();
    }

    #[must_use]
    pub fn link_targets(&self) -> &[String] {
        &self.link_targets
    }

    /// Add a description wrapper; returns its index.
    pub fn register_expander(&mut self, initially_expanded: bool) -> usize {
        self.expanders.push(Expander::new(initially_expanded));
        self.expanders.len() - 1
    }

    pub fn register_cards(&mut self, count: usize) {
        self.reveals = RevealSet::new(count);
    }

    /// Register the tracks that actually hold a player.
    pub fn register_tracks(&mut self, count: usize) {
        self.audio = AudioDeck::new(count);
    }

    #[must_use]
    pub fn reveal_options(&self) -> RevealOptions {
        RevealOptions {
            threshold: self.config.reveal_threshold,
            bottom_margin: self.config.reveal_bottom_margin,
        }
    }

    // --- time -------------------------------------------------------------

    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    // --- navigation -------------------------------------------------------

    pub fn on_toggle_click(&mut self) -> MenuUpdate {
        let open = self.menu.toggle();
        debug!(open, "mobile menu toggled");
        MenuUpdate::from_menu(&self.menu)
    }

    /// A nav link was clicked. Returns the menu state when it had to close.
    pub fn on_nav_link_click(&mut self, viewport_width: f64) -> Option<MenuUpdate> {
        self.menu
            .on_nav_link_click(viewport_width, self.config.mobile_breakpoint)
            .then(|| MenuUpdate::from_menu(&self.menu))
    }

    /// A click reached the document. Returns the menu state when it had to close.
    pub fn on_document_click(&mut self, inside_nav: bool) -> Option<MenuUpdate> {
        self.menu
            .on_document_click(inside_nav)
            .then(|| MenuUpdate::from_menu(&self.menu))
    }

    #[must_use]
    pub const fn menu_open(&self) -> bool {
        self.menu.is_open()
    }

    /// Where a click on a nav link should scroll to, if its target exists.
    ///
    /// `section_top` is the resolved target's offset, or `None` when the
    /// fragment did not resolve.
    #[must_use]
    pub fn smooth_scroll_target(
        &self,
        section_top: Option<f64>,
        navbar_height: f64,
    ) -> Option<f64> {
        section_top.map(|top| scroll_target(top, navbar_height))
    }

    // --- scrolling --------------------------------------------------------

    pub fn on_scroll(&mut self, offset: f64, sections: &[SectionRange]) -> ScrollUpdate {
        self.tracker.record(offset);
        let shadow = NavbarShadow::for_offset(offset, self.config.elevation_threshold);
        let selected = select_active_section(offset, sections, self.config.section_offset);
        let highlight = self
            .active
            .apply(selected, &self.link_targets)
            .then(|| self.active.current().map(str::to_owned));
        if let Some(link) = &highlight {
            trace!(offset, link = link.as_deref().unwrap_or("-"), "active link moved");
        }
        ScrollUpdate { shadow, highlight }
    }

    #[must_use]
    pub fn active_link(&self) -> Option<&str> {
        self.active.current()
    }

    #[must_use]
    pub const fn last_scroll_offset(&self) -> f64 {
        self.tracker.last_offset()
    }

    // --- descriptions -----------------------------------------------------

    /// Toggle one description. Unknown indices are ignored.
    pub fn on_see_more_click(&mut self, index: usize) -> Option<Expander> {
        let expander = self.expanders.get_mut(index)?;
        expander.toggle();
        Some(*expander)
    }

    #[must_use]
    pub fn expander(&self, index: usize) -> Option<Expander> {
        self.expanders.get(index).copied()
    }

    // --- reveal -----------------------------------------------------------

    /// Feed one intersection entry. Returns true when the card must be shown.
    pub fn on_card_intersection(&mut self, index: usize, is_intersecting: bool) -> bool {
        let revealed = self.reveals.observe(index, is_intersecting);
        if revealed {
            trace!(card = index, "card revealed");
        }
        revealed
    }

    #[must_use]
    pub fn card(&self, index: usize) -> Option<CardReveal> {
        self.reveals.get(index).copied()
    }

    /// Cards that were hidden at init and never revealed. Teardown must hand
    /// these back to the page's own styles or they stay invisible.
    #[must_use]
    pub fn unrevealed_cards(&self) -> Vec<usize> {
        self.reveals.unrevealed().collect()
    }

    // --- ripples ----------------------------------------------------------

    /// Spawn an overlay for a click at `(client_x, client_y)` on `rect`.
    pub fn on_button_click(
        &mut self,
        rect: ButtonRect,
        client_x: f64,
        client_y: f64,
    ) -> RippleSpawn {
        let lifetime = self.config.ripple_lifetime();
        let handle = self.ripples.spawn(self.clock.now(), lifetime);
        RippleSpawn {
            id: handle.id,
            geometry: RippleGeometry::from_click(rect, client_x, client_y),
            lifetime,
        }
    }

    /// Overlays whose lifetime has elapsed at the current time.
    pub fn expire_ripples(&mut self) -> Vec<RippleId> {
        self.ripples.expire(self.clock.now())
    }

    /// The removal timer for `id` fired.
    ///
    /// Returns every overlay due now. The firing overlay is always included:
    /// its timer is authoritative even if the host clock lags slightly.
    pub fn on_ripple_timer(&mut self, id: RippleId) -> Vec<RippleId> {
        let mut due = self.expire_ripples();
        if !due.contains(&id) && self.ripples.cancel(id) {
            due.push(id);
        }
        due
    }

    /// Forget a pending overlay without waiting for its timer.
    pub fn cancel_ripple(&mut self, id: RippleId) -> bool {
        self.ripples.cancel(id)
    }

    /// Drop every pending overlay (teardown).
    pub fn drain_ripples(&mut self) -> Vec<RippleId> {
        self.ripples.drain()
    }

    #[must_use]
    pub fn pending_ripples(&self) -> usize {
        self.ripples.len()
    }

    // --- audio ------------------------------------------------------------

    pub fn on_audio_play(
        &mut self,
        index: usize,
        is_paused: impl Fn(usize) -> bool,
    ) -> PlayOutcome {
        let outcome = self.audio.on_play(index, is_paused);
        debug!(track = index, pausing = outcome.pause.len(), "audio track playing");
        outcome
    }

    /// `pause` or `ended` on track `index`.
    pub fn on_audio_stop(&mut self, index: usize) -> bool {
        self.audio.on_stop(index)
    }

    #[must_use]
    pub fn is_track_playing(&self, index: usize) -> bool {
        self.audio.is_playing(index)
    }

    #[must_use]
    pub fn playing_track(&self) -> Option<usize> {
        self.audio.playing()
    }
}

impl Default for BehaviorLayer {
    fn default() -> Self {
        Self::new(BehaviorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page() -> BehaviorLayer {
        let mut layer = BehaviorLayer::default();
        layer.set_nav_links(["#home", "#about", "#projects", "https://github.com"]);
        layer
    }

    fn sections() -> Vec<SectionRange> {
        vec![
            SectionRange::new("home", 0.0, 700.0),
            SectionRange::new("about", 700.0, 500.0),
            SectionRange::new("projects", 1200.0, 1500.0),
        ]
    }

    #[test]
    fn non_fragment_links_are_not_targets() {
        assert_eq!(page().link_targets(), ["home", "about", "projects"]);
    }

    #[test]
    fn scroll_updates_shadow_and_marker() {
        let mut layer = page();
        let update = layer.on_scroll(10.0, &sections());
        assert_eq!(update.shadow, NavbarShadow::Resting);
        assert_eq!(update.highlight, Some(Some("home".to_string())));

        let update = layer.on_scroll(20.0, &sections());
        assert_eq!(update.highlight, None);

        let update = layer.on_scroll(1150.0, &sections());
        assert_eq!(update.shadow, NavbarShadow::Elevated);
        assert_eq!(update.highlight, Some(Some("projects".to_string())));
        assert_eq!(layer.active_link(), Some("projects"));
        assert_eq!(layer.last_scroll_offset(), 1150.0);
    }

    #[test]
    fn toggle_then_outside_click_closes_menu() {
        let mut layer = page();
        assert_eq!(
            layer.on_toggle_click(),
            MenuUpdate {
                open: true,
                icon: HamburgerIcon::Cross
            }
        );
        assert_eq!(layer.on_document_click(true), None);
        assert_eq!(
            layer.on_document_click(false),
            Some(MenuUpdate {
                open: false,
                icon: HamburgerIcon::Bars
            })
        );
    }

    #[test]
    fn nav_click_scenario_scrolls_below_navbar() {
        let mut layer = page();
        layer.on_toggle_click();
        assert!(layer.on_nav_link_click(375.0).is_some());
        assert!(!layer.menu_open());
        assert_eq!(layer.smooth_scroll_target(Some(1200.0), 70.0), Some(1130.0));
        assert_eq!(layer.smooth_scroll_target(None, 70.0), None);
    }

    #[test]
    fn expanders_are_independent() {
        let mut layer = page();
        let first = layer.register_expander(false);
        let second = layer.register_expander(false);
        assert!(layer.on_see_more_click(first).unwrap().is_expanded());
        assert!(!layer.expander(second).unwrap().is_expanded());
        assert_eq!(layer.on_see_more_click(9), None);
    }

    #[test]
    fn ripple_is_gone_after_lifetime() {
        let mut layer = page();
        layer.set_time(Duration::from_millis(1_000));
        let rect = ButtonRect {
            left: 0.0,
            top: 0.0,
            width: 120.0,
            height: 40.0,
        };
        let spawn = layer.on_button_click(rect, 60.0, 20.0);
        assert_eq!(layer.pending_ripples(), 1);
        assert_eq!(spawn.lifetime, Duration::from_millis(600));

        layer.advance_time(Duration::from_millis(599));
        assert!(layer.expire_ripples().is_empty());
        layer.advance_time(Duration::from_millis(1));
        assert_eq!(layer.expire_ripples(), vec![spawn.id]);
        assert_eq!(layer.pending_ripples(), 0);
    }

    #[test]
    fn ripple_timer_is_authoritative() {
        let mut layer = page();
        let rect = ButtonRect {
            left: 0.0,
            top: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let spawn = layer.on_button_click(rect, 5.0, 5.0);
        layer.advance_time(Duration::from_millis(598));
        assert_eq!(layer.on_ripple_timer(spawn.id), vec![spawn.id]);
        assert!(layer.on_ripple_timer(spawn.id).is_empty());
    }

    #[test]
    fn cards_reveal_once() {
        let mut layer = page();
        layer.register_cards(2);
        assert!(layer.on_card_intersection(0, true));
        assert!(!layer.on_card_intersection(0, false));
        assert!(layer.card(0).unwrap().is_revealed());
        assert!(!layer.card(1).unwrap().is_revealed());
        assert_eq!(layer.reveal_options().root_margin(), "0px 0px -100px 0px");
    }

    #[test]
    fn teardown_restores_only_hidden_cards() {
        let mut layer = page();
        layer.register_cards(3);
        assert_eq!(layer.unrevealed_cards(), vec![0, 1, 2]);
        layer.on_card_intersection(1, true);
        assert_eq!(layer.unrevealed_cards(), vec![0, 2]);
        layer.on_card_intersection(0, true);
        layer.on_card_intersection(2, true);
        assert!(layer.unrevealed_cards().is_empty());
    }

    #[test]
    fn audio_scenario_two_tracks() {
        let mut layer = page();
        layer.register_tracks(2);
        layer.on_audio_play(0, |_| true);
        assert_eq!(layer.playing_track(), Some(0));
        let outcome = layer.on_audio_play(1, |track| track != 0);
        assert_eq!(outcome.pause, vec![0]);
        assert_eq!(layer.playing_track(), Some(1));
        assert!(!layer.is_track_playing(0));
        assert!(layer.on_audio_stop(1));
        assert_eq!(layer.playing_track(), None);
    }

    #[test]
    fn binding_counts_serialize_camel_case() {
        let counts = BindingCounts {
            nav_links: 4,
            video_frames: 2,
            ..BindingCounts::default()
        };
        let json = serde_json::to_string(&counts).unwrap();
        assert!(json.contains(r#""navLinks":4"#));
        assert!(json.contains(r#""videoFrames":2"#));
    }
}
