#![forbid(unsafe_code)]

//! DOM binding for [`BehaviorLayer`].
//!
//! [`PageShell`] owns every element handle found at init plus the listener
//! closures attached to them. Each listener measures what it needs, calls one
//! `on_*` method on the layer, releases the borrow and only then writes to the
//! DOM, so re-entrant events (e.g. `pause()` dispatching `pause`) never hit a
//! held `RefCell` borrow.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use js_sys::Array;
use tracing::{debug, info, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlMediaElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, Node, NodeList,
    ScrollBehavior, ScrollToOptions, Window,
};
use web_time::Instant;

use crate::audio::{PLAYER_SELECTOR, PLAYING_CLASS, TRACK_SELECTOR};
use crate::banner::BANNER;
use crate::config::BehaviorConfig;
use crate::error::UiError;
use crate::expand::EXPANDED_CLASS;
use crate::layer::{BehaviorLayer, BindingCounts, MenuUpdate};
use crate::media::{LAZY_LOADING_ATTR, LAZY_LOADING_VALUE, VIDEO_FRAME_SELECTOR, needs_lazy_hint};
use crate::nav::MENU_OPEN_CLASS;
use crate::reveal::{CARD_SELECTOR, CARD_TRANSITION, CardStyle, HIDDEN_CARD, VISIBLE_CARD};
use crate::ripple::{BUTTON_SELECTOR, ButtonRect, RIPPLE_CLASS, RIPPLE_STYLESHEET, RippleId, px};
use crate::scroll::{ACTIVE_LINK_CLASS, SectionRange};
use crate::smooth_scroll::{fragment_target, is_in_page};

const NAV_TOGGLE_ID: &str = "nav-toggle";
const NAV_MENU_ID: &str = "nav-menu";
const NAVBAR_ID: &str = "navbar";
const NAV_LINK_SELECTOR: &str = ".nav-link";
const SECTION_SELECTOR: &str = "section[id]";
const SEE_MORE_SELECTOR: &str = ".see-more-btn";
const DESCRIPTION_WRAPPER_SELECTOR: &str = ".project-description-wrapper";
const DESCRIPTION_SELECTOR: &str = ".project-description";
const ICON_BAR_SELECTOR: &str = "span";

pub(crate) fn dom_error(value: JsValue) -> UiError {
    UiError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, UiError> {
    document
        .query_selector_all(selector)
        .map(elements)
        .map_err(dom_error)
}

fn cast<T: JsCast>(found: Vec<Element>) -> Vec<T> {
    found
        .into_iter()
        .filter_map(|element| element.dyn_into::<T>().ok())
        .collect()
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = element.style().set_property(property, value) {
        warn!(property, error = ?err, "inline style write failed");
    }
}

fn set_class(element: &Element, class: &str, on: bool) {
    if let Err(err) = element.class_list().toggle_with_force(class, on) {
        warn!(class, error = ?err, "class toggle failed");
    }
}

fn clear_style(element: &HtmlElement, property: &str) {
    if let Err(err) = element.style().remove_property(property) {
        warn!(property, error = ?err, "inline style removal failed");
    }
}

fn apply_card_style(card: &HtmlElement, style: CardStyle) {
    set_style(card, "opacity", style.opacity);
    set_style(card, "transform", style.transform);
}

/// Wrap a handler so it only runs while the shell is alive.
fn with_shell(
    shell: &Weak<PageShell>,
    mut handler: impl FnMut(&Rc<PageShell>, Event) + 'static,
) -> impl FnMut(Event) + 'static {
    let shell = shell.clone();
    move |event| {
        if let Some(shell) = shell.upgrade() {
            handler(&shell, event);
        }
    }
}

struct Binding {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

struct Description {
    button: Element,
    description: Element,
}

struct Track {
    container: Element,
    player: HtmlMediaElement,
}

struct PendingRipple {
    overlay: HtmlElement,
    timeout: i32,
}

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

pub(crate) struct PageShell {
    window: Window,
    document: Document,
    started: Instant,
    layer: RefCell<BehaviorLayer>,
    nav_toggle: Option<Element>,
    nav_menu: Option<Element>,
    navbar: Option<HtmlElement>,
    nav_links: Vec<Element>,
    sections: Vec<HtmlElement>,
    descriptions: Vec<Description>,
    cards: Vec<HtmlElement>,
    tracks: Vec<Track>,
    buttons: Vec<HtmlElement>,
    video_frames: Vec<Element>,
    bindings: RefCell<Vec<Binding>>,
    observer: RefCell<Option<(IntersectionObserver, ObserverCallback)>>,
    injected_style: RefCell<Option<Element>>,
    ripples: RefCell<HashMap<RippleId, PendingRipple>>,
}

impl PageShell {
    /// Locate every element the layer drives and register it with the core.
    pub(crate) fn bind(
        window: Window,
        document: Document,
        config: BehaviorConfig,
    ) -> Result<Rc<Self>, UiError> {
        let mut layer = BehaviorLayer::new(config);

        let nav_toggle = document.get_element_by_id(NAV_TOGGLE_ID);
        if nav_toggle.is_none() {
            debug!("no #{NAV_TOGGLE_ID}; mobile menu toggle disabled");
        }
        let nav_menu = document.get_element_by_id(NAV_MENU_ID);
        let navbar = document
            .get_element_by_id(NAVBAR_ID)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());

        let nav_links = query_all(&document, NAV_LINK_SELECTOR)?;
        let hrefs: Vec<String> = nav_links
            .iter()
            .map(|link| link.get_attribute("href").unwrap_or_default())
            .collect();
        layer.set_nav_links(hrefs.iter().map(String::as_str));

        let sections = cast::<HtmlElement>(query_all(&document, SECTION_SELECTOR)?);

        let mut descriptions = Vec::new();
        for button in query_all(&document, SEE_MORE_SELECTOR)? {
            let description = button
                .closest(DESCRIPTION_WRAPPER_SELECTOR)
                .ok()
                .flatten()
                .and_then(|wrapper| wrapper.query_selector(DESCRIPTION_SELECTOR).ok().flatten());
            let Some(description) = description else {
                debug!("see-more button outside a description wrapper; skipped");
                continue;
            };
            layer.register_expander(description.class_list().contains(EXPANDED_CLASS));
            descriptions.push(Description {
                button,
                description,
            });
        }

        let cards = cast::<HtmlElement>(query_all(&document, CARD_SELECTOR)?);
        layer.register_cards(cards.len());

        let mut tracks = Vec::new();
        for container in query_all(&document, TRACK_SELECTOR)? {
            let player = container
                .query_selector(PLAYER_SELECTOR)
                .ok()
                .flatten()
                .and_then(|player| player.dyn_into::<HtmlMediaElement>().ok());
            match player {
                Some(player) => tracks.push(Track { container, player }),
                None => debug!("audio track without a player; skipped"),
            }
        }
        layer.register_tracks(tracks.len());

        let buttons = cast::<HtmlElement>(query_all(&document, BUTTON_SELECTOR)?);
        let video_frames = query_all(&document, VIDEO_FRAME_SELECTOR)?;

        Ok(Rc::new(Self {
            window,
            document,
            started: Instant::now(),
            layer: RefCell::new(layer),
            nav_toggle,
            nav_menu,
            navbar,
            nav_links,
            sections,
            descriptions,
            cards,
            tracks,
            buttons,
            video_frames,
            bindings: RefCell::new(Vec::new()),
            observer: RefCell::new(None),
            injected_style: RefCell::new(None),
            ripples: RefCell::new(HashMap::new()),
        }))
    }

    pub(crate) fn counts(&self) -> BindingCounts {
        BindingCounts {
            nav_links: self.nav_links.len(),
            sections: self.sections.len(),
            expanders: self.descriptions.len(),
            cards: self.cards.len(),
            tracks: self.tracks.len(),
            buttons: self.buttons.len(),
            video_frames: self.video_frames.len(),
        }
    }

    pub(crate) fn layer(&self) -> Ref<'_, BehaviorLayer> {
        self.layer.borrow()
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    /// One-time mutations plus every listener.
    pub(crate) fn attach(self: &Rc<Self>) -> Result<(), UiError> {
        self.apply_lazy_hints();
        self.inject_ripple_styles()?;
        self.observe_cards()?;

        let weak = Rc::downgrade(self);

        if let Some(toggle) = &self.nav_toggle {
            self.listen(
                toggle,
                "click",
                with_shell(&weak, |shell, _| shell.handle_toggle_click()),
            )?;
        }

        for link in &self.nav_links {
            self.listen(
                link,
                "click",
                with_shell(&weak, |shell, _| shell.handle_nav_link_close()),
            )?;
            let target = link.clone();
            self.listen(
                link,
                "click",
                with_shell(&weak, move |shell, event| shell.handle_smooth_scroll(&target, &event)),
            )?;
        }

        self.listen(
            &self.document,
            "click",
            with_shell(&weak, |shell, event| shell.handle_document_click(&event)),
        )?;
        self.listen(&self.window, "scroll", with_shell(&weak, |shell, _| shell.handle_scroll()))?;

        for (index, description) in self.descriptions.iter().enumerate() {
            self.listen(
                &description.button,
                "click",
                with_shell(&weak, move |shell, _| shell.handle_see_more(index)),
            )?;
        }

        for button in &self.buttons {
            let target = button.clone();
            self.listen(
                button,
                "click",
                with_shell(&weak, move |shell, event| shell.handle_button_click(&target, &event)),
            )?;
        }

        for (index, track) in self.tracks.iter().enumerate() {
            self.listen(
                &track.player,
                "play",
                with_shell(&weak, move |shell, _| shell.handle_audio_play(index)),
            )?;
            for event in ["pause", "ended"] {
                self.listen(
                    &track.player,
                    event,
                    with_shell(&weak, move |shell, _| shell.handle_audio_stop(index)),
                )?;
            }
        }

        Ok(())
    }

    fn listen(
        &self,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), UiError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(dom_error)?;
        self.bindings.borrow_mut().push(Binding {
            target: target.clone(),
            event,
            callback,
        });
        Ok(())
    }

    /// Print the styled welcome lines and log what was bound.
    pub(crate) fn announce(&self) {
        if self.layer.borrow().config().show_banner {
            for line in BANNER {
                web_sys::console::log_2(&JsValue::from(line.format()), &JsValue::from(line.css));
            }
        }
        let counts = self.counts();
        info!(
            nav_links = counts.nav_links,
            sections = counts.sections,
            expanders = counts.expanders,
            cards = counts.cards,
            tracks = counts.tracks,
            buttons = counts.buttons,
            "behavior layer attached"
        );
    }

    /// Remove listeners, observers, timers and injected nodes.
    pub(crate) fn detach(&self) {
        for binding in self.bindings.borrow_mut().drain(..) {
            if let Err(err) = binding.target.remove_event_listener_with_callback(
                binding.event,
                binding.callback.as_ref().unchecked_ref(),
            ) {
                warn!(event = binding.event, error = ?err, "listener removal failed");
            }
        }
        let observer = self.observer.borrow_mut().take();
        if let Some((observer, _callback)) = observer {
            observer.disconnect();
            self.release_cards();
        }
        let pending: Vec<PendingRipple> = self
            .ripples
            .borrow_mut()
            .drain()
            .map(|(_, ripple)| ripple)
            .collect();
        for ripple in pending {
            self.window.clear_timeout_with_handle(ripple.timeout);
            ripple.overlay.remove();
        }
        self.layer.borrow_mut().drain_ripples();
        if let Some(style) = self.injected_style.borrow_mut().take() {
            style.remove();
        }
        debug!("behavior layer detached");
    }

    // --- init-time mutations ----------------------------------------------

    fn apply_lazy_hints(&self) {
        for frame in &self.video_frames {
            if !needs_lazy_hint(frame.get_attribute(LAZY_LOADING_ATTR).as_deref()) {
                continue;
            }
            if let Err(err) = frame.set_attribute(LAZY_LOADING_ATTR, LAZY_LOADING_VALUE) {
                warn!(error = ?err, "could not mark video frame lazy");
            }
        }
    }

    fn inject_ripple_styles(&self) -> Result<(), UiError> {
        let Some(head) = self.document.head() else {
            debug!("document has no <head>; ripple styles not injected");
            return Ok(());
        };
        let style = self.document.create_element("style").map_err(dom_error)?;
        style.set_text_content(Some(RIPPLE_STYLESHEET));
        head.append_child(&style).map_err(dom_error)?;
        *self.injected_style.borrow_mut() = Some(style);
        Ok(())
    }

    /// Cards are hidden only once the observer exists.
    fn observe_cards(self: &Rc<Self>) -> Result<(), UiError> {
        if self.cards.is_empty() {
            return Ok(());
        }

        let weak = Rc::downgrade(self);
        let callback =
            ObserverCallback::new(move |entries: Array, _observer: IntersectionObserver| {
                if let Some(shell) = weak.upgrade() {
                    shell.handle_intersections(&entries);
                }
            });

        let options = self.layer.borrow().reveal_options();
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(dom_error)?;

        for card in &self.cards {
            apply_card_style(card, HIDDEN_CARD);
            set_style(card, "transition", CARD_TRANSITION);
            observer.observe(card);
        }
        *self.observer.borrow_mut() = Some((observer, callback));
        Ok(())
    }

    /// Drop the inline reveal styles from cards that never became visible.
    fn release_cards(&self) {
        let hidden = self.layer.borrow().unrevealed_cards();
        for card in hidden.iter().filter_map(|index| self.cards.get(*index)) {
            for property in ["opacity", "transform", "transition"] {
                clear_style(card, property);
            }
        }
        debug!(released = hidden.len(), "unrevealed cards restored");
    }

    // --- navigation -------------------------------------------------------

    fn render_menu(&self, update: MenuUpdate) {
        if let Some(menu) = &self.nav_menu {
            set_class(menu, MENU_OPEN_CLASS, update.open);
        }
        let Some(toggle) = &self.nav_toggle else {
            return;
        };
        let bars = toggle
            .query_selector_all(ICON_BAR_SELECTOR)
            .map(elements)
            .unwrap_or_default();
        for (bar, style) in cast::<HtmlElement>(bars).iter().zip(update.icon.bar_styles()) {
            set_style(bar, style.property, style.value);
        }
    }

    fn handle_toggle_click(&self) {
        let update = self.layer.borrow_mut().on_toggle_click();
        self.render_menu(update);
    }

    fn handle_nav_link_close(&self) {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(f64::INFINITY);
        let update = self.layer.borrow_mut().on_nav_link_click(width);
        if let Some(update) = update {
            self.render_menu(update);
        }
    }

    fn handle_document_click(&self, event: &Event) {
        let Some(target) = event.target().and_then(|target| target.dyn_into::<Node>().ok()) else {
            return;
        };
        let contains = |element: &Option<Element>| {
            element
                .as_ref()
                .is_some_and(|element| element.contains(Some(&target)))
        };
        let inside_nav = contains(&self.nav_menu) || contains(&self.nav_toggle);
        let update = self.layer.borrow_mut().on_document_click(inside_nav);
        if let Some(update) = update {
            self.render_menu(update);
        }
    }

    fn handle_smooth_scroll(&self, link: &Element, event: &Event) {
        let Some(href) = link.get_attribute("href") else {
            return;
        };
        if !is_in_page(&href) {
            return;
        }
        event.prevent_default();
        let Some(id) = fragment_target(&href) else {
            return;
        };

        let section_top = self
            .document
            .get_element_by_id(id)
            .and_then(|section| section.dyn_into::<HtmlElement>().ok())
            .map(|section| f64::from(section.offset_top()));
        let navbar_height = self
            .navbar
            .as_ref()
            .map_or(0.0, |navbar| f64::from(navbar.offset_height()));
        let target = self
            .layer
            .borrow()
            .smooth_scroll_target(section_top, navbar_height);
        let Some(top) = target else {
            debug!(section = id, "nav link target not found");
            return;
        };

        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    // --- scrolling --------------------------------------------------------

    fn scroll_offset(&self) -> f64 {
        self.window
            .page_y_offset()
            .ok()
            .filter(|offset| *offset != 0.0)
            .or_else(|| {
                self.document
                    .document_element()
                    .map(|root| f64::from(root.scroll_top()))
            })
            .unwrap_or(0.0)
    }

    fn handle_scroll(&self) {
        let offset = self.scroll_offset();
        let ranges: Vec<SectionRange> = self
            .sections
            .iter()
            .map(|section| {
                SectionRange::new(
                    section.id(),
                    f64::from(section.offset_top()),
                    f64::from(section.offset_height()),
                )
            })
            .collect();
        let update = self.layer.borrow_mut().on_scroll(offset, &ranges);

        if let Some(navbar) = &self.navbar {
            set_style(navbar, "box-shadow", update.shadow.css());
        }
        if let Some(link) = update.highlight {
            self.render_active_link(link.as_deref());
        }
    }

    fn render_active_link(&self, target: Option<&str>) {
        for link in &self.nav_links {
            set_class(link, ACTIVE_LINK_CLASS, false);
        }
        let Some(target) = target else {
            return;
        };
        let marked = self.nav_links.iter().find(|link| {
            link.get_attribute("href")
                .as_deref()
                .and_then(fragment_target)
                == Some(target)
        });
        if let Some(link) = marked {
            set_class(link, ACTIVE_LINK_CLASS, true);
        }
    }

    // --- descriptions -----------------------------------------------------

    fn handle_see_more(&self, index: usize) {
        let Some(expander) = self.layer.borrow_mut().on_see_more_click(index) else {
            return;
        };
        let Some(entry) = self.descriptions.get(index) else {
            return;
        };
        set_class(&entry.description, EXPANDED_CLASS, expander.is_expanded());
        entry.button.set_text_content(Some(expander.label()));
        if let Err(err) = entry
            .button
            .set_attribute("aria-expanded", expander.aria_expanded())
        {
            warn!(error = ?err, "aria-expanded write failed");
        }
    }

    // --- reveal -----------------------------------------------------------

    fn handle_intersections(&self, entries: &Array) {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let target = JsValue::from(entry.target());
            let Some(index) = self
                .cards
                .iter()
                .position(|card| AsRef::<JsValue>::as_ref(card) == &target)
            else {
                continue;
            };
            let revealed = self
                .layer
                .borrow_mut()
                .on_card_intersection(index, entry.is_intersecting());
            if revealed {
                apply_card_style(&self.cards[index], VISIBLE_CARD);
            }
        }
    }

    // --- ripples ----------------------------------------------------------

    fn handle_button_click(self: &Rc<Self>, button: &HtmlElement, event: &Event) {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let bounds = button.get_bounding_client_rect();
        let rect = ButtonRect {
            left: bounds.left(),
            top: bounds.top(),
            width: bounds.width(),
            height: bounds.height(),
        };
        let spawn = {
            let mut layer = self.layer.borrow_mut();
            layer.set_time(self.now());
            layer.on_button_click(rect, f64::from(mouse.client_x()), f64::from(mouse.client_y()))
        };

        let overlay = self
            .document
            .create_element("span")
            .ok()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        let Some(overlay) = overlay else {
            warn!("could not create ripple overlay");
            self.layer.borrow_mut().cancel_ripple(spawn.id);
            return;
        };
        let size = px(spawn.geometry.size);
        set_style(&overlay, "width", &size);
        set_style(&overlay, "height", &size);
        set_style(&overlay, "left", &px(spawn.geometry.left));
        set_style(&overlay, "top", &px(spawn.geometry.top));
        set_class(&overlay, RIPPLE_CLASS, true);
        if let Err(err) = button.append_child(&overlay) {
            warn!(error = ?err, "could not attach ripple overlay");
            self.layer.borrow_mut().cancel_ripple(spawn.id);
            return;
        }

        let weak = Rc::downgrade(self);
        let id = spawn.id;
        let callback = Closure::once_into_js(move || {
            if let Some(shell) = weak.upgrade() {
                shell.handle_ripple_timer(id);
            }
        });
        let delay = i32::try_from(spawn.lifetime.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            Ok(timeout) => {
                self.ripples
                    .borrow_mut()
                    .insert(id, PendingRipple { overlay, timeout });
            }
            Err(err) => {
                warn!(error = ?err, "could not schedule ripple removal");
                overlay.remove();
                self.layer.borrow_mut().cancel_ripple(id);
            }
        }
    }

    fn handle_ripple_timer(&self, id: RippleId) {
        let due = {
            let mut layer = self.layer.borrow_mut();
            layer.set_time(self.now());
            layer.on_ripple_timer(id)
        };
        let removed: Vec<PendingRipple> = {
            let mut pending = self.ripples.borrow_mut();
            due.iter().filter_map(|id| pending.remove(id)).collect()
        };
        trace!(removed = removed.len(), "ripple overlays expired");
        for ripple in removed {
            ripple.overlay.remove();
        }
    }

    // --- audio ------------------------------------------------------------

    fn handle_audio_play(&self, index: usize) {
        let outcome = self.layer.borrow_mut().on_audio_play(index, |other| {
            self.tracks
                .get(other)
                .is_none_or(|track| track.player.paused())
        });
        self.render_tracks();
        for other in outcome.pause {
            let Some(track) = self.tracks.get(other) else {
                continue;
            };
            if let Err(err) = track.player.pause() {
                warn!(track = other, error = ?err, "could not pause audio player");
            }
        }
    }

    fn handle_audio_stop(&self, index: usize) {
        let changed = self.layer.borrow_mut().on_audio_stop(index);
        if changed {
            if let Some(track) = self.tracks.get(index) {
                set_class(&track.container, PLAYING_CLASS, false);
            }
        }
    }

    fn render_tracks(&self) {
        let playing: Vec<bool> = {
            let layer = self.layer.borrow();
            (0..self.tracks.len())
                .map(|index| layer.is_track_playing(index))
                .collect()
        };
        for (track, playing) in self.tracks.iter().zip(playing) {
            set_class(&track.container, PLAYING_CLASS, playing);
        }
    }
}
