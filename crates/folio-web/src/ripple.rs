#![forbid(unsafe_code)]

//! Click ripple overlays for `.btn` controls.
//!
//! Each click spawns an independent overlay; rapid clicks overlap. Every
//! overlay is tracked by a [`RippleHandle`] with a deadline on the host-driven
//! clock, so the shell can remove expired overlays and cancel pending ones
//! without leaking timers.

use core::time::Duration;

/// Controls that get a ripple on click.
pub const BUTTON_SELECTOR: &str = ".btn";
/// Class on the transient overlay element.
pub const RIPPLE_CLASS: &str = "ripple";

/// Rules injected once at init: clip overlays to the button and define the
/// scale-and-fade keyframe.
pub const RIPPLE_STYLESHEET: &str = r"
.btn {
    position: relative;
    overflow: hidden;
}

.ripple {
    position: absolute;
    border-radius: 50%;
    background: rgba(255, 255, 255, 0.6);
    transform: scale(0);
    animation: ripple-animation 0.6s ease-out;
    pointer-events: none;
}

@keyframes ripple-animation {
    to {
        transform: scale(4);
        opacity: 0;
    }
}
";

/// Bounding rect of the clicked button, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Size and position of an overlay relative to its button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    /// Diameter; the overlay is square before `border-radius` rounds it.
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleGeometry {
    /// Center a circle on the click point, sized to the button's larger side.
    #[must_use]
    pub fn from_click(rect: ButtonRect, client_x: f64, client_y: f64) -> Self {
        let size = rect.width.max(rect.height);
        Self {
            size,
            left: client_x - rect.left - size / 2.0,
            top: client_y - rect.top - size / 2.0,
        }
    }
}

/// CSS pixel length.
#[must_use]
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// Identifier of one overlay, unique for the lifetime of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RippleId(pub u64);

/// Pending removal of one overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RippleHandle {
    pub id: RippleId,
    pub deadline: Duration,
}

/// Owns the handles of every overlay still in the document.
#[derive(Debug, Default, Clone)]
pub struct RippleRegistry {
    next_id: u64,
    pending: Vec<RippleHandle>,
}

impl RippleRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Register a new overlay that must be gone `lifetime` after `now`.
    pub fn spawn(&mut self, now: Duration, lifetime: Duration) -> RippleHandle {
        let handle = RippleHandle {
            id: RippleId(self.next_id),
            deadline: now.saturating_add(lifetime),
        };
        self.next_id += 1;
        self.pending.push(handle);
        handle
    }

    /// Remove and return every handle whose deadline has passed.
    pub fn expire(&mut self, now: Duration) -> Vec<RippleId> {
        let mut due = Vec::new();
        self.pending.retain(|handle| {
            if handle.deadline <= now {
                due.push(handle.id);
                false
            } else {
                true
            }
        });
        due
    }

    /// Drop a pending handle. Returns false if it was already gone.
    pub fn cancel(&mut self, id: RippleId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|handle| handle.id != id);
        self.pending.len() != before
    }

    /// Drop every pending handle, returning their ids.
    pub fn drain(&mut self) -> Vec<RippleId> {
        self.pending.drain(..).map(|handle| handle.id).collect()
    }

    #[must_use]
    pub fn contains(&self, id: RippleId) -> bool {
        self.pending.iter().any(|handle| handle.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
