#![forbid(unsafe_code)]

//! WASM behavior layer for a static portfolio page.
//!
//! The crate has two halves:
//! - a deterministic core (every module except `wasm`/`dom`) that owns the UI
//!   state and is driven by host-supplied measurements (scroll offsets, section
//!   geometry, viewport width, click points, time), and
//! - a thin `wasm-bindgen` shell that locates DOM elements, attaches listeners,
//!   feeds the core and writes the resulting classes and inline styles back.
//!
//! Everything observable about the page (menu open state, navbar shadow, the
//! active nav link, expanded descriptions, revealed cards, pending ripples and
//! the playing audio track) lives in [`BehaviorLayer`] and can be exercised
//! natively without a browser.

pub mod audio;
pub mod banner;
pub mod clock;
pub mod config;
pub mod error;
pub mod expand;
pub mod layer;
pub mod logging;
pub mod media;
pub mod nav;
pub mod reveal;
pub mod ripple;
pub mod scroll;
pub mod smooth_scroll;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use config::BehaviorConfig;
pub use error::UiError;
pub use layer::{BehaviorLayer, BindingCounts};

#[cfg(target_arch = "wasm32")]
pub use wasm::FolioWeb;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct FolioWeb;

#[cfg(not(target_arch = "wasm32"))]
impl FolioWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
