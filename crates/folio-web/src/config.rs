#![forbid(unsafe_code)]

//! Tunable thresholds for the behavior layer.
//!
//! Every field has a default matching the page's stylesheet, so hosts normally
//! call `init()` without options. When options are passed they are plain JSON
//! with camelCase keys; missing keys fall back to the defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::UiError;

/// Viewport width (CSS px) at or below which nav-link clicks close the menu.
pub const DEFAULT_MOBILE_BREAKPOINT: f64 = 768.0;
/// Scroll offset (CSS px) above which the navbar gets the elevated shadow.
pub const DEFAULT_ELEVATION_THRESHOLD: f64 = 50.0;
/// How far above a section's top the highlight range starts.
pub const DEFAULT_SECTION_OFFSET: f64 = 100.0;
/// Fraction of a card that must be visible before it is revealed.
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
/// Bottom root margin (CSS px) shrinking the effective viewport for reveals.
pub const DEFAULT_REVEAL_BOTTOM_MARGIN: f64 = 100.0;
/// Lifetime of a ripple overlay; matches the 0.6s keyframe.
pub const DEFAULT_RIPPLE_LIFETIME_MS: u32 = 600;

/// Minimum level routed to the browser console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

/// Configuration for the behavior layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BehaviorConfig {
    pub mobile_breakpoint: f64,
    pub elevation_threshold: f64,
    pub section_offset: f64,
    pub reveal_threshold: f64,
    pub reveal_bottom_margin: f64,
    pub ripple_lifetime_ms: u32,
    pub log_level: LogLevel,
    /// Print the styled welcome lines after init.
    pub show_banner: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            elevation_threshold: DEFAULT_ELEVATION_THRESHOLD,
            section_offset: DEFAULT_SECTION_OFFSET,
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            reveal_bottom_margin: DEFAULT_REVEAL_BOTTOM_MARGIN,
            ripple_lifetime_ms: DEFAULT_RIPPLE_LIFETIME_MS,
            log_level: LogLevel::Info,
            show_banner: true,
        }
    }
}

impl BehaviorConfig {
    /// Parse a JSON options object and validate it.
    ///
    /// `null` and the empty string both yield the defaults.
    pub fn from_json(text: &str) -> Result<Self, UiError> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(Self::default());
        }
        let config: Self =
            serde_json::from_str(trimmed).map_err(|err| UiError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), UiError> {
        if !self.mobile_breakpoint.is_finite() || self.mobile_breakpoint < 0.0 {
            return Err(UiError::Config(
                "mobileBreakpoint must be a non-negative number".into(),
            ));
        }
        if !self.elevation_threshold.is_finite() || !self.section_offset.is_finite() {
            return Err(UiError::Config(
                "elevationThreshold and sectionOffset must be finite".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(UiError::Config(
                "revealThreshold must be within [0, 1]".into(),
            ));
        }
        if !self.reveal_bottom_margin.is_finite() || self.reveal_bottom_margin < 0.0 {
            return Err(UiError::Config(
                "revealBottomMargin must be a non-negative number".into(),
            ));
        }
        if self.ripple_lifetime_ms == 0 {
            return Err(UiError::Config("rippleLifetimeMs must be positive".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn ripple_lifetime(&self) -> Duration {
        Duration::from_millis(u64::from(self.ripple_lifetime_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_and_null_yield_defaults() {
        assert_eq!(BehaviorConfig::from_json("").unwrap(), BehaviorConfig::default());
        assert_eq!(BehaviorConfig::from_json(" null ").unwrap(), BehaviorConfig::default());
    }

    #[test]
    fn partial_options_keep_remaining_defaults() {
        let config =
            BehaviorConfig::from_json(r#"{"mobileBreakpoint": 900, "logLevel": "debug"}"#)
                .unwrap();
        assert_eq!(config.mobile_breakpoint, 900.0);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.elevation_threshold, DEFAULT_ELEVATION_THRESHOLD);
        assert_eq!(config.ripple_lifetime(), Duration::from_millis(600));
        assert!(config.show_banner);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = BehaviorConfig::from_json(r#"{"revealThreshold": 1.5}"#).unwrap_err();
        assert!(matches!(err, UiError::Config(_)));

        let err = BehaviorConfig::from_json(r#"{"rippleLifetimeMs": 0}"#).unwrap_err();
        assert!(matches!(err, UiError::Config(_)));

        let err = BehaviorConfig::from_json(r#"{"mobileBreakpoint": -1}"#).unwrap_err();
        assert!(matches!(err, UiError::Config(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = BehaviorConfig::from_json("{mobileBreakpoint:").unwrap_err();
        assert!(matches!(err, UiError::Config(_)));
    }

    #[test]
    fn log_level_maps_to_tracing() {
        assert_eq!(LogLevel::Warn.to_tracing(), tracing::Level::WARN);
        assert_eq!(LogLevel::Trace.to_tracing(), tracing::Level::TRACE);
    }
}
