#![forbid(unsafe_code)]

use std::fmt;

/// Failures at the boundary between the behavior layer and its host.
///
/// Event handlers never produce these: a missing element or an unresolvable
/// scroll target is a silent no-op. Only initialization (locating the window,
/// parsing options, attaching listeners) can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// No global `window` (e.g. running inside a worker).
    NoWindow,
    /// The window has no document attached.
    NoDocument,
    /// A DOM call threw.
    Dom(String),
    /// The options object could not be parsed or failed validation.
    Config(String),
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "no global window available"),
            Self::NoDocument => write!(f, "window has no document"),
            Self::Dom(msg) => write!(f, "DOM call failed: {msg}"),
            Self::Config(msg) => write!(f, "invalid behavior config: {msg}"),
        }
    }
}

impl std::error::Error for UiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        assert_eq!(
            UiError::Config("revealThreshold must be within [0, 1]".into()).to_string(),
            "invalid behavior config: revealThreshold must be within [0, 1]"
        );
        assert_eq!(UiError::NoWindow.to_string(), "no global window available");
    }
}
