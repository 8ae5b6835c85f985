#![forbid(unsafe_code)]

//! Tracing layer that writes formatted events to a console sink.
//!
//! In the browser the sink is `window.console`, with the tracing level mapped
//! onto `console.error/warn/info/debug`. Natively (tests) a [`CaptureSink`]
//! collects the formatted lines instead.
//!
//! ```ignore
//! use folio_web::logging::{ConsoleLayer, CaptureSink};
//! use tracing_subscriber::prelude::*;
//!
//! let sink = CaptureSink::default();
//! let layer = ConsoleLayer::new(sink.clone(), tracing::Level::DEBUG);
//! let _guard = tracing_subscriber::registry().with(layer).set_default();
//! tracing::info!(cards = 4, "bound");
//! assert_eq!(sink.lines()[0].1, "INFO  folio_web: bound cards=4");
//! ```

use std::fmt::{self, Write as FmtWrite};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Format level as a fixed-width string.
fn level_str(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN ",
        Level::INFO => "INFO ",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// Extracts message and structured fields from a tracing event.
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.fields.push((field.name().to_string(), rendered));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
}

/// Render one event as `LEVEL target: message key=value ...`.
fn format_event(event: &Event<'_>) -> String {
    let meta = event.metadata();
    let mut visitor = EventVisitor::default();
    event.record(&mut visitor);

    let mut line = String::new();
    let _ = write!(line, "{} {}:", level_str(*meta.level()), meta.target());
    if let Some(message) = visitor.message {
        let _ = write!(line, " {message}");
    }
    for (name, value) in visitor.fields {
        let _ = write!(line, " {name}={value}");
    }
    line
}

/// Destination for formatted log lines.
pub trait ConsoleSink: Send + Sync + 'static {
    fn write_line(&self, level: Level, line: &str);
}

/// In-memory sink; clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl CaptureSink {
    #[must_use]
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl ConsoleSink for CaptureSink {
    fn write_line(&self, level: Level, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, line.to_string()));
        }
    }
}

/// `tracing_subscriber` layer routing events at or above `max_level` to a sink.
pub struct ConsoleLayer<K: ConsoleSink> {
    sink: K,
    max_level: Level,
}

impl<K: ConsoleSink> ConsoleLayer<K> {
    #[must_use]
    pub fn new(sink: K, max_level: Level) -> Self {
        Self { sink, max_level }
    }
}

impl<S, K> Layer<S> for ConsoleLayer<K>
where
    S: Subscriber,
    K: ConsoleSink,
{
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        *metadata.level() <= self.max_level
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() > self.max_level {
            return;
        }
        self.sink
            .write_line(*event.metadata().level(), &format_event(event));
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use tracing::Level;
    use tracing_subscriber::prelude::*;
    use wasm_bindgen::JsValue;

    use super::{ConsoleLayer, ConsoleSink};

    /// Writes to `window.console`.
    pub struct BrowserConsole;

    impl ConsoleSink for BrowserConsole {
        fn write_line(&self, level: Level, line: &str) {
            let line = JsValue::from_str(line);
            match level {
                Level::ERROR => web_sys::console::error_1(&line),
                Level::WARN => web_sys::console::warn_1(&line),
                Level::INFO => web_sys::console::info_1(&line),
                Level::DEBUG | Level::TRACE => web_sys::console::debug_1(&line),
            }
        }
    }

    /// Install the console layer as the global subscriber.
    ///
    /// A second call (or a host that already installed a subscriber) is a no-op.
    pub fn init_console_logging(max_level: Level) {
        let _ = tracing_subscriber::registry()
            .with(ConsoleLayer::new(BrowserConsole, max_level))
            .try_init();
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserConsole, init_console_logging};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracing_subscriber::prelude::*;

    fn capture(max_level: Level, emit: impl FnOnce()) -> Vec<(Level, String)> {
        let sink = CaptureSink::default();
        let subscriber =
            tracing_subscriber::registry().with(ConsoleLayer::new(sink.clone(), max_level));
        tracing::subscriber::with_default(subscriber, emit);
        sink.lines()
    }

    #[test]
    fn formats_level_target_message_and_fields() {
        let lines = capture(Level::DEBUG, || {
            tracing::info!(target: "folio", cards = 4, "bound");
        });
        assert_eq!(lines, vec![(Level::INFO, "INFO  folio: bound cards=4".to_string())]);
    }

    #[test]
    fn string_fields_render_without_quotes() {
        let lines = capture(Level::INFO, || {
            tracing::warn!(target: "folio", section = "projects", "missing link");
        });
        assert_eq!(lines[0].1, "WARN  folio: missing link section=projects");
    }

    #[test]
    fn events_below_max_level_are_dropped() {
        let lines = capture(Level::WARN, || {
            tracing::debug!("noisy");
            tracing::info!("still noisy");
            tracing::error!(target: "folio", "kept");
        });
        assert_eq!(lines, vec![(Level::ERROR, "ERROR folio: kept".to_string())]);
    }
}
