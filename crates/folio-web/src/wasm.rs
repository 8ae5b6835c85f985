#![forbid(unsafe_code)]

use std::rc::Rc;

use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AddEventListenerOptions, Document};

use crate::config::BehaviorConfig;
use crate::dom::{PageShell, dom_error};
use crate::error::UiError;
use crate::logging::init_console_logging;

impl From<UiError> for JsValue {
    fn from(err: UiError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Turn the optional JS options object into a validated config.
fn parse_options(options: Option<JsValue>) -> Result<BehaviorConfig, UiError> {
    let Some(options) = options.filter(|value| !value.is_undefined() && !value.is_null()) else {
        return Ok(BehaviorConfig::default());
    };
    let text = js_sys::JSON::stringify(&options).map_err(dom_error)?;
    BehaviorConfig::from_json(&String::from(text))
}

/// Resolve once the document has been parsed.
async fn dom_ready(document: &Document) -> Result<(), UiError> {
    let state = js_sys::Reflect::get(document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|state| state.as_string());
    if state.as_deref() != Some("loading") {
        return Ok(());
    }

    let mut result = Ok(());
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        result = document
            .add_event_listener_with_callback_and_add_event_listener_options(
                "DOMContentLoaded",
                &resolve,
                &options,
            )
            .map_err(dom_error);
    });
    result?;
    JsFuture::from(promise).await.map_err(dom_error)?;
    Ok(())
}

/// Portfolio page behavior layer, exported to JS.
///
/// ```js
/// const folio = new FolioWeb();
/// await folio.init({ mobileBreakpoint: 768 });
/// ```
#[wasm_bindgen]
pub struct FolioWeb {
    initialized: bool,
    shell: Option<Rc<PageShell>>,
}

#[wasm_bindgen]
impl FolioWeb {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            initialized: false,
            shell: None,
        }
    }

    /// Bind to the current document once it is parsed.
    ///
    /// Exported as an async JS function returning a Promise. Calling it again
    /// on an initialized instance is a no-op.
    pub async fn init(&mut self, options: Option<JsValue>) -> Result<(), JsValue> {
        if self.initialized {
            debug!("init called twice; ignoring");
            return Ok(());
        }
        let config = parse_options(options)?;
        init_console_logging(config.log_level.to_tracing());

        let window = web_sys::window().ok_or(UiError::NoWindow)?;
        let document = window.document().ok_or(UiError::NoDocument)?;
        dom_ready(&document).await?;

        let shell = PageShell::bind(window, document, config)?;
        if let Err(err) = shell.attach() {
            shell.detach();
            return Err(err.into());
        }
        shell.announce();

        self.shell = Some(shell);
        self.initialized = true;
        Ok(())
    }

    /// JSON summary of the elements bound at init.
    #[wasm_bindgen(js_name = bindingCounts)]
    pub fn binding_counts(&self) -> String {
        let counts = self
            .shell
            .as_ref()
            .map(|shell| shell.counts())
            .unwrap_or_default();
        serde_json::to_string(&counts).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = menuOpen)]
    pub fn menu_open(&self) -> bool {
        self.shell
            .as_ref()
            .is_some_and(|shell| shell.layer().menu_open())
    }

    /// Fragment id of the highlighted nav link, if any.
    #[wasm_bindgen(js_name = activeLink)]
    pub fn active_link(&self) -> Option<String> {
        self.shell
            .as_ref()
            .and_then(|shell| shell.layer().active_link().map(str::to_owned))
    }

    /// Explicit teardown for JS callers: detaches every listener, disconnects
    /// the reveal observer and removes pending ripple overlays.
    pub fn destroy(&mut self) {
        if let Some(shell) = self.shell.take() {
            shell.detach();
        }
        self.initialized = false;
    }
}
