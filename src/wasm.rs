//! Browser glue.
//!
//! [`FolioViewer`] is the JavaScript-facing handle. The host page passes a
//! delegate object whose methods do the DOM work; each [`Renderer`] call is
//! forwarded to the delegate method of the same name in camelCase (missing
//! methods are skipped). History goes through `window.history` and listings
//! are retrieved with `fetch`.
//!
//! Delegate methods must not call back into the viewer synchronously; such
//! calls are dropped with a warning.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, JSON, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response, Window};

use crate::{
    ControlKind, FetchResponse, HistoryEntry, ImageBlock, ListingRequest, NavigationHistory,
    Placement, Renderer, ViewTransform, Viewer, ViewerConfig,
};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    // The level is narrowed once a viewer reads its config
    if let Err(e) = console_log::init_with_level(log::Level::Trace) {
        web_sys::console::error_1(&format!("Failed to install logger: {}", e).into());
    }
    log::info!("folio {} loaded", env!("CARGO_PKG_VERSION"));
}

/// The per-image controls as `{ name, title }` objects, in display order.
///
/// `name` tags the control element and is what `controlClick` expects;
/// `title` is its tooltip.
#[wasm_bindgen(js_name = controls)]
pub fn controls() -> Result<Array, JsValue> {
    ControlKind::all()
        .iter()
        .map(|kind| {
            let control = Object::new();
            Reflect::set(&control, &"name".into(), &kind.name().into())?;
            Reflect::set(&control, &"title".into(), &kind.title().into())?;
            Ok(JsValue::from(control))
        })
        .collect()
}

/// Forwards renderer calls to a JavaScript delegate object.
struct JsRenderer {
    delegate: JsValue,
    window: Window,
}

impl JsRenderer {
    fn call(&self, method: &str, args: &[JsValue]) {
        let Some(function) = Reflect::get(&self.delegate, &JsValue::from_str(method))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
        else {
            log::trace!("Delegate has no '{}'", method);
            return;
        };

        let args: Array = args.iter().collect();
        if let Err(e) = function.apply(&self.delegate, &args) {
            log::error!("Delegate '{}' failed: {}", method, describe(&e));
        }
    }
}

impl Renderer for JsRenderer {
    fn clear_display(&mut self) {
        self.call("clearDisplay", &[]);
    }

    fn show_error(&mut self, message: &str) {
        self.call("showError", &[message.into()]);
    }

    fn show_folder_info(&mut self, folder: &str, subfolders: &[String]) {
        let subfolders: Array = subfolders
            .iter()
            .map(|name| JsValue::from_str(name))
            .collect();
        self.call("showFolderInfo", &[folder.into(), subfolders.into()]);
    }

    fn materialize_batch(&mut self, blocks: &[ImageBlock], placement: Placement) {
        let blocks = match serde_json::to_string(blocks)
            .map_err(|e| JsValue::from_str(&e.to_string()))
            .and_then(|json| JSON::parse(&json))
        {
            Ok(blocks) => blocks,
            Err(e) => {
                log::error!("Failed to pass image blocks to the page: {}", describe(&e));
                return;
            }
        };
        let placement = match placement {
            Placement::Append => "append",
            Placement::Prepend => "prepend",
        };
        self.call("materializeBatch", &[blocks, placement.into()]);
    }

    fn show_progress(&mut self, loaded: usize, total: usize) {
        self.call(
            "showProgress",
            &[(loaded as f64).into(), (total as f64).into()],
        );
    }

    fn hide_progress(&mut self) {
        self.call("hideProgress", &[]);
    }

    fn set_selected(&mut self, id: &str, selected: bool) {
        self.call("setSelected", &[id.into(), selected.into()]);
    }

    fn set_recently_closed(&mut self, id: &str, marked: bool) {
        self.call("setRecentlyClosed", &[id.into(), marked.into()]);
    }

    fn scroll_into_view(&mut self, id: &str) {
        self.call("scrollIntoView", &[id.into()]);
    }

    fn apply_transform(&mut self, id: &str, transform: ViewTransform) {
        self.call(
            "applyTransform",
            &[
                id.into(),
                transform.rotation_css().into(),
                transform.scale_css().into(),
            ],
        );
    }

    fn open_external(&mut self, url: &str) {
        if let Err(e) = self.window.open_with_url_and_target(url, "_blank") {
            log::warn!("Failed to open {}: {}", url, describe(&e));
        }
    }

    fn preload_image(&mut self, path: &str) {
        self.call("preloadImage", &[path.into()]);
    }
}

/// `window.history` and `window.location`.
pub struct BrowserHistory {
    window: Window,
}

impl NavigationHistory for BrowserHistory {
    fn current_url(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn push(&mut self, entry: HistoryEntry) {
        let state = JsValue::from_f64(entry.pushed_at_ms as f64);
        let result = self
            .window
            .history()
            .and_then(|history| history.push_state_with_url(&state, "", Some(entry.url.as_str())));
        if let Err(e) = result {
            log::warn!("Failed to push {}: {}", entry.url, describe(&e));
        }
    }

    fn clear_fragment(&mut self) {
        let url = self.location().without_fragment();
        let result = self
            .window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(url.as_str())));
        if let Err(e) = result {
            log::warn!("Failed to clear the location fragment: {}", describe(&e));
        }
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

async fn fetch(window: &Window, url: &str) -> Result<FetchResponse, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    let body = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .unwrap_or_default();

    Ok(FetchResponse {
        status: response.status(),
        body,
    })
}

type SharedViewer = Rc<RefCell<Viewer<JsRenderer, BrowserHistory>>>;

/// A gallery viewer bound to the current page.
#[wasm_bindgen]
pub struct FolioViewer {
    viewer: SharedViewer,
    window: Window,
}

#[wasm_bindgen]
impl FolioViewer {
    /// Create a viewer. `config_json` is an optional `ViewerConfig` as JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(delegate: JsValue, config_json: Option<String>) -> Result<FolioViewer, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let config = match config_json {
            Some(json) => {
                ViewerConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => ViewerConfig::default(),
        };
        log::set_max_level(config.log_level.to_level_filter());

        let renderer = JsRenderer {
            delegate,
            window: window.clone(),
        };
        let history = BrowserHistory {
            window: window.clone(),
        };
        let viewer = Self {
            viewer: Rc::new(RefCell::new(Viewer::new(config, renderer, history))),
            window,
        };
        viewer.listen_for_pop_state()?;
        Ok(viewer)
    }

    /// Fetch the folder named by the page or config, if any.
    pub fn start(&self) {
        if let Some(request) = self.with_viewer(|viewer| viewer.initial_request()).flatten() {
            self.spawn_fetch(request);
        }
    }

    #[wasm_bindgen(js_name = setFolder)]
    pub fn set_folder(&self, folder: &str) {
        if let Some(request) = self.with_viewer(|viewer| viewer.set_folder(folder)) {
            self.spawn_fetch(request);
        }
    }

    #[wasm_bindgen(js_name = loadManifest)]
    pub fn load_manifest(&self, uri: &str) {
        if let Some(request) = self.with_viewer(|viewer| viewer.load_manifest(uri)) {
            self.spawn_fetch(request);
        }
    }

    #[wasm_bindgen(js_name = openParentFolder)]
    pub fn open_parent_folder(&self) {
        if let Some(request) = self.with_viewer(|viewer| viewer.open_parent_folder()) {
            self.spawn_fetch(request);
        }
    }

    #[wasm_bindgen(js_name = openSubfolder)]
    pub fn open_subfolder(&self, index: usize) {
        if let Some(request) = self
            .with_viewer(|viewer| viewer.open_subfolder(index))
            .flatten()
        {
            self.spawn_fetch(request);
        }
    }

    /// Call from each image's load event.
    #[wasm_bindgen(js_name = imageLoaded)]
    pub fn image_loaded(&self, id: &str) {
        self.with_viewer(|viewer| viewer.image_loaded(id));
    }

    /// Call from a control's click handler with the control's name.
    #[wasm_bindgen(js_name = controlClick)]
    pub fn control_click(&self, control: &str, id: &str) -> bool {
        let Some(kind) = ControlKind::from_name(control) else {
            log::warn!("Unknown control '{}'", control);
            return false;
        };
        self.with_viewer(|viewer| viewer.control_click(kind, id))
            .unwrap_or(false)
    }
}

impl FolioViewer {
    fn with_viewer<T>(
        &self,
        f: impl FnOnce(&mut Viewer<JsRenderer, BrowserHistory>) -> T,
    ) -> Option<T> {
        match self.viewer.try_borrow_mut() {
            Ok(mut viewer) => Some(f(&mut viewer)),
            Err(_) => {
                log::warn!("Viewer is busy; dropping re-entrant call");
                None
            }
        }
    }

    fn listen_for_pop_state(&self) -> Result<(), JsValue> {
        let viewer = Rc::clone(&self.viewer);
        let on_pop_state = Closure::wrap(Box::new(move || {
            if let Ok(mut viewer) = viewer.try_borrow_mut() {
                viewer.pop_state();
            }
        }) as Box<dyn FnMut()>);

        self.window
            .add_event_listener_with_callback("popstate", on_pop_state.as_ref().unchecked_ref())?;
        on_pop_state.forget(); // Listener lives as long as the page
        Ok(())
    }

    fn spawn_fetch(&self, request: ListingRequest) {
        let viewer = Rc::clone(&self.viewer);
        let window = self.window.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let mut request = request;
            loop {
                log::debug!("Fetching {}", request.url);
                let response = fetch(&window, &request.url).await;
                let result = {
                    let mut viewer = viewer.borrow_mut();
                    match response {
                        Ok(response) => viewer.receive(&request, response),
                        Err(e) => Err(viewer.receive_failure(&request, &describe(&e))),
                    }
                };
                match result {
                    Ok(Some(next)) => request = next,
                    Ok(None) => break,
                    Err(e) => {
                        log::warn!("Gallery not built: {}", e);
                        break;
                    }
                }
            }
        });
    }
}
