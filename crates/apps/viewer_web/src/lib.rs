use std::cell::RefCell;

use console_error_panic_hook::set_once;
use engine::{Feature, StyleLayer};
use foundation::ScreenPoint;
use viewer::{MapConfig, Viewer, ViewerEvent};
use wasm_bindgen::prelude::*;

mod bridge;
pub use bridge::{BridgeSurface, SurfaceCommand};

thread_local! {
    static STATE: RefCell<Option<Viewer<BridgeSurface>>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Creates the viewer. Call once per mount, before any event entry point.
///
/// A missing access token is tolerated: the engine will load a blank surface
/// (no tiles), the viewer logic keeps working.
#[wasm_bindgen]
pub fn init_viewer(access_token: Option<String>) {
    if access_token.is_none() {
        web_sys::console::warn_1(&JsValue::from_str(
            "no access token configured; tile requests will be blocked",
        ));
    }
    STATE.with(|state| {
        *state.borrow_mut() = Some(Viewer::new(
            BridgeSurface::new(),
            MapConfig::with_access_token(access_token),
        ));
    });
}

/// Initial view configuration for the JS glue to construct the engine with:
/// `{style_url, center: [lng, lat], zoom}`.
#[wasm_bindgen]
pub fn map_config_json() -> Result<String, JsValue> {
    with_viewer(|v| {
        let cfg = v.config();
        Ok(serde_json::json!({
            "style_url": cfg.style_url,
            "center": [cfg.center.lng, cfg.center.lat],
            "zoom": cfg.zoom,
        })
        .to_string())
    })
}

/// The engine's load event. `style_layers_json` is the style stack as
/// `[{id, kind}, ...]` in render order.
#[wasm_bindgen]
pub fn surface_ready(style_layers_json: &str) -> Result<(), JsValue> {
    let style: Vec<StyleLayer> = parse(style_layers_json)?;
    with_viewer(|v| {
        v.surface_mut().set_style_layers(style);
        v.handle(ViewerEvent::SurfaceReady).map_err(|e| to_js(&e))
    })
}

/// A click on the extrusion layer. `hit_features_json` is the engine's
/// hit-test result at `(x, y)` — the glue runs the query, the viewer owns
/// what selection means.
#[wasm_bindgen]
pub fn map_click(x: f64, y: f64, hit_features_json: &str) -> Result<(), JsValue> {
    let hits: Vec<Feature> = parse(hit_features_json)?;
    with_viewer(|v| {
        v.surface_mut().set_rendered_features(hits);
        v.handle(ViewerEvent::FeatureClicked(ScreenPoint::new(x, y)))
            .map_err(|e| to_js(&e))
    })
}

/// A height-slider change. `rendered_features_json` is every currently
/// rendered feature of the extrusion layer.
#[wasm_bindgen]
pub fn slider_changed(value: u32, rendered_features_json: &str) -> Result<(), JsValue> {
    let rendered: Vec<Feature> = parse(rendered_features_json)?;
    with_viewer(|v| {
        v.surface_mut().set_rendered_features(rendered);
        v.handle(ViewerEvent::HeightChanged(value)).map_err(|e| to_js(&e))
    })
}

/// The queued surface mutations since the last drain, as a JSON array for the
/// glue to apply in order.
#[wasm_bindgen]
pub fn drain_commands_json() -> Result<String, JsValue> {
    with_viewer(|v| {
        let commands = v.surface_mut().drain_commands();
        serde_json::to_string(&commands).map_err(|e| to_js(&e))
    })
}

/// The info panel's cards as JSON: `null` while no click has landed yet,
/// otherwise an array of `{name, type, address, height}` strings with
/// placeholders already substituted.
#[wasm_bindgen]
pub fn info_cards_json() -> Result<String, JsValue> {
    with_viewer(|v| match v.panel().cards() {
        Some(cards) => serde_json::to_string(cards).map_err(|e| to_js(&e)),
        None => Ok("null".to_string()),
    })
}

fn with_viewer<R>(
    f: impl FnOnce(&mut Viewer<BridgeSurface>) -> Result<R, JsValue>,
) -> Result<R, JsValue> {
    STATE.with(|state| {
        let mut state = state.borrow_mut();
        let viewer = state
            .as_mut()
            .ok_or_else(|| JsValue::from_str("viewer not initialized; call init_viewer first"))?;
        f(viewer)
    })
}

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| to_js(&e))
}

fn to_js(err: &dyn std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
