use std::env;
use std::fs;

use engine::{Feature, HitRect, MockSurface, Surface};
use foundation::{FeatureId, ScreenPoint};
use serde::Deserialize;
use serde_json::Map;
use symbology::EvalContext;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use viewer::{
    BuildingCard, EXTRUSION_LAYER_ID, LayerPlacement, MapConfig, Viewer, ViewerEvent,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "replay" => cmd_replay(args),
        _ => Err(usage()),
    }
}

/// Event script: feature fixtures plus the click/slider sequence to replay.
#[derive(Debug, Deserialize)]
struct ReplayScript {
    #[serde(default)]
    style_layers: Vec<engine::StyleLayer>,
    #[serde(default)]
    features: Vec<ScriptFeature>,
    events: Vec<ScriptEvent>,
    /// Zoom used when evaluating rendered values for the report.
    #[serde(default = "default_zoom")]
    zoom: f64,
}

fn default_zoom() -> f64 {
    16.0
}

#[derive(Debug, Deserialize)]
struct ScriptFeature {
    id: FeatureId,
    #[serde(default)]
    properties: Map<String, serde_json::Value>,
    /// `[min_x, min_y, max_x, max_y]`; absent means never hit by a click.
    hit_rect: Option<[f64; 4]>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ScriptEvent {
    SurfaceReady,
    Click { x: f64, y: f64 },
    Slider { value: u32 },
}

fn cmd_replay(args: Vec<String>) -> Result<(), String> {
    let [path] = args.as_slice() else {
        return Err(usage());
    };

    let token = env::var("EXTRUDA_TOKEN").ok();
    if token.is_none() {
        warn!("EXTRUDA_TOKEN not set; a live surface would load without tiles");
    }

    let text = fs::read_to_string(path).map_err(|e| format!("read {path}: {e}"))?;
    let script: ReplayScript =
        serde_json::from_str(&text).map_err(|e| format!("parse {path}: {e}"))?;

    let mut surface = MockSurface::with_style(script.style_layers);
    for f in &script.features {
        let mut feature = Feature::new(f.id.clone());
        feature.properties = f.properties.clone();
        let hit = f
            .hit_rect
            .map(|[min_x, min_y, max_x, max_y]| HitRect::new(min_x, min_y, max_x, max_y));
        surface.add_rendered(EXTRUSION_LAYER_ID, feature, hit);
    }

    let mut v = Viewer::new(surface, MapConfig::with_access_token(token));

    for (index, event) in script.events.iter().enumerate() {
        debug!(index, ?event, "dispatch");
        let viewer_event = match *event {
            ScriptEvent::SurfaceReady => ViewerEvent::SurfaceReady,
            ScriptEvent::Click { x, y } => ViewerEvent::FeatureClicked(ScreenPoint::new(x, y)),
            ScriptEvent::Slider { value } => ViewerEvent::HeightChanged(value),
        };
        v.handle(viewer_event)
            .map_err(|e| format!("event {index}: {e}"))?;
    }

    match v.layer_placement() {
        Some(LayerPlacement::BeneathLabels(id)) => {
            info!(beneath = %id, "extrusion layer installed")
        }
        Some(LayerPlacement::Top) => {
            info!("extrusion layer installed on top (style has no symbol layer)")
        }
        None => warn!("script never sent surface_ready; no layer installed"),
    }

    print_report(&v, script.zoom);
    Ok(())
}

fn print_report(v: &Viewer<MockSurface>, zoom: f64) {
    let selected: Vec<String> = v.store().selected_ids().map(ToString::to_string).collect();
    println!("selection: [{}]", selected.join(", "));

    match v.panel().cards() {
        None => println!("panel: (nothing selected yet)"),
        Some(cards) => {
            for BuildingCard {
                name,
                kind,
                address,
                height,
            } in cards
            {
                println!("panel: {name} | {kind} | {address} | {height}");
            }
        }
    }

    let color = v
        .surface()
        .paint_property(EXTRUSION_LAYER_ID, "fill-extrusion-color");
    let height = v
        .surface()
        .paint_property(EXTRUSION_LAYER_ID, "fill-extrusion-height");

    for feature in v.surface().query_rendered_features(None, EXTRUSION_LAYER_ID) {
        let ctx = EvalContext {
            zoom,
            properties: &feature.properties,
            state: &feature.state,
        };
        let rendered_height = height
            .map(|e| e.eval(&ctx))
            .and_then(|val| val.as_f64())
            .map_or("-".to_string(), |h| h.to_string());
        let rendered_color = color
            .map(|e| e.eval(&ctx))
            .and_then(|val| val.as_str().map(str::to_string))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "feature {}: height {} color {}",
            feature.id, rendered_height, rendered_color
        );
    }

    if let Some(expr) = height {
        println!("paint fill-extrusion-height: {}", expr.to_value());
    }
    if let Some(expr) = color {
        println!("paint fill-extrusion-color: {}", expr.to_value());
    }
}

fn usage() -> String {
    "usage: extruda replay <script.json>

Replays a JSON event script against an in-memory surface and prints the
resulting selection, panel cards, and rendered paint values.

Script shape:
  {
    \"style_layers\": [{\"id\": \"road-label\", \"kind\": \"symbol\"}],
    \"features\": [{\"id\": 1, \"properties\": {\"height\": 30}, \"hit_rect\": [0, 0, 20, 20]}],
    \"events\": [\"surface_ready\", {\"click\": {\"x\": 10, \"y\": 10}}, {\"slider\": {\"value\": 10}}]
  }"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{ReplayScript, ScriptEvent};

    #[test]
    fn parses_a_full_script() {
        let script: ReplayScript = serde_json::from_str(
            r#"{
                "style_layers": [{"id": "road-label", "kind": "symbol"}],
                "features": [
                    {"id": 1, "properties": {"height": 30}, "hit_rect": [0, 0, 20, 20]},
                    {"id": "osm:2", "properties": {"height": 45}}
                ],
                "events": [
                    "surface_ready",
                    {"click": {"x": 10, "y": 10}},
                    {"slider": {"value": 10}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.features.len(), 2);
        assert_eq!(script.zoom, 16.0);
        assert!(matches!(script.events[0], ScriptEvent::SurfaceReady));
        assert!(matches!(script.events[2], ScriptEvent::Slider { value: 10 }));
    }
}
