use engine::{LayerFilter, LayerKind, LayerSpec, StyleLayerKind, Surface, SurfaceError};
use foundation::Rgba;
use symbology::{Expr, zoom_fade};

/// Id of the extrusion layer this viewer installs.
pub const EXTRUSION_LAYER_ID: &str = "3d-buildings";
/// Tile source and source layer the buildings come from.
pub const BUILDING_SOURCE: &str = "composite";
pub const BUILDING_SOURCE_LAYER: &str = "building";

pub const DEFAULT_FILL: Rgba = Rgba::opaque(0xaa, 0xaa, 0xaa);
pub const HIGHLIGHT_FILL: Rgba = Rgba::opaque(0xff, 0x00, 0x00);

/// Extrusions appear at this zoom and reach full height 0.05 later.
const EXTRUSION_MIN_ZOOM: f64 = 15.0;
const EXTRUSION_FULL_ZOOM: f64 = 15.05;
const EXTRUSION_OPACITY: f64 = 0.6;

/// Where the extrusion layer landed in the style stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerPlacement {
    /// Inserted beneath the first symbol layer, so building volumes do not
    /// occlude text labels.
    BeneathLabels(String),
    /// The style had no symbol layer; the layer sits on top of the stack.
    /// Accepted degraded behavior, not an error.
    Top,
}

/// The 3D building extrusion layer: only features flagged `extrude`, faded in
/// over the first 0.05 zoom above minimum instead of popping.
pub fn extrusion_layer_spec() -> LayerSpec {
    LayerSpec {
        id: EXTRUSION_LAYER_ID.to_string(),
        kind: LayerKind::FillExtrusion,
        source: BUILDING_SOURCE.to_string(),
        source_layer: BUILDING_SOURCE_LAYER.to_string(),
        filter: Some(LayerFilter::property_equals("extrude", "true")),
        minzoom: Some(EXTRUSION_MIN_ZOOM),
        paint: vec![
            (
                "fill-extrusion-color".to_string(),
                Expr::Color(DEFAULT_FILL),
            ),
            (
                "fill-extrusion-height".to_string(),
                zoom_fade(EXTRUSION_MIN_ZOOM, EXTRUSION_FULL_ZOOM, "height"),
            ),
            (
                "fill-extrusion-base".to_string(),
                zoom_fade(EXTRUSION_MIN_ZOOM, EXTRUSION_FULL_ZOOM, "min_height"),
            ),
            (
                "fill-extrusion-opacity".to_string(),
                Expr::Number(EXTRUSION_OPACITY),
            ),
        ],
    }
}

/// Reacts to the surface's ready signal: resize (container sizing races leave
/// the surface at a stale size) and install the extrusion layer beneath the
/// first symbol layer found in the style stack.
pub fn on_surface_ready<S: Surface>(surface: &mut S) -> Result<LayerPlacement, SurfaceError> {
    surface.resize();

    let label_layer_id = surface
        .style_layers()
        .iter()
        .find(|l| l.kind == StyleLayerKind::Symbol)
        .map(|l| l.id.clone());

    surface.add_layer(extrusion_layer_spec(), label_layer_id.as_deref())?;

    Ok(match label_layer_id {
        Some(id) => LayerPlacement::BeneathLabels(id),
        None => LayerPlacement::Top,
    })
}
