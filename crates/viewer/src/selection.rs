use engine::{FeatureKey, StateMap, Surface, SurfaceError};
use foundation::ScreenPoint;
use serde_json::json;
use symbology::{Expr, state_case};

use crate::host::{
    BUILDING_SOURCE, BUILDING_SOURCE_LAYER, DEFAULT_FILL, EXTRUSION_LAYER_ID, HIGHLIGHT_FILL,
};
use crate::panel::InfoPanel;
use crate::state::FeatureStateStore;

/// State key the paint expressions condition on.
pub const SELECTED_STATE_KEY: &str = "selected";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click hit no building; nothing changed.
    Missed,
    /// The click replaced the selection with this many features.
    Selected(usize),
}

/// Handles a pointer click on the extrusion layer.
///
/// Selection is exclusive: every click that hits features replaces the whole
/// prior selection. A single click can hit several stacked footprints; all of
/// them are selected together. A miss is a strict no-op, leaving both the
/// panel and all feature state untouched.
pub fn handle_click<S: Surface>(
    surface: &mut S,
    store: &mut FeatureStateStore,
    panel: &mut InfoPanel,
    point: ScreenPoint,
) -> Result<ClickOutcome, SurfaceError> {
    let hits = surface.query_rendered_features(Some(point), EXTRUSION_LAYER_ID);
    if hits.is_empty() {
        return Ok(ClickOutcome::Missed);
    }

    panel.publish(&hits);

    surface.remove_feature_state(BUILDING_SOURCE, BUILDING_SOURCE_LAYER);
    store.clear();

    for feature in &hits {
        let key = FeatureKey::new(BUILDING_SOURCE, BUILDING_SOURCE_LAYER, feature.id.clone());
        let mut patch = StateMap::new();
        patch.insert(SELECTED_STATE_KEY.to_string(), json!(true));
        surface.set_feature_state(&key, patch);
        store.select(feature.id.clone());
    }

    surface.set_paint_property(
        EXTRUSION_LAYER_ID,
        "fill-extrusion-color",
        highlight_fill_expr(),
    )?;

    Ok(ClickOutcome::Selected(hits.len()))
}

/// Selected features render in the highlight color, all others in the
/// default. Recomputed whole on every selection change.
pub fn highlight_fill_expr() -> Expr {
    state_case(
        SELECTED_STATE_KEY,
        Expr::Color(HIGHLIGHT_FILL),
        Expr::Color(DEFAULT_FILL),
    )
}
