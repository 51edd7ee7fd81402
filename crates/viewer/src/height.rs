use engine::{FeatureKey, StateMap, Surface, SurfaceError};
use serde_json::json;
use symbology::{Expr, state_offset};

use crate::host::{BUILDING_SOURCE, BUILDING_SOURCE_LAYER, EXTRUSION_LAYER_ID};
use crate::selection::SELECTED_STATE_KEY;
use crate::state::FeatureStateStore;

/// Slider range: 0..=100, integer steps.
pub const MAX_HEIGHT_OFFSET: u32 = 100;

/// Handles a height-slider change.
///
/// Every currently selected rendered feature gets state `height = base +
/// offset`, where base is the feature's own static `height` property, and the
/// height paint expression is reinstalled to add the offset for selected
/// features only. Idempotent per slider position: the offset is never derived
/// from a previous offset, so repeated or reordered values cannot accumulate.
/// With nothing selected this is a silent no-op.
pub fn handle_height_changed<S: Surface>(
    surface: &mut S,
    store: &mut FeatureStateStore,
    offset: u32,
) -> Result<(), SurfaceError> {
    let offset = offset.min(MAX_HEIGHT_OFFSET);

    let selected: Vec<_> = surface
        .query_rendered_features(None, EXTRUSION_LAYER_ID)
        .into_iter()
        .filter(|f| store.is_selected(&f.id))
        .collect();
    if selected.is_empty() {
        return Ok(());
    }

    for feature in &selected {
        let base = feature.height().unwrap_or(0.0);
        let key = FeatureKey::new(BUILDING_SOURCE, BUILDING_SOURCE_LAYER, feature.id.clone());
        let mut patch = StateMap::new();
        patch.insert("height".to_string(), json!(base + f64::from(offset)));
        surface.set_feature_state(&key, patch);
        store.set_height_offset(&feature.id, offset);
    }

    surface.set_paint_property(
        EXTRUSION_LAYER_ID,
        "fill-extrusion-height",
        offset_height_expr(offset),
    )
}

/// Selected features render at `base height + offset`; unselected features
/// keep their unmodified base height.
pub fn offset_height_expr(offset: u32) -> Expr {
    state_offset(SELECTED_STATE_KEY, "height", f64::from(offset))
}

#[cfg(test)]
mod tests {
    use super::handle_height_changed;
    use crate::host::{EXTRUSION_LAYER_ID, on_surface_ready};
    use crate::panel::InfoPanel;
    use crate::selection::handle_click;
    use crate::state::FeatureStateStore;
    use engine::{Feature, FeatureKey, HitRect, MockSurface, Surface};
    use foundation::{FeatureId, ScreenPoint};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use symbology::EvalContext;

    fn surface_with_selection() -> (MockSurface, FeatureStateStore) {
        let mut surface = MockSurface::new();
        on_surface_ready(&mut surface).unwrap();
        surface.add_rendered(
            EXTRUSION_LAYER_ID,
            Feature::new(FeatureId::from(1u64)).with_property("height", json!(30.0)),
            Some(HitRect::new(0.0, 0.0, 20.0, 20.0)),
        );
        surface.add_rendered(
            EXTRUSION_LAYER_ID,
            Feature::new(FeatureId::from(2u64)).with_property("height", json!(45.0)),
            Some(HitRect::new(5.0, 5.0, 25.0, 25.0)),
        );

        let mut store = FeatureStateStore::new();
        let mut panel = InfoPanel::default();
        handle_click(
            &mut surface,
            &mut store,
            &mut panel,
            ScreenPoint::new(10.0, 10.0),
        )
        .unwrap();
        (surface, store)
    }

    fn state_height(surface: &MockSurface, id: u64) -> f64 {
        let key = FeatureKey::new("composite", "building", FeatureId::from(id));
        surface
            .feature_state(&key)
            .and_then(|s| s.get("height"))
            .and_then(serde_json::Value::as_f64)
            .unwrap()
    }

    fn rendered_height(surface: &MockSurface, id: u64) -> f64 {
        let expr = surface
            .paint_property(EXTRUSION_LAYER_ID, "fill-extrusion-height")
            .unwrap();
        let feature = surface
            .query_rendered_features(None, EXTRUSION_LAYER_ID)
            .into_iter()
            .find(|f| f.id == FeatureId::from(id))
            .unwrap();
        expr.eval(&EvalContext {
            zoom: 16.0,
            properties: &feature.properties,
            state: &feature.state,
        })
        .as_f64()
        .unwrap()
    }

    #[test]
    fn offset_is_relative_to_each_base_height() {
        let (mut surface, mut store) = surface_with_selection();
        handle_height_changed(&mut surface, &mut store, 10).unwrap();

        assert_eq!(state_height(&surface, 1), 40.0);
        assert_eq!(state_height(&surface, 2), 55.0);
        assert_eq!(rendered_height(&surface, 1), 40.0);
        assert_eq!(rendered_height(&surface, 2), 55.0);
    }

    #[test]
    fn slider_values_do_not_accumulate() {
        let (mut surface, mut store) = surface_with_selection();
        handle_height_changed(&mut surface, &mut store, 80).unwrap();
        handle_height_changed(&mut surface, &mut store, 10).unwrap();

        let (mut direct_surface, mut direct_store) = surface_with_selection();
        handle_height_changed(&mut direct_surface, &mut direct_store, 10).unwrap();

        assert_eq!(
            rendered_height(&surface, 1),
            rendered_height(&direct_surface, 1)
        );
        assert_eq!(state_height(&surface, 1), 40.0);
    }

    #[test]
    fn repeating_a_value_is_idempotent() {
        let (mut surface, mut store) = surface_with_selection();
        handle_height_changed(&mut surface, &mut store, 25).unwrap();
        let first = (state_height(&surface, 1), rendered_height(&surface, 1));
        handle_height_changed(&mut surface, &mut store, 25).unwrap();
        let second = (state_height(&surface, 1), rendered_height(&surface, 1));
        assert_eq!(first, second);
    }

    #[test]
    fn no_selection_is_a_silent_no_op() {
        let mut surface = MockSurface::new();
        on_surface_ready(&mut surface).unwrap();
        surface.add_rendered(
            EXTRUSION_LAYER_ID,
            Feature::new(FeatureId::from(1u64)).with_property("height", json!(30.0)),
            None,
        );
        let mut store = FeatureStateStore::new();

        handle_height_changed(&mut surface, &mut store, 0).unwrap();
        handle_height_changed(&mut surface, &mut store, 50).unwrap();

        let key = FeatureKey::new("composite", "building", FeatureId::from(1u64));
        assert_eq!(surface.feature_state(&key), None);
        // The install-time fade-in expression is still in place.
        let expr = surface
            .paint_property(EXTRUSION_LAYER_ID, "fill-extrusion-height")
            .unwrap();
        assert_eq!(expr.to_value()[0], json!("interpolate"));
    }
}
