use engine::{Surface, SurfaceError};

use crate::config::MapConfig;
use crate::events::ViewerEvent;
use crate::height::handle_height_changed;
use crate::host::{LayerPlacement, on_surface_ready};
use crate::panel::InfoPanel;
use crate::selection::handle_click;
use crate::state::FeatureStateStore;

/// The application core: owns the surface handle for its lifetime, the
/// app-side feature state, and the info panel model, and routes each
/// [`ViewerEvent`] to its handler.
///
/// Handlers run to completion before returning; the host's single dispatch
/// loop serializes events, so state mutations never race. Dropping the viewer
/// releases the surface.
#[derive(Debug)]
pub struct Viewer<S: Surface> {
    surface: S,
    config: MapConfig,
    store: FeatureStateStore,
    panel: InfoPanel,
    placement: Option<LayerPlacement>,
}

impl<S: Surface> Viewer<S> {
    pub fn new(surface: S, config: MapConfig) -> Self {
        Self {
            surface,
            config,
            store: FeatureStateStore::new(),
            panel: InfoPanel::new(),
            placement: None,
        }
    }

    pub fn handle(&mut self, event: ViewerEvent) -> Result<(), SurfaceError> {
        match event {
            ViewerEvent::SurfaceReady => {
                // The surface signals ready once per mount; a repeat is a
                // no-op rather than a duplicate layer install.
                if self.placement.is_none() {
                    self.placement = Some(on_surface_ready(&mut self.surface)?);
                }
                Ok(())
            }
            ViewerEvent::FeatureClicked(point) => {
                handle_click(&mut self.surface, &mut self.store, &mut self.panel, point)
                    .map(|_| ())
            }
            ViewerEvent::HeightChanged(offset) => {
                handle_height_changed(&mut self.surface, &mut self.store, offset)
            }
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn store(&self) -> &FeatureStateStore {
        &self.store
    }

    pub fn panel(&self) -> &InfoPanel {
        &self.panel
    }

    /// Where the extrusion layer landed, once the surface has been ready.
    pub fn layer_placement(&self) -> Option<&LayerPlacement> {
        self.placement.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::Viewer;
    use crate::config::MapConfig;
    use crate::events::ViewerEvent;
    use crate::host::EXTRUSION_LAYER_ID;
    use engine::{Feature, FeatureKey, HitRect, MockSurface, StyleLayer, Surface};
    use foundation::{FeatureId, ScreenPoint};
    use serde_json::json;
    use symbology::EvalContext;

    fn building(id: u64, name: &str, height: f64, rect: HitRect) -> (Feature, HitRect) {
        (
            Feature::new(FeatureId::from(id))
                .with_property("name", json!(name))
                .with_property("height", json!(height)),
            rect,
        )
    }

    fn viewer_with_two_buildings() -> Viewer<MockSurface> {
        let mut viewer = Viewer::new(
            MockSurface::with_style(vec![StyleLayer::symbol("road-label")]),
            MapConfig::default(),
        );
        viewer.handle(ViewerEvent::SurfaceReady).unwrap();
        // Initial slider position fires on mount.
        viewer.handle(ViewerEvent::HeightChanged(0)).unwrap();

        for (feature, rect) in [
            building(1, "Building A", 30.0, HitRect::new(0.0, 0.0, 20.0, 20.0)),
            building(2, "Building B", 45.0, HitRect::new(5.0, 5.0, 25.0, 25.0)),
        ] {
            viewer
                .surface_mut()
                .add_rendered(EXTRUSION_LAYER_ID, feature, Some(rect));
        }
        viewer
    }

    fn rendered_height(viewer: &Viewer<MockSurface>, id: u64) -> f64 {
        let expr = viewer
            .surface()
            .paint_property(EXTRUSION_LAYER_ID, "fill-extrusion-height")
            .unwrap();
        let feature = viewer
            .surface()
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

    fn rendered_color(viewer: &Viewer<MockSurface>, id: u64) -> String {
        let expr = viewer
            .surface()
            .paint_property(EXTRUSION_LAYER_ID, "fill-extrusion-color")
            .unwrap();
        let feature = viewer
            .surface()
            .query_rendered_features(None, EXTRUSION_LAYER_ID)
            .into_iter()
            .find(|f| f.id == FeatureId::from(id))
            .unwrap();
        expr.eval(&EvalContext {
            zoom: 16.0,
            properties: &feature.properties,
            state: &feature.state,
        })
        .as_str()
        .unwrap()
        .to_string()
    }

    #[test]
    fn click_then_slider_scenario() {
        let mut viewer = viewer_with_two_buildings();

        viewer
            .handle(ViewerEvent::FeatureClicked(ScreenPoint::new(10.0, 10.0)))
            .unwrap();
        let cards = viewer.panel().cards().unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].name, "Building A");
        assert_eq!(cards[1].name, "Building B");

        viewer.handle(ViewerEvent::HeightChanged(10)).unwrap();
        assert_eq!(rendered_height(&viewer, 1), 40.0);
        assert_eq!(rendered_height(&viewer, 2), 55.0);
        assert_eq!(rendered_color(&viewer, 1), "#ff0000");
        assert_eq!(rendered_color(&viewer, 2), "#ff0000");
    }

    #[test]
    fn unselected_features_keep_default_color_and_height() {
        let mut viewer = viewer_with_two_buildings();
        viewer.surface_mut().add_rendered(
            EXTRUSION_LAYER_ID,
            Feature::new(FeatureId::from(3u64)).with_property("height", json!(60.0)),
            None,
        );

        viewer
            .handle(ViewerEvent::FeatureClicked(ScreenPoint::new(10.0, 10.0)))
            .unwrap();
        viewer.handle(ViewerEvent::HeightChanged(10)).unwrap();

        assert_eq!(rendered_height(&viewer, 3), 60.0);
        assert_eq!(rendered_color(&viewer, 3), "#aaaaaa");
    }

    #[test]
    fn repeated_surface_ready_is_a_no_op() {
        let mut viewer = viewer_with_two_buildings();
        viewer.handle(ViewerEvent::SurfaceReady).unwrap();
        viewer.handle(ViewerEvent::SurfaceReady).unwrap();
        let order = viewer.surface().layer_order();
        let count = order.iter().filter(|id| *id == EXTRUSION_LAYER_ID).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn slider_before_any_selection_changes_nothing() {
        let mut viewer = viewer_with_two_buildings();
        viewer.handle(ViewerEvent::HeightChanged(50)).unwrap();
        let key = FeatureKey::new("composite", "building", FeatureId::from(1u64));
        assert_eq!(viewer.surface().feature_state(&key), None);
        assert_eq!(viewer.panel().cards(), None);
    }
}
