use std::collections::BTreeMap;

use foundation::ScreenPoint;
use symbology::Expr;

use crate::feature::{Feature, FeatureKey, StateMap};
use crate::layer::{LayerSpec, StyleLayer};
use crate::surface::{Surface, SurfaceError};

/// Screen-space rectangle a scripted feature occupies, in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HitRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl HitRect {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

#[derive(Debug, Clone)]
struct Rendered {
    feature: Feature,
    hit: Option<HitRect>,
}

/// Complete in-memory [`Surface`]: scripted rendered features with hit
/// rectangles, a transient feature-state store, and recorded layer/paint
/// mutations, all inspectable by tests.
///
/// Degraded behaviors mirror the real engine: a hit test outside every
/// rectangle returns empty, and state writes for unknown features are
/// accepted (state is a transient annotation, not validated data).
#[derive(Debug, Default)]
pub struct MockSurface {
    style: Vec<StyleLayer>,
    /// Full stack order: style layers plus installed layers.
    layer_order: Vec<String>,
    layers: BTreeMap<String, LayerSpec>,
    rendered: BTreeMap<String, Vec<Rendered>>,
    state: BTreeMap<FeatureKey, StateMap>,
    paint: BTreeMap<(String, String), Expr>,
    resize_calls: usize,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: Vec<StyleLayer>) -> Self {
        let layer_order = style.iter().map(|l| l.id.clone()).collect();
        Self {
            style,
            layer_order,
            ..Self::default()
        }
    }

    /// Scripts one rendered feature of `layer`. Features without a hit
    /// rectangle are rendered but never hit by a point query.
    pub fn add_rendered(&mut self, layer: &str, feature: Feature, hit: Option<HitRect>) {
        self.rendered
            .entry(layer.to_string())
            .or_default()
            .push(Rendered { feature, hit });
    }

    pub fn layer_order(&self) -> &[String] {
        &self.layer_order
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.get(id)
    }

    pub fn feature_state(&self, key: &FeatureKey) -> Option<&StateMap> {
        self.state.get(key)
    }

    pub fn paint_property(&self, layer: &str, prop: &str) -> Option<&Expr> {
        self.paint.get(&(layer.to_string(), prop.to_string()))
    }

    pub fn resize_calls(&self) -> usize {
        self.resize_calls
    }

    fn state_key(&self, layer: &str, feature: &Feature) -> Option<FeatureKey> {
        let spec = self.layers.get(layer)?;
        Some(FeatureKey::new(
            &spec.source,
            &spec.source_layer,
            feature.id.clone(),
        ))
    }
}

impl Surface for MockSurface {
    fn style_layers(&self) -> Vec<StyleLayer> {
        self.style.clone()
    }

    fn add_layer(&mut self, spec: LayerSpec, before: Option<&str>) -> Result<(), SurfaceError> {
        if self.layers.contains_key(&spec.id) {
            return Err(SurfaceError::LayerExists(spec.id));
        }

        let position = match before {
            Some(before_id) => Some(
                self.layer_order
                    .iter()
                    .position(|id| id == before_id)
                    .ok_or_else(|| SurfaceError::UnknownLayer(before_id.to_string()))?,
            ),
            None => None,
        };

        for (prop, expr) in &spec.paint {
            self.paint
                .insert((spec.id.clone(), prop.clone()), expr.clone());
        }
        match position {
            Some(pos) => self.layer_order.insert(pos, spec.id.clone()),
            None => self.layer_order.push(spec.id.clone()),
        }
        self.layers.insert(spec.id.clone(), spec);
        Ok(())
    }

    fn resize(&mut self) {
        self.resize_calls += 1;
    }

    fn query_rendered_features(&self, point: Option<ScreenPoint>, layer: &str) -> Vec<Feature> {
        let Some(rendered) = self.rendered.get(layer) else {
            return Vec::new();
        };

        rendered
            .iter()
            .filter(|r| match point {
                Some(p) => r.hit.is_some_and(|rect| rect.contains(p)),
                None => true,
            })
            .map(|r| {
                // Like the engine, a query snapshots the live state into the
                // returned feature.
                let mut feature = r.feature.clone();
                if let Some(key) = self.state_key(layer, &feature)
                    && let Some(state) = self.state.get(&key)
                {
                    feature.state = state.clone();
                }
                feature
            })
            .collect()
    }

    fn set_feature_state(&mut self, key: &FeatureKey, patch: StateMap) {
        let entry = self.state.entry(key.clone()).or_default();
        for (k, v) in patch {
            entry.insert(k, v);
        }
    }

    fn remove_feature_state(&mut self, source: &str, source_layer: &str) {
        self.state
            .retain(|key, _| !(key.source == source && key.source_layer == source_layer));
    }

    fn set_paint_property(
        &mut self,
        layer: &str,
        prop: &str,
        expr: Expr,
    ) -> Result<(), SurfaceError> {
        if !self.layers.contains_key(layer) {
            return Err(SurfaceError::UnknownLayer(layer.to_string()));
        }
        self.paint
            .insert((layer.to_string(), prop.to_string()), expr);
        Ok(())
    }
}
