use foundation::ScreenPoint;
use symbology::Expr;

use crate::feature::{Feature, FeatureKey, StateMap};
use crate::layer::{LayerSpec, StyleLayer};

/// Errors surfaced by a rendering surface.
///
/// The viewer treats most degraded situations (empty hit test, missing label
/// layer) as no-ops; these errors cover genuine misuse of the surface API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    LayerExists(String),
    UnknownLayer(String),
    InvalidExpression(String),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LayerExists(id) => write!(f, "layer already installed: {id}"),
            Self::UnknownLayer(id) => write!(f, "unknown layer: {id}"),
            Self::InvalidExpression(msg) => write!(f, "invalid paint expression: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// The rendering-surface contract: the narrow slice of the engine API the
/// viewer depends on.
///
/// The engine behind this trait owns tile fetching, projection, and GPU
/// painting; everything here is synchronous bookkeeping from the viewer's
/// perspective. Handlers are serialized by the host's dispatch loop, so
/// implementations need no interior locking.
pub trait Surface {
    /// The style's layer stack in render order.
    fn style_layers(&self) -> Vec<StyleLayer>;

    /// Inserts `spec` before the layer named by `before`, or on top of the
    /// stack when `before` is `None`.
    fn add_layer(&mut self, spec: LayerSpec, before: Option<&str>) -> Result<(), SurfaceError>;

    /// Recomputes the surface's size from its container.
    fn resize(&mut self);

    /// Screen-space hit test restricted to `layer`; `point` of `None` returns
    /// every currently rendered feature of that layer.
    fn query_rendered_features(&self, point: Option<ScreenPoint>, layer: &str) -> Vec<Feature>;

    /// Merges `patch` into the feature's transient state.
    fn set_feature_state(&mut self, key: &FeatureKey, patch: StateMap);

    /// Clears all transient state for every feature of the given source layer.
    fn remove_feature_state(&mut self, source: &str, source_layer: &str);

    /// Replaces one paint property of an installed layer.
    fn set_paint_property(
        &mut self,
        layer: &str,
        prop: &str,
        expr: Expr,
    ) -> Result<(), SurfaceError>;
}
