use engine::{Feature, FeatureKey, LayerSpec, StateMap, StyleLayer, Surface, SurfaceError};
use foundation::{FeatureId, ScreenPoint};
use serde::Serialize;
use serde_json::Value;
use symbology::Expr;

/// One surface mutation for the JS glue to apply to the live engine.
///
/// The wasm side never touches the engine object directly; it queues these
/// and the glue drains them after every dispatched event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceCommand {
    Resize,
    AddLayer {
        layer: Value,
        before: Option<String>,
    },
    SetFeatureState {
        source: String,
        source_layer: String,
        id: FeatureId,
        state: StateMap,
    },
    RemoveFeatureState {
        source: String,
        source_layer: String,
    },
    SetPaintProperty {
        layer: String,
        prop: String,
        value: Value,
    },
}

/// [`Surface`] backed by the browser's live engine through the JS glue.
///
/// Inputs (style stack, hit-test results) are pushed in by the glue before an
/// event is dispatched; the engine has already done the screen-space hit test,
/// so point queries return the pushed list as-is. Mutations queue as
/// [`SurfaceCommand`]s.
#[derive(Debug, Default)]
pub struct BridgeSurface {
    style: Vec<StyleLayer>,
    rendered: Vec<Feature>,
    commands: Vec<SurfaceCommand>,
}

impl BridgeSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_style_layers(&mut self, style: Vec<StyleLayer>) {
        self.style = style;
    }

    pub fn set_rendered_features(&mut self, rendered: Vec<Feature>) {
        self.rendered = rendered;
    }

    pub fn drain_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for BridgeSurface {
    fn style_layers(&self) -> Vec<StyleLayer> {
        self.style.clone()
    }

    fn add_layer(&mut self, spec: LayerSpec, before: Option<&str>) -> Result<(), SurfaceError> {
        self.commands.push(SurfaceCommand::AddLayer {
            layer: spec.to_style_json(),
            before: before.map(str::to_string),
        });
        Ok(())
    }

    fn resize(&mut self) {
        self.commands.push(SurfaceCommand::Resize);
    }

    fn query_rendered_features(&self, _point: Option<ScreenPoint>, _layer: &str) -> Vec<Feature> {
        self.rendered.clone()
    }

    fn set_feature_state(&mut self, key: &FeatureKey, patch: StateMap) {
        self.commands.push(SurfaceCommand::SetFeatureState {
            source: key.source.clone(),
            source_layer: key.source_layer.clone(),
            id: key.id.clone(),
            state: patch,
        });
    }

    fn remove_feature_state(&mut self, source: &str, source_layer: &str) {
        self.commands.push(SurfaceCommand::RemoveFeatureState {
            source: source.to_string(),
            source_layer: source_layer.to_string(),
        });
    }

    fn set_paint_property(
        &mut self,
        layer: &str,
        prop: &str,
        expr: Expr,
    ) -> Result<(), SurfaceError> {
        self.commands.push(SurfaceCommand::SetPaintProperty {
            layer: layer.to_string(),
            prop: prop.to_string(),
            value: expr.to_value(),
        });
        Ok(())
    }
}
