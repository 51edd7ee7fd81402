use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use symbology::Expr;

/// The layer kinds this viewer installs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerKind {
    FillExtrusion,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FillExtrusion => "fill-extrusion",
        }
    }
}

/// Legacy equality filter, `["==", key, value]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerFilter {
    pub key: String,
    pub value: String,
}

impl LayerFilter {
    pub fn property_equals(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        json!(["==", self.key, self.value])
    }
}

/// Declarative description of one layer to insert into the style stack.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub kind: LayerKind,
    pub source: String,
    pub source_layer: String,
    pub filter: Option<LayerFilter>,
    pub minzoom: Option<f64>,
    /// Paint properties in install order.
    pub paint: Vec<(String, Expr)>,
}

impl LayerSpec {
    /// The engine's JSON layer object.
    pub fn to_style_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("id".to_string(), json!(self.id));
        obj.insert("type".to_string(), json!(self.kind.as_str()));
        obj.insert("source".to_string(), json!(self.source));
        obj.insert("source-layer".to_string(), json!(self.source_layer));
        if let Some(filter) = &self.filter {
            obj.insert("filter".to_string(), filter.to_value());
        }
        if let Some(minzoom) = self.minzoom {
            obj.insert("minzoom".to_string(), json!(minzoom));
        }
        let paint: Map<String, Value> = self
            .paint
            .iter()
            .map(|(prop, expr)| (prop.clone(), expr.to_value()))
            .collect();
        obj.insert("paint".to_string(), Value::Object(paint));
        Value::Object(obj)
    }

    pub fn paint_property(&self, prop: &str) -> Option<&Expr> {
        self.paint
            .iter()
            .find(|(name, _)| name == prop)
            .map(|(_, expr)| expr)
    }
}

/// One entry of the style's layer stack, reduced to what layer placement
/// needs: its id and whether it is a symbol (label) layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleLayer {
    pub id: String,
    pub kind: StyleLayerKind,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleLayerKind {
    Symbol,
    #[serde(other)]
    Other,
}

impl StyleLayer {
    pub fn symbol(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: StyleLayerKind::Symbol,
        }
    }

    pub fn other(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: StyleLayerKind::Other,
        }
    }
}
