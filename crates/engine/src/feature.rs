use foundation::FeatureId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Transient key-value annotations attached to a feature for UI purposes,
/// distinct from its intrinsic data properties.
pub type StateMap = Map<String, Value>;

/// Composite address for a feature's transient state: `{source, source-layer,
/// id}`, exactly the triple the engine's state API is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureKey {
    pub source: String,
    pub source_layer: String,
    pub id: FeatureId,
}

impl FeatureKey {
    pub fn new(source: &str, source_layer: &str, id: FeatureId) -> Self {
        Self {
            source: source.to_string(),
            source_layer: source_layer.to_string(),
            id,
        }
    }
}

/// One rendered map entity as returned by a hit test: identity, intrinsic
/// properties, and a snapshot of its transient state at query time.
///
/// Features are owned by the rendering engine; the application never creates
/// or destroys them, only annotates their state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub state: StateMap,
}

impl Feature {
    pub fn new(id: FeatureId) -> Self {
        Self {
            id,
            properties: Map::new(),
            state: StateMap::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }

    /// The building's `type` property ("type" is taken by the wire format's
    /// GeoJSON member, so the accessor is named for what it holds).
    pub fn kind(&self) -> Option<&str> {
        self.properties.get("type").and_then(Value::as_str)
    }

    pub fn address(&self) -> Option<&str> {
        self.properties.get("address").and_then(Value::as_str)
    }

    pub fn height(&self) -> Option<f64> {
        self.properties.get("height").and_then(Value::as_f64)
    }
}
