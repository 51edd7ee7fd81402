use foundation::Rgba;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};

/// Declarative paint expression, evaluated per-feature per-frame by the
/// rendering engine.
///
/// This is a closed subset of the engine's expression language: exactly the
/// operators the viewer installs. The wire form is the engine's JSON array
/// syntax (see [`Expr::to_value`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    String(String),
    Bool(bool),
    Color(Rgba),
    /// `["get", key]` — a feature's intrinsic data property.
    Get(String),
    /// `["feature-state", key]` — a feature's transient UI state.
    FeatureState(String),
    /// `["boolean", value, fallback]` — assert boolean, with a fallback for
    /// missing or non-boolean input.
    Boolean {
        value: Box<Expr>,
        fallback: Box<Expr>,
    },
    /// `["case", cond, then, otherwise]`.
    Case {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// `["zoom"]` — the current map zoom level.
    Zoom,
    /// `["interpolate", ["linear"], input, stop_in, stop_out, ...]`.
    InterpolateLinear {
        input: Box<Expr>,
        stops: Vec<(f64, Expr)>,
    },
    /// `["+", lhs, rhs]`.
    Add(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn get(key: &str) -> Self {
        Self::Get(key.to_string())
    }

    pub fn feature_state(key: &str) -> Self {
        Self::FeatureState(key.to_string())
    }

    pub fn boolean(value: Expr, fallback: Expr) -> Self {
        Self::Boolean {
            value: Box::new(value),
            fallback: Box::new(fallback),
        }
    }

    pub fn case(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Self::Case {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Self::Add(Box::new(lhs), Box::new(rhs))
    }

    /// The engine's JSON array wire form.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => json!(n),
            Self::String(s) => json!(s),
            Self::Bool(b) => json!(b),
            Self::Color(c) => json!(c.to_string()),
            Self::Get(key) => json!(["get", key]),
            Self::FeatureState(key) => json!(["feature-state", key]),
            Self::Boolean { value, fallback } => {
                json!(["boolean", value.to_value(), fallback.to_value()])
            }
            Self::Case {
                cond,
                then,
                otherwise,
            } => json!(["case", cond.to_value(), then.to_value(), otherwise.to_value()]),
            Self::Zoom => json!(["zoom"]),
            Self::InterpolateLinear { input, stops } => {
                let mut arr = vec![json!("interpolate"), json!(["linear"]), input.to_value()];
                for (stop_in, stop_out) in stops {
                    arr.push(json!(stop_in));
                    arr.push(stop_out.to_value());
                }
                Value::Array(arr)
            }
            Self::Add(lhs, rhs) => json!(["+", lhs.to_value(), rhs.to_value()]),
        }
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// `case(boolean(feature-state key, false), then, otherwise)` — the standard
/// shape for styling by a boolean state flag.
pub fn state_case(state_key: &str, then: Expr, otherwise: Expr) -> Expr {
    Expr::case(
        Expr::boolean(Expr::feature_state(state_key), Expr::Bool(false)),
        then,
        otherwise,
    )
}

/// Linear zoom ramp from 0 at `from_zoom` to the feature's `property` value at
/// `to_zoom`: an appearance fade-in instead of a hard pop-in.
pub fn zoom_fade(from_zoom: f64, to_zoom: f64, property: &str) -> Expr {
    Expr::InterpolateLinear {
        input: Box::new(Expr::Zoom),
        stops: vec![(from_zoom, Expr::Number(0.0)), (to_zoom, Expr::get(property))],
    }
}

/// `property + offset` when the state flag is set, the bare property
/// otherwise. Keeps each feature's value relative to its own base.
pub fn state_offset(state_key: &str, property: &str, offset: f64) -> Expr {
    state_case(
        state_key,
        Expr::add(Expr::get(property), Expr::Number(offset)),
        Expr::get(property),
    )
}
