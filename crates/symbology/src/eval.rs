use serde_json::{Map, Value, json};

use crate::expr::Expr;

/// Inputs for pure expression evaluation: the live zoom plus one feature's
/// data properties and transient state.
///
/// The real engine evaluates expressions on the GPU paint path; this evaluator
/// exists so tests and tooling can assert rendered values without it.
#[derive(Debug, Copy, Clone)]
pub struct EvalContext<'a> {
    pub zoom: f64,
    pub properties: &'a Map<String, Value>,
    pub state: &'a Map<String, Value>,
}

impl Expr {
    /// Evaluates the expression against `ctx`.
    ///
    /// Missing property/state keys evaluate to null; type mismatches in
    /// arithmetic and interpolation yield null rather than an error, matching
    /// the engine's lenient per-feature evaluation.
    pub fn eval(&self, ctx: &EvalContext<'_>) -> Value {
        match self {
            Self::Number(n) => json!(n),
            Self::String(s) => json!(s),
            Self::Bool(b) => json!(b),
            Self::Color(c) => json!(c.to_string()),
            Self::Get(key) => ctx.properties.get(key).cloned().unwrap_or(Value::Null),
            Self::FeatureState(key) => ctx.state.get(key).cloned().unwrap_or(Value::Null),
            Self::Boolean { value, fallback } => match value.eval(ctx) {
                v @ Value::Bool(_) => v,
                _ => fallback.eval(ctx),
            },
            Self::Case {
                cond,
                then,
                otherwise,
            } => {
                if cond.eval(ctx) == Value::Bool(true) {
                    then.eval(ctx)
                } else {
                    otherwise.eval(ctx)
                }
            }
            Self::Zoom => json!(ctx.zoom),
            Self::InterpolateLinear { input, stops } => {
                let Some(x) = input.eval(ctx).as_f64() else {
                    return Value::Null;
                };
                interpolate_linear(x, stops, ctx)
            }
            Self::Add(lhs, rhs) => {
                match (lhs.eval(ctx).as_f64(), rhs.eval(ctx).as_f64()) {
                    (Some(a), Some(b)) => json!(a + b),
                    _ => Value::Null,
                }
            }
        }
    }
}

fn interpolate_linear(x: f64, stops: &[(f64, Expr)], ctx: &EvalContext<'_>) -> Value {
    let outputs: Vec<Option<f64>> = stops
        .iter()
        .map(|(_, out)| out.eval(ctx).as_f64())
        .collect();

    let Some((first_in, _)) = stops.first() else {
        return Value::Null;
    };
    if x <= *first_in {
        return outputs[0].map_or(Value::Null, |v| json!(v));
    }
    let last_in = stops[stops.len() - 1].0;
    if x >= last_in {
        return outputs[outputs.len() - 1].map_or(Value::Null, |v| json!(v));
    }

    for window in 0..stops.len() - 1 {
        let (x0, _) = stops[window];
        let (x1, _) = stops[window + 1];
        if x >= x0 && x <= x1 {
            let (Some(y0), Some(y1)) = (outputs[window], outputs[window + 1]) else {
                return Value::Null;
            };
            let t = if x1 > x0 { (x - x0) / (x1 - x0) } else { 0.0 };
            return json!(y0 + (y1 - y0) * t);
        }
    }

    Value::Null
}

#[cfg(test)]
mod tests {
    use super::EvalContext;
    use crate::expr::{Expr, state_case, state_offset, zoom_fade};
    use foundation::Rgba;
    use serde_json::{Map, Value, json};

    fn props(height: f64) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("height".to_string(), json!(height));
        m
    }

    fn selected_state() -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("selected".to_string(), json!(true));
        m
    }

    #[test]
    fn state_case_picks_highlight_only_when_selected() {
        let expr = state_case(
            "selected",
            Expr::Color(Rgba::opaque(0xff, 0, 0)),
            Expr::Color(Rgba::opaque(0xaa, 0xaa, 0xaa)),
        );
        let properties = props(30.0);

        let selected = expr.eval(&EvalContext {
            zoom: 16.0,
            properties: &properties,
            state: &selected_state(),
        });
        assert_eq!(selected, json!("#ff0000"));

        let unselected = expr.eval(&EvalContext {
            zoom: 16.0,
            properties: &properties,
            state: &Map::new(),
        });
        assert_eq!(unselected, json!("#aaaaaa"));
    }

    #[test]
    fn missing_state_falls_back_through_boolean() {
        // A state map with a non-boolean value also takes the fallback.
        let expr = Expr::boolean(Expr::feature_state("selected"), Expr::Bool(false));
        let mut state = Map::new();
        state.insert("selected".to_string(), json!("yes"));
        let got = expr.eval(&EvalContext {
            zoom: 16.0,
            properties: &Map::new(),
            state: &state,
        });
        assert_eq!(got, json!(false));
    }

    #[test]
    fn zoom_fade_ramps_between_stops() {
        let expr = zoom_fade(15.0, 15.05, "height");
        let properties = props(40.0);
        let state = Map::new();

        let at = |zoom: f64| {
            expr.eval(&EvalContext {
                zoom,
                properties: &properties,
                state: &state,
            })
        };

        assert_eq!(at(14.0), json!(0.0));
        assert_eq!(at(15.0), json!(0.0));
        let mid = at(15.025).as_f64().unwrap();
        assert!((mid - 20.0).abs() < 1e-6, "mid = {mid}");
        assert_eq!(at(15.05), json!(40.0));
        assert_eq!(at(16.0), json!(40.0));
    }

    #[test]
    fn state_offset_adds_relative_to_base_height() {
        let expr = state_offset("selected", "height", 10.0);

        let a = expr.eval(&EvalContext {
            zoom: 16.0,
            properties: &props(30.0),
            state: &selected_state(),
        });
        assert_eq!(a, json!(40.0));

        let b = expr.eval(&EvalContext {
            zoom: 16.0,
            properties: &props(45.0),
            state: &selected_state(),
        });
        assert_eq!(b, json!(55.0));

        let unselected = expr.eval(&EvalContext {
            zoom: 16.0,
            properties: &props(45.0),
            state: &Map::new(),
        });
        assert_eq!(unselected, json!(45.0));
    }

    #[test]
    fn add_with_missing_property_is_null() {
        let expr = Expr::add(Expr::get("height"), Expr::Number(10.0));
        let got = expr.eval(&EvalContext {
            zoom: 16.0,
            properties: &Map::new(),
            state: &Map::new(),
        });
        assert_eq!(got, Value::Null);
    }
}
