use engine::Feature;
use serde::Serialize;

pub const PLACEHOLDER_NAME: &str = "Unnamed Building";
pub const PLACEHOLDER_TYPE: &str = "No type";
pub const PLACEHOLDER_ADDRESS: &str = "No address";
pub const PLACEHOLDER_HEIGHT: &str = "No Height";

/// One display card of the info panel, with placeholders already substituted
/// for missing fields. Purely presentational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildingCard {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
    pub height: String,
}

impl BuildingCard {
    pub fn from_feature(feature: &Feature) -> Self {
        Self {
            name: feature.name().unwrap_or(PLACEHOLDER_NAME).to_string(),
            kind: feature.kind().unwrap_or(PLACEHOLDER_TYPE).to_string(),
            address: feature.address().unwrap_or(PLACEHOLDER_ADDRESS).to_string(),
            height: match feature.height() {
                Some(h) => format_height(h),
                None => PLACEHOLDER_HEIGHT.to_string(),
            },
        }
    }
}

fn format_height(h: f64) -> String {
    if h.fract() == 0.0 {
        format!("{}m", h as i64)
    } else {
        format!("{h}m")
    }
}

/// The info panel's data model: the cards for the last successful click, or
/// nothing while no click has landed yet.
///
/// A missed click does not publish, so the previous cards stay visible; this
/// is distinct from the initial "nothing selected yet" state, which renders
/// nothing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InfoPanel {
    cards: Option<Vec<BuildingCard>>,
}

impl InfoPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, features: &[Feature]) {
        self.cards = Some(features.iter().map(BuildingCard::from_feature).collect());
    }

    pub fn cards(&self) -> Option<&[BuildingCard]> {
        self.cards.as_deref()
    }
}

/// Pass-through error text: whatever message it is given is what renders.
/// No formatting, no classification.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorText {
    message: String,
}

impl ErrorText {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ErrorText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
