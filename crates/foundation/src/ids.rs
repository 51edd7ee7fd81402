use serde::{Deserialize, Serialize};

/// Stable feature identifier, unique within a source layer.
///
/// The rendering engine hands out either numeric or string ids depending on
/// the tile source, so both forms are admitted. Ordering contract: numeric ids
/// sort before string ids, so stores keyed by `FeatureId` iterate
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Num(u64),
    Str(String),
}

impl From<u64> for FeatureId {
    fn from(n: u64) -> Self {
        Self::Num(n)
    }
}

impl From<&str> for FeatureId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FeatureId;

    #[test]
    fn numeric_ids_sort_before_string_ids() {
        let mut ids = vec![
            FeatureId::from("b"),
            FeatureId::from(7u64),
            FeatureId::from("a"),
            FeatureId::from(2u64),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                FeatureId::from(2u64),
                FeatureId::from(7u64),
                FeatureId::from("a"),
                FeatureId::from("b"),
            ]
        );
    }
}
