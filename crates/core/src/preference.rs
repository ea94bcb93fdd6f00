//! Code-improvement preferences.
//!
//! A preference names the style the model should aim for when rewriting the
//! submitted code. Unknown or missing values always resolve to
//! [`Preference::Simple`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Wire name of the `Simple` preference.
pub const PREFERENCE_SIMPLE: &str = "Simple";
/// Wire name of the `Optimized` preference.
pub const PREFERENCE_OPTIMIZED: &str = "Optimized";
/// Wire name of the `Best Practices` preference.
pub const PREFERENCE_BEST_PRACTICES: &str = "Best Practices";

/// All accepted preference names, in display order.
pub const VALID_PREFERENCES: &[&str] = &[
    PREFERENCE_SIMPLE,
    PREFERENCE_OPTIMIZED,
    PREFERENCE_BEST_PRACTICES,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preference {
    #[default]
    Simple,
    Optimized,
    #[serde(rename = "Best Practices")]
    BestPractices,
}

impl Preference {
    /// Parse an exact wire name. Returns `None` for anything unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            PREFERENCE_SIMPLE => Some(Self::Simple),
            PREFERENCE_OPTIMIZED => Some(Self::Optimized),
            PREFERENCE_BEST_PRACTICES => Some(Self::BestPractices),
            _ => None,
        }
    }

    /// Resolve an optional, possibly unknown preference to a concrete one.
    pub fn resolve(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => PREFERENCE_SIMPLE,
            Self::Optimized => PREFERENCE_OPTIMIZED,
            Self::BestPractices => PREFERENCE_BEST_PRACTICES,
        }
    }

    /// Instruction text given to the model for this preference.
    pub fn description(self) -> &'static str {
        match self {
            Self::Simple => "Beginner-friendly, easy to understand, clear and readable",
            Self::Optimized => "Performance-focused, efficient, optimized for speed and memory",
            Self::BestPractices => {
                "Industry standards, maintainable, follows best practices and conventions"
            }
        }
    }
}

/// Deserialize an optional preference name, treating any non-string JSON
/// value as absent so that it resolves to [`Preference::Simple`].
///
/// Use with `#[serde(default, deserialize_with = "...")]`.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(name)) => Ok(Some(name)),
        _ => Ok(None),
    }
}

impl std::fmt::Display for Preference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
