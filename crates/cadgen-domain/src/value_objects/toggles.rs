//! Feature toggles

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Optional substructure of a reference (handle, lid, holes...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Feature name used as toggle key
    pub name: String,
    /// Identifier root that marks the feature's code (`handle`, `hole`)
    pub keyword: String,
    /// Whether the reference includes the feature by default
    #[serde(default = "default_enabled")]
    pub default_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Enabled/disabled state per feature name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureToggles(BTreeMap<String, bool>);

impl FeatureToggles {
    /// Toggles initialised from each feature's default
    pub fn from_defaults(features: &[FeatureSpec]) -> Self {
        Self(
            features
                .iter()
                .map(|f| (f.name.clone(), f.default_enabled))
                .collect(),
        )
    }

    /// Set a feature on or off
    pub fn set(&mut self, feature: impl Into<String>, enabled: bool) {
        self.0.insert(feature.into(), enabled);
    }

    /// State of a feature, if it was ever set
    pub fn get(&self, feature: &str) -> Option<bool> {
        self.0.get(feature).copied()
    }

    /// A feature never mentioned counts as enabled
    pub fn is_enabled(&self, feature: &str) -> bool {
        self.get(feature).unwrap_or(true)
    }

    /// Names of disabled features
    pub fn disabled(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, enabled)| !**enabled)
            .map(|(name, _)| name.as_str())
    }

    /// Normalized directives in name order
    pub fn directives(&self) -> Vec<ToggleDirective> {
        self.0
            .iter()
            .map(|(name, enabled)| {
                if *enabled {
                    ToggleDirective::Include(name.clone())
                } else {
                    ToggleDirective::Omit(name.clone())
                }
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }
}

/// Instruction passed to the generator for one feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleDirective {
    Include(String),
    Omit(String),
}

impl fmt::Display for ToggleDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include(name) => write!(f, "include {}", name.replace('_', " ")),
            Self::Omit(name) => write!(f, "omit {}", name.replace('_', " ")),
        }
    }
}
