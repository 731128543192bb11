//! Parameter Value Objects
//!
//! A reference script exposes its tunable dimensions as top-level
//! assignments (`radius = 40`). Each one is described by a
//! [`ParameterSpec`] carrying its default, its semantic role and whether the
//! conversation must ask about it.

use serde::{Deserialize, Serialize};

/// Semantic role of a parameter, inferred from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterRole {
    Radius,
    Diameter,
    Height,
    Width,
    Depth,
    Length,
    Thickness,
    Count,
    Angle,
    #[default]
    Other,
}

/// Name fragments that mark a parameter as a secondary detail
const SECONDARY_MARKERS: [&str; 8] = [
    "wall",
    "fillet",
    "chamfer",
    "offset",
    "clearance",
    "tolerance",
    "gap",
    "inset",
];

impl ParameterRole {
    /// Infer the role from a parameter name such as `handle_width` or `num_teeth`
    pub fn infer(name: &str) -> Self {
        let lowered = name.to_lowercase();
        let tokens: Vec<&str> = lowered.split(['_', ' ']).filter(|t| !t.is_empty()).collect();
        let has = |candidates: &[&str]| tokens.iter().any(|t| candidates.contains(t));

        if has(&["count", "num", "number", "teeth", "tooth", "turns", "coils", "segments"]) {
            return Self::Count;
        }
        if has(&["angle", "degrees", "deg", "helix"]) {
            return Self::Angle;
        }
        // The last dimensional token wins: `handle_height` is a height
        tokens
            .iter()
            .rev()
            .find_map(|token| match *token {
                "radius" | "r" => Some(Self::Radius),
                "diameter" | "dia" | "d" => Some(Self::Diameter),
                "height" | "h" | "tall" => Some(Self::Height),
                "width" | "w" => Some(Self::Width),
                "depth" => Some(Self::Depth),
                "length" | "len" | "l" => Some(Self::Length),
                "thickness" | "thick" => Some(Self::Thickness),
                _ => None,
            })
            .unwrap_or(Self::Other)
    }

    /// Whether values are lengths (and therefore take length units)
    pub fn is_dimensional(&self) -> bool {
        matches!(
            self,
            Self::Radius
                | Self::Diameter
                | Self::Height
                | Self::Width
                | Self::Depth
                | Self::Length
                | Self::Thickness
        )
    }

    /// Whether a non-positive value makes the model meaningless
    pub fn must_be_positive(&self) -> bool {
        self.is_dimensional() || matches!(self, Self::Count)
    }

    /// Words users employ for this role besides the parameter name
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Radius => &["radius"],
            Self::Diameter => &["diameter"],
            Self::Height => &["height", "tall", "high"],
            Self::Width => &["width", "wide"],
            Self::Depth => &["depth", "deep"],
            Self::Length => &["length", "long"],
            Self::Thickness => &["thickness", "thick"],
            Self::Count => &["teeth", "tooth", "count"],
            Self::Angle => &["angle", "degrees"],
            Self::Other => &[],
        }
    }
}

/// Declared parameter of a reference script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Variable name in the script
    pub name: String,
    /// Value used when the user does not supply one
    pub default: f64,
    /// Semantic role
    #[serde(default)]
    pub role: ParameterRole,
    /// Whether elicitation asks for this parameter
    #[serde(default)]
    pub required: bool,
    /// Optional feature gating this parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
}

impl ParameterSpec {
    /// Required parameter with an inferred role
    pub fn new(name: impl Into<String>, default: f64) -> Self {
        let name = name.into();
        Self {
            role: ParameterRole::infer(&name),
            name,
            default,
            required: true,
            feature: None,
        }
    }

    /// Describe a parameter found as a script assignment
    ///
    /// Critical dimensions and counts are required unless they belong to an
    /// optional feature or name a secondary detail (wall, fillet, offset...).
    pub fn derived(name: impl Into<String>, default: f64, feature: Option<String>) -> Self {
        let name = name.into();
        let role = ParameterRole::infer(&name);
        let lowered = name.to_lowercase();
        let secondary = lowered
            .split('_')
            .any(|token| SECONDARY_MARKERS.contains(&token));
        let required = feature.is_none() && !secondary && role.must_be_positive();
        Self {
            name,
            default,
            role,
            required,
            feature,
        }
    }

    /// Name as the user would say it (`handle_width` becomes "handle width")
    pub fn display_name(&self) -> String {
        self.name.replace('_', " ")
    }
}

/// Render a parameter value as a script literal (`100`, not `100.0`)
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
