//! Domain layer constants
//!
//! Defaults shared by the application layer and the configuration layer.
//! Infrastructure-only constants live in `cadgen_infrastructure::constants`.

// ============================================================================
// STRATEGY THRESHOLDS
// ============================================================================

/// Lowest score that still selects direct adaptation
pub const DIRECT_ADAPTATION_THRESHOLD: f64 = 0.5;

/// Lowest score that still selects pattern combination
pub const PATTERN_COMBINATION_THRESHOLD: f64 = 0.3;

/// Lowest score that still selects category adaptation
pub const CATEGORY_ADAPTATION_THRESHOLD: f64 = 0.2;

// ============================================================================
// RETRIEVAL
// ============================================================================

/// Number of matches retrieved per query
pub const DEFAULT_TOP_K: usize = 3;

/// Attempts made to embed a query before giving up
pub const DEFAULT_EMBEDDING_ATTEMPTS: usize = 2;

// ============================================================================
// SYNTHESIS AND VALIDATION
// ============================================================================

/// Extra generation attempts after the first one fails post-processing
pub const DEFAULT_SYNTHESIS_RETRIES: usize = 2;

/// Repair syntheses run after a validation failure
pub const DEFAULT_REPAIR_ATTEMPTS: usize = 1;

/// Default wall-clock limit for sandbox runs, in seconds
pub const DEFAULT_SANDBOX_TIMEOUT_SECS: u64 = 30;

/// Rough characters-per-token ratio used to size prompts
pub const CHARS_PER_TOKEN: usize = 4;

/// Share of the context window a prompt may occupy
pub const PROMPT_CONTEXT_FRACTION: f64 = 0.8;

/// Variable a script must assign its final solid to
pub const SCRIPT_RESULT_VARIABLE: &str = "result";

// ============================================================================
// CONVERSATION
// ============================================================================

/// Questions asked before remaining parameters fall back to defaults
pub const DEFAULT_MAX_QUESTIONS: usize = 4;

/// Default value, in millimetres, of the generic dimensions
pub const GENERIC_DIMENSION_DEFAULT: f64 = 50.0;

/// Names of the generic parameters used when no reference is trusted
pub const GENERIC_PARAMETERS: [&str; 3] = ["width", "depth", "height"];

// ============================================================================
// FEATURES
// ============================================================================

/// Optional features as `(feature name, identifier root)` pairs
///
/// The root is what appears in variable names and user phrasing
/// (`handle_width`, "no holes").
pub const FEATURE_LEXICON: [(&str, &str); 6] = [
    ("handle", "handle"),
    ("lid", "lid"),
    ("holes", "hole"),
    ("grooves", "groove"),
    ("decorative_bands", "band"),
    ("pattern", "pattern"),
];

/// Identifier root of a feature, falling back to the name itself
pub fn feature_root(feature: &str) -> &str {
    FEATURE_LEXICON
        .iter()
        .find(|(name, _)| *name == feature)
        .map_or(feature, |(_, root)| *root)
}
