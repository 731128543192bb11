//! Parameter elicitation parsing
//!
//! Reads one user utterance against the parameters and features of the
//! detected object and reports:
//!
//! - explicit values, each tied to a parameter by keyword proximity
//!   ("100mm height", "radius of 30") or, for a bare number, to the
//!   question that is pending;
//! - feature toggles ("no handle", "with a lid");
//! - parameters named without a value in a change request ("change the height").
//!
//! Two candidate values for one parameter are never resolved by guessing:
//! that parameter is left unbound and reported as an [`Ambiguity`] so the
//! caller can re-ask it, while the rest of the utterance still applies.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use cadgen_domain::constants::FEATURE_LEXICON;
use cadgen_domain::error::Error;
use cadgen_domain::value_objects::{FeatureSpec, ParameterRole, ParameterSpec};
use regex::Regex;
use tracing::debug;

static CLAUSE_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:[,;]|\band\b|\bthen\b|\bbut\b|\.(?:\s+|$))\s*").expect("Invalid regex")
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<value>-?\d+(?:\.\d+)?)\s*(?P<unit>millimet(?:er|re)s?|mm|centimet(?:er|re)s?|cm|inch(?:es)?|met(?:er|re)s?|m)?\b",
    )
    .expect("Invalid regex")
});

static CHANGE_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:change|modify|adjust|update|alter|different|redo)\b").expect("Invalid regex")
});

/// Words that negate a following feature keyword
const NEGATIONS: &[&str] = &[
    "no", "without", "remove", "drop", "skip", "omit", "exclude", "don't", "dont", "not", "none",
    "minus", "delete", "rid", "lose", "ditch",
];

/// How many words before a feature keyword may carry its negation
const NEGATION_WINDOW: usize = 3;

/// What one utterance contributes to a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElicitationOutcome {
    /// Explicit values, converted to millimetres where the role is a length
    pub values: BTreeMap<String, f64>,
    /// Feature name to enabled flag
    pub toggles: BTreeMap<String, bool>,
    /// Parameters named without a value in a change request
    pub change_requests: Vec<String>,
    /// First parameter that received more than one candidate value
    pub ambiguity: Option<Ambiguity>,
}

impl ElicitationOutcome {
    /// The utterance contained nothing actionable
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
            && self.toggles.is_empty()
            && self.change_requests.is_empty()
            && self.ambiguity.is_none()
    }
}

/// Several candidate values for one parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Ambiguity {
    pub parameter: String,
    pub candidates: Vec<f64>,
}

impl From<Ambiguity> for Error {
    fn from(ambiguity: Ambiguity) -> Self {
        Error::AmbiguousParameter {
            parameter: ambiguity.parameter,
            candidates: ambiguity.candidates,
        }
    }
}

/// Values collected while parsing, with the parameters that went ambiguous
#[derive(Default)]
struct Bindings {
    values: BTreeMap<String, f64>,
    blocked: BTreeSet<String>,
    ambiguity: Option<Ambiguity>,
}

impl Bindings {
    fn bind(&mut self, name: &str, value: f64) {
        if self.blocked.contains(name) {
            return;
        }
        match self.values.get(name) {
            Some(existing) if (existing - value).abs() > f64::EPSILON => {
                let existing = *existing;
                self.block(name, vec![existing, value]);
            }
            _ => {
                self.values.insert(name.to_string(), value);
            }
        }
    }

    fn block(&mut self, name: &str, candidates: Vec<f64>) {
        self.values.remove(name);
        self.blocked.insert(name.to_string());
        if self.ambiguity.is_none() {
            self.ambiguity = Some(Ambiguity {
                parameter: name.to_string(),
                candidates,
            });
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct NumberMention {
    start: usize,
    end: usize,
    value: f64,
    unit_scale: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct KeywordMention {
    start: usize,
    end: usize,
    /// Index into the parameter specs
    parameter: usize,
    /// Multiplier from the spoken quantity to the parameter (diameter to radius)
    scale: f64,
}

impl KeywordMention {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// Features worth listening for: the object's own plus the common lexicon
pub fn known_features(object_features: &[FeatureSpec]) -> Vec<FeatureSpec> {
    let mut features = object_features.to_vec();
    for (name, root) in FEATURE_LEXICON {
        if !features.iter().any(|f| f.name == name) {
            features.push(FeatureSpec {
                name: name.to_string(),
                keyword: root.to_string(),
                default_enabled: false,
            });
        }
    }
    features
}

/// Parse an utterance for parameter values, toggles and change requests
///
/// `pending` names the parameter of the question the user is answering;
/// a number with no keyword near it binds to that parameter.
pub fn extract(
    utterance: &str,
    specs: &[ParameterSpec],
    features: &[FeatureSpec],
    pending: Option<&str>,
) -> ElicitationOutcome {
    let lowered = utterance.to_lowercase();
    let mut bindings = Bindings::default();
    let mut toggles = BTreeMap::new();
    let mut unkeyed: Vec<NumberMention> = Vec::new();
    let mut named_without_value: Vec<usize> = Vec::new();

    for clause in CLAUSE_SPLIT.split(&lowered).filter(|c| !c.trim().is_empty()) {
        let keywords = keyword_mentions(clause, specs);
        let numbers = number_mentions(clause);
        let parsed = pair_clause(&numbers, &keywords, specs);

        for (parameter, value) in parsed.bound {
            bindings.bind(&specs[parameter].name, value);
        }
        for (parameter, candidates) in parsed.ambiguous {
            bindings.block(&specs[parameter].name, candidates);
        }
        unkeyed.extend(parsed.unkeyed);
        named_without_value.extend(parsed.unbound_keywords);

        for (feature, enabled) in feature_toggles(clause, features, &keywords) {
            toggles.insert(feature, enabled);
        }
    }

    if !unkeyed.is_empty() {
        bind_unkeyed(&mut bindings, &unkeyed, specs, pending);
    }

    let mut change_requests: Vec<String> = Vec::new();
    if CHANGE_VERB.is_match(&lowered) {
        for index in named_without_value {
            let name = &specs[index].name;
            if !bindings.values.contains_key(name)
                && !bindings.blocked.contains(name)
                && !change_requests.contains(name)
            {
                change_requests.push(name.clone());
            }
        }
    }

    let outcome = ElicitationOutcome {
        values: bindings.values,
        toggles,
        change_requests,
        ambiguity: bindings.ambiguity,
    };
    debug!(
        values = ?outcome.values,
        toggles = ?outcome.toggles,
        changes = ?outcome.change_requests,
        ambiguity = ?outcome.ambiguity,
        "Parsed utterance"
    );
    outcome
}

/// Result of pairing the numbers and keywords of one clause
struct ClauseParse {
    bound: Vec<(usize, f64)>,
    ambiguous: Vec<(usize, Vec<f64>)>,
    unkeyed: Vec<NumberMention>,
    unbound_keywords: Vec<usize>,
}

fn pair_clause(
    numbers: &[NumberMention],
    keywords: &[KeywordMention],
    specs: &[ParameterSpec],
) -> ClauseParse {
    if keywords.is_empty() {
        return ClauseParse {
            bound: Vec::new(),
            ambiguous: Vec::new(),
            unkeyed: numbers.to_vec(),
            unbound_keywords: Vec::new(),
        };
    }

    // "100mm height" puts numbers first, "height 100" puts keywords first;
    // on equal distance the clause's own ordering wins
    let numbers_first = match (numbers.first(), keywords.first()) {
        (Some(n), Some(k)) => n.start < k.start,
        _ => false,
    };

    let mut candidates: Vec<(usize, bool, usize, usize)> = Vec::new();
    for (ni, number) in numbers.iter().enumerate() {
        for (ki, keyword) in keywords.iter().enumerate() {
            let number_before = number.end <= keyword.start;
            let distance = if number_before {
                keyword.start - number.end
            } else {
                number.start.saturating_sub(keyword.end)
            };
            candidates.push((distance, number_before != numbers_first, ni, ki));
        }
    }
    candidates.sort_unstable();

    let mut number_taken = vec![false; numbers.len()];
    let mut keyword_value: Vec<Option<f64>> = vec![None; keywords.len()];
    for (_, _, ni, ki) in candidates {
        if number_taken[ni] || keyword_value[ki].is_some() {
            continue;
        }
        number_taken[ni] = true;
        let keyword = keywords[ki];
        keyword_value[ki] = Some(resolve(numbers[ni], &specs[keyword.parameter], keyword.scale));
    }

    // A spare number next to an already-bound keyword is a second candidate
    let mut extra: Vec<Vec<f64>> = vec![Vec::new(); keywords.len()];
    for (ni, number) in numbers.iter().enumerate() {
        if number_taken[ni] {
            continue;
        }
        let nearest = keywords
            .iter()
            .enumerate()
            .min_by_key(|(_, k)| {
                if number.end <= k.start {
                    k.start - number.end
                } else {
                    number.start.saturating_sub(k.end)
                }
            })
            .map(|(ki, _)| ki);
        if let Some(ki) = nearest {
            let keyword = keywords[ki];
            extra[ki].push(resolve(*number, &specs[keyword.parameter], keyword.scale));
        }
    }

    let mut bound = Vec::new();
    let mut ambiguous = Vec::new();
    let mut unbound_keywords = Vec::new();
    for ((keyword, value), spare) in keywords.iter().zip(keyword_value).zip(extra) {
        match value {
            Some(value) if spare.is_empty() => bound.push((keyword.parameter, value)),
            Some(value) => {
                let mut candidates = vec![value];
                candidates.extend(spare);
                ambiguous.push((keyword.parameter, candidates));
            }
            None => unbound_keywords.push(keyword.parameter),
        }
    }
    ClauseParse {
        bound,
        ambiguous,
        unkeyed: Vec::new(),
        unbound_keywords,
    }
}

fn bind_unkeyed(
    bindings: &mut Bindings,
    unkeyed: &[NumberMention],
    specs: &[ParameterSpec],
    pending: Option<&str>,
) {
    let Some(spec) = pending.and_then(|name| specs.iter().find(|s| s.name == name)) else {
        debug!(count = unkeyed.len(), "Ignoring numbers with no parameter keyword");
        return;
    };
    if bindings.values.contains_key(&spec.name) || bindings.blocked.contains(&spec.name) {
        debug!(parameter = %spec.name, "Pending parameter already named explicitly");
        return;
    }
    match unkeyed {
        [single] => bindings.bind(&spec.name, resolve(*single, spec, 1.0)),
        several => bindings.block(
            &spec.name,
            several.iter().map(|n| resolve(*n, spec, 1.0)).collect(),
        ),
    }
}

/// Convert a spoken quantity into the parameter's unit
fn resolve(number: NumberMention, spec: &ParameterSpec, scale: f64) -> f64 {
    let base = if spec.role.is_dimensional() {
        number.value * number.unit_scale.unwrap_or(1.0)
    } else {
        number.value
    };
    ((base * scale) * 1e6).round() / 1e6
}

fn number_mentions(clause: &str) -> Vec<NumberMention> {
    NUMBER
        .captures_iter(clause)
        .filter_map(|captures| {
            let value = captures.name("value")?;
            // Skip digits glued to a word, as in "m8"
            let glued = clause[..value.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
            if glued {
                return None;
            }
            let parsed: f64 = value.as_str().parse().ok()?;
            let whole = captures.get(0)?;
            Some(NumberMention {
                start: whole.start(),
                end: whole.end(),
                value: parsed,
                unit_scale: captures.name("unit").map(|unit| unit_scale(unit.as_str())),
            })
        })
        .collect()
}

fn unit_scale(unit: &str) -> f64 {
    if unit.starts_with("inch") {
        25.4
    } else if unit == "cm" || unit.starts_with("centi") {
        10.0
    } else if unit == "m" || unit.starts_with("met") {
        1000.0
    } else {
        1.0
    }
}

/// Spans of the clause that name a parameter
///
/// Full names claim their span first (longest names first), then role
/// aliases ("tall", "wide") for the first ungated parameter of each role.
fn keyword_mentions(clause: &str, specs: &[ParameterSpec]) -> Vec<KeywordMention> {
    let mut mentions: Vec<KeywordMention> = Vec::new();

    let mut by_length: Vec<usize> = (0..specs.len()).collect();
    by_length.sort_by_key(|&i| std::cmp::Reverse(specs[i].name.len()));
    for index in by_length {
        let tokens: Vec<String> = specs[index]
            .name
            .to_lowercase()
            .split('_')
            .filter(|t| !t.is_empty())
            .map(regex::escape)
            .collect();
        if tokens.is_empty() {
            continue;
        }
        let pattern = format!(r"\b{}\b", tokens.join(r"[ _-]?"));
        claim(clause, &pattern, index, 1.0, &mut mentions);
    }

    let first_of_role = |role: ParameterRole| {
        specs
            .iter()
            .position(|s| s.role == role && s.feature.is_none())
    };
    for role in [
        ParameterRole::Radius,
        ParameterRole::Diameter,
        ParameterRole::Height,
        ParameterRole::Width,
        ParameterRole::Depth,
        ParameterRole::Length,
        ParameterRole::Thickness,
        ParameterRole::Count,
        ParameterRole::Angle,
    ] {
        if let Some(index) = first_of_role(role) {
            for alias in role.aliases() {
                claim(clause, &format!(r"\b{alias}\b"), index, 1.0, &mut mentions);
            }
        }
    }

    // Users mix up radius and diameter; convert instead of dropping the value
    match (
        first_of_role(ParameterRole::Radius),
        first_of_role(ParameterRole::Diameter),
    ) {
        (Some(radius), None) => claim(clause, r"\bdiameter\b", radius, 0.5, &mut mentions),
        (None, Some(diameter)) => claim(clause, r"\bradius\b", diameter, 2.0, &mut mentions),
        _ => {}
    }

    mentions.sort_by_key(|m| m.start);
    mentions
}

fn claim(
    clause: &str,
    pattern: &str,
    parameter: usize,
    scale: f64,
    mentions: &mut Vec<KeywordMention>,
) {
    let Ok(regex) = Regex::new(pattern) else {
        return;
    };
    for found in regex.find_iter(clause) {
        if mentions
            .iter()
            .any(|m| m.overlaps(found.start(), found.end()))
        {
            continue;
        }
        mentions.push(KeywordMention {
            start: found.start(),
            end: found.end(),
            parameter,
            scale,
        });
    }
}

/// Feature switches mentioned in a clause
///
/// A negation word shortly before the keyword disables the feature; any
/// other mention enables it. Keywords inside a parameter name ("handle
/// width") are not toggles.
fn feature_toggles(
    clause: &str,
    features: &[FeatureSpec],
    keywords: &[KeywordMention],
) -> Vec<(String, bool)> {
    let mut toggles = Vec::new();
    for feature in features {
        let pattern = format!(r"\b{}(?:s|es)?\b", regex::escape(&feature.keyword));
        let Ok(regex) = Regex::new(&pattern) else {
            continue;
        };
        for found in regex.find_iter(clause) {
            if keywords
                .iter()
                .any(|k| k.overlaps(found.start(), found.end()))
            {
                continue;
            }
            let negated = clause[..found.start()]
                .split(|c: char| !(c.is_alphanumeric() || c == '\''))
                .filter(|w| !w.is_empty())
                .rev()
                .take(NEGATION_WINDOW)
                .any(|word| NEGATIONS.contains(&word));
            toggles.push((feature.name.clone(), !negated));
        }
    }
    toggles
}
