//! Utterance intent detection
//!
//! Keyword-level classification of what a user reply is asking for:
//! ending the session, accepting a script, regenerating it, or naming a
//! new object.

use std::sync::LazyLock;

use cadgen_domain::value_objects::Strategy;
use regex::Regex;

static OBJECT_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:make|create|design|want|need|build|print|model)\s+(?:me\s+)?(?:a|an|some|the)?\s*([a-z][a-z-]*)",
    )
    .expect("Invalid regex")
});

// A new object needs an indefinite article: "make the base thicker" is a change
static NEW_OBJECT_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:make|create|design|want|need|build|print|model)\s+(?:me\s+)?(?:a|an|another)\s+(?:new\s+)?([a-z][a-z-]*)",
    )
    .expect("Invalid regex")
});

static END_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:bye|goodbye|quit|exit|stop|end(?: session)?|that'?s all|done for now)\s*[.!]*\s*$")
        .expect("Invalid regex")
});

static CONFIRMATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:yes|yeah|yep|y|ok(?:ay)?|sure|confirm(?:ed)?|accept(?:ed)?|perfect|great|looks good|sounds good|that works|good|fine|correct|lgtm)(?:[\s,.!]+(?:please|thanks|thank you|looks good|great|perfect|it|is|fine|that's it))*[\s,.!]*$",
    )
    .expect("Invalid regex")
});

static REGENERATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:regenerate|try again|another (?:version|attempt|approach)|redo|start over|from scratch|different (?:approach|strategy)|generate again)\b")
        .expect("Invalid regex")
});

static DIFFERENT_APPROACH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:another|different|other)\s+(?:approach|strategy|way)\b")
        .expect("Invalid regex")
});

/// Words that are never object nouns
const NON_OBJECTS: &[&str] = &[
    "a", "an", "the", "some", "me", "to", "it", "one", "this", "that", "change", "different",
    "new", "bigger", "smaller", "sure", "something", "thing",
];

/// Object noun of a request such as "I want a cup"
pub fn detect_object_label(utterance: &str) -> Option<String> {
    OBJECT_REQUEST
        .captures_iter(utterance)
        .filter_map(|captures| captures.get(1))
        .map(|noun| noun.as_str().to_lowercase())
        .find(|noun| !NON_OBJECTS.contains(&noun.as_str()))
}

/// Object noun of a request for a fresh object, such as "now make me a box"
pub fn detect_new_object_label(utterance: &str) -> Option<String> {
    NEW_OBJECT_REQUEST
        .captures_iter(utterance)
        .filter_map(|captures| captures.get(1))
        .map(|noun| noun.as_str().to_lowercase())
        .find(|noun| !NON_OBJECTS.contains(&noun.as_str()))
}

/// The user wants to leave
pub fn is_end_request(utterance: &str) -> bool {
    END_REQUEST.is_match(utterance)
}

/// The user accepts the presented script
pub fn is_confirmation(utterance: &str) -> bool {
    CONFIRMATION.is_match(utterance) && !REGENERATE.is_match(utterance)
}

/// Parsed request to regenerate a script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegenerationRequest {
    /// Strategy the user named, if any
    pub strategy: Option<Strategy>,
    /// Asked for another approach without naming one
    pub step_down: bool,
}

/// Regeneration request, optionally naming a strategy
pub fn regeneration_request(utterance: &str) -> Option<RegenerationRequest> {
    let lowered = utterance.to_lowercase();
    let named = if lowered.contains("from scratch") || lowered.contains("first principles") {
        Some(Strategy::IntelligentReasoning)
    } else if lowered.contains("combine") || lowered.contains("pattern") {
        Some(Strategy::PatternCombination)
    } else if lowered.contains("category") || lowered.contains("loosely") {
        Some(Strategy::CategoryAdaptation)
    } else if lowered.contains("stick to the reference") || lowered.contains("closer to the reference")
    {
        Some(Strategy::DirectAdaptation)
    } else {
        None
    };
    let switching = ["use ", "try ", "switch"]
        .iter()
        .any(|verb| lowered.contains(verb));
    if REGENERATE.is_match(utterance) || named.is_some() && switching {
        Some(RegenerationRequest {
            strategy: named,
            step_down: named.is_none() && DIFFERENT_APPROACH.is_match(utterance),
        })
    } else {
        None
    }
}

/// Strategy to use for a regeneration from `current`
///
/// A plain retry keeps the strategy; only a request for another approach
/// steps down one band.
pub fn regeneration_strategy(current: Strategy, request: RegenerationRequest) -> Strategy {
    match request.strategy {
        Some(named) => named,
        None if request.step_down => current.next_lower().unwrap_or(current),
        None => current,
    }
}
