//! Script text transforms
//!
//! Line-oriented operations on generated and reference scripts:
//! extracting code from a model reply, reading top-level parameters,
//! binding parameter values and removing the code of a disabled feature.
//! None of them executes or fully parses the script; the syntax checker
//! and the sandbox do that.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use cadgen_domain::constants::{FEATURE_LEXICON, SCRIPT_RESULT_VARIABLE};
use cadgen_domain::value_objects::{FeatureSpec, ParameterSpec, format_value};
use regex::Regex;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+-]*[ \t]*\r?\n(.*?)```").expect("Invalid regex")
});

static NUMERIC_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([A-Za-z_][A-Za-z0-9_]*)[ \t]*=[ \t]*(-?\d+(?:\.\d+)?)[ \t]*(?:#.*)?$")
        .expect("Invalid regex")
});

static ANY_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[A-Za-z_][A-Za-z0-9_.]*\s*=[^=]").expect("Invalid regex"));

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("Invalid regex"));

/// Lines of model prose that end the code part of a reply
const PROSE_MARKERS: [&str; 7] = [
    "this code",
    "this script",
    "note that",
    "note:",
    "the above",
    "explanation:",
    "output:",
];

// ============================================================================
// Extraction
// ============================================================================

/// Pull the script out of a free-text model reply
///
/// Prefers the first fenced block; otherwise starts at the first import
/// line. Trailing prose ("This code creates...") is cut off.
pub fn extract_script(raw: &str) -> String {
    let body = FENCED_BLOCK
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map_or(raw, |block| block.as_str());

    let lines: Vec<&str> = body.lines().collect();
    let start = lines
        .iter()
        .position(|line| line.trim_start().starts_with("import cadquery"))
        .or_else(|| lines.iter().position(|line| is_import(line)))
        .unwrap_or(0);

    let mut kept = Vec::new();
    for line in &lines[start..] {
        let lowered = line.trim().to_lowercase();
        if PROSE_MARKERS.iter().any(|marker| lowered.starts_with(marker)) {
            break;
        }
        if line.trim_start().starts_with("```") {
            break;
        }
        kept.push(*line);
    }
    kept.join("\n").trim().to_string()
}

/// Heuristic: at least one import or assignment
pub fn looks_like_script(text: &str) -> bool {
    text.lines().any(is_import) || ANY_ASSIGNMENT.is_match(text)
}

/// Whether the script assigns the result variable at some point
pub fn assigns_result(script: &str) -> bool {
    let pattern = format!(r"(?m)^\s*{SCRIPT_RESULT_VARIABLE}\s*=[^=]");
    Regex::new(&pattern).is_ok_and(|regex| regex.is_match(script))
}

fn is_import(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("import ") || trimmed.starts_with("from ")
}

// ============================================================================
// Parameters and features
// ============================================================================

/// Top-level `name = number` assignments in declaration order
pub fn extract_parameters(script: &str) -> Vec<(String, f64)> {
    let mut seen = Vec::<String>::new();
    NUMERIC_ASSIGNMENT
        .captures_iter(script)
        .filter_map(|captures| {
            let name = captures.get(1)?.as_str().to_string();
            let value = captures.get(2)?.as_str().parse::<f64>().ok()?;
            if seen.contains(&name) {
                return None;
            }
            seen.push(name.clone());
            Some((name, value))
        })
        .collect()
}

/// Optional features whose identifiers appear in the script
pub fn detect_features(script: &str) -> Vec<FeatureSpec> {
    let code = code_only(script);
    FEATURE_LEXICON
        .iter()
        .filter(|(_, root)| {
            IDENTIFIER
                .find_iter(&code)
                .any(|ident| identifier_has_root(ident.as_str(), root))
        })
        .map(|(name, root)| FeatureSpec {
            name: (*name).to_string(),
            keyword: (*root).to_string(),
            default_enabled: true,
        })
        .collect()
}

/// Feature gating a parameter, judged by its name tokens
pub fn feature_of(parameter: &str, features: &[FeatureSpec]) -> Option<String> {
    features
        .iter()
        .find(|feature| identifier_has_root(parameter, &feature.keyword))
        .map(|feature| feature.name.clone())
}

/// Parameter table derived from a script's top-level assignments
pub fn derive_parameter_specs(script: &str, features: &[FeatureSpec]) -> Vec<ParameterSpec> {
    extract_parameters(script)
        .into_iter()
        .map(|(name, default)| {
            let feature = feature_of(&name, features);
            ParameterSpec::derived(name, default, feature)
        })
        .collect()
}

fn identifier_has_root(identifier: &str, root: &str) -> bool {
    let root = root.to_lowercase();
    identifier.to_lowercase().split('_').any(|token| {
        token == root || token.strip_suffix('s') == Some(&root) || token.strip_suffix("es") == Some(&root)
    })
}

// ============================================================================
// Parameter binding
// ============================================================================

/// Make every parameter appear as `name = literal` in the script
///
/// Existing single-line assignments are rewritten in place. Parameters the
/// script never assigns are inserted in a block after the imports.
pub fn bind_parameters(script: &str, parameters: &BTreeMap<String, f64>) -> String {
    let mut lines: Vec<String> = script.lines().map(str::to_string).collect();
    let mut missing = Vec::new();

    for (name, value) in parameters {
        let literal = format_value(*value);
        let mut replaced = false;
        for line in &mut lines {
            if let Some(rewritten) = rewrite_assignment(line, name, &literal) {
                *line = rewritten;
                replaced = true;
            }
        }
        if !replaced {
            missing.push(format!("{name} = {literal}"));
        }
    }

    if !missing.is_empty() {
        let insert_at = lines
            .iter()
            .rposition(|line| is_import(line) && !line.starts_with([' ', '\t']))
            .map_or(0, |index| index + 1);
        let mut block = vec![String::new(), "# Parameters".to_string()];
        block.extend(missing);
        lines.splice(insert_at..insert_at, block);
    }
    lines.join("\n")
}

/// Rewrite `name = <simple expression>` keeping indentation
fn rewrite_assignment(line: &str, name: &str, literal: &str) -> Option<String> {
    let indent_len = line.len() - line.trim_start().len();
    let rest = line[indent_len..].strip_prefix(name)?;
    let rest = rest.trim_start();
    let rhs = rest.strip_prefix('=')?;
    if rhs.starts_with('=') {
        return None;
    }
    let code = strip_comment(rhs).trim_end();
    // Multi-line expressions are left alone
    if code.ends_with(['(', '[', '{', '\\', ',']) || depth_delta(code) != 0 {
        return None;
    }
    Some(format!("{}{name} = {literal}", &line[..indent_len]))
}

// ============================================================================
// Feature removal
// ============================================================================

/// Pattern for identifiers built on a feature root (`handle`, `handle_path`, `mug_handle`)
fn feature_identifier_pattern(root: &str) -> String {
    let root = regex::escape(&root.to_lowercase());
    format!(r"\b(?:[a-z0-9]+_)*{root}(?:e?s)?(?:_[a-z0-9_]*)?\b")
}

fn feature_identifier(root: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){}", feature_identifier_pattern(root))).ok()
}

/// Whether the code (comments excluded) still references the feature
pub fn mentions_feature(script: &str, root: &str) -> bool {
    feature_identifier(root).is_some_and(|regex| regex.is_match(&code_only(script)))
}

/// A logical statement: physical lines joined while brackets are open
struct Statement {
    lines: Vec<String>,
    indent: usize,
}

impl Statement {
    fn first_code(&self) -> &str {
        self.lines.first().map_or("", |line| line.trim())
    }

    fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    fn is_comment(&self) -> bool {
        self.first_code().starts_with('#')
    }

    fn opens_block(&self) -> bool {
        self.lines
            .last()
            .is_some_and(|line| strip_comment(line).trim_end().ends_with(':'))
    }

    fn code(&self) -> String {
        self.lines
            .iter()
            .map(|line| strip_comment(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Remove every statement and comment that references a feature
///
/// Composition fragments such as `.union(handle)` are cut out of the
/// statements that keep the rest of the model. Blocks left without a body
/// get `pass`.
pub fn strip_feature(script: &str, root: &str) -> String {
    let Some(identifier) = feature_identifier(root) else {
        return script.to_string();
    };
    let fragment = Regex::new(&format!(
        r"(?i)\.(?:union|cut|add|intersect|combine)\(\s*{}\s*(?:,[^()]*)?\)",
        feature_identifier_pattern(root)
    ))
    .ok();

    let cleaned = match &fragment {
        Some(regex) => regex.replace_all(script, "").into_owned(),
        None => script.to_string(),
    };

    let statements = group_statements(&cleaned);
    let mut kept: Vec<&Statement> = Vec::new();
    let mut skip_deeper_than: Option<usize> = None;

    for statement in &statements {
        if statement.is_blank() {
            kept.push(statement);
            continue;
        }
        if let Some(limit) = skip_deeper_than {
            if statement.indent > limit {
                continue;
            }
            skip_deeper_than = None;
        }
        let references = if statement.is_comment() {
            identifier.is_match(statement.first_code())
        } else {
            identifier.is_match(&statement.code())
        };
        if references {
            if statement.opens_block() {
                skip_deeper_than = Some(statement.indent);
            }
            continue;
        }
        kept.push(statement);
    }

    fill_empty_blocks(&kept)
}

fn fill_empty_blocks(statements: &[&Statement]) -> String {
    let mut out: Vec<String> = Vec::new();
    for (index, statement) in statements.iter().enumerate() {
        out.extend(statement.lines.iter().cloned());
        if statement.is_comment() || !statement.opens_block() {
            continue;
        }
        let body_follows = statements[index + 1..]
            .iter()
            .find(|next| !next.is_blank() && !next.is_comment())
            .is_some_and(|next| next.indent > statement.indent);
        if !body_follows {
            out.push(format!("{}pass", " ".repeat(statement.indent + 4)));
        }
    }
    collapse_blank_runs(&out)
}

fn collapse_blank_runs(lines: &[String]) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in lines {
        let blank = line.trim().is_empty();
        if blank && out.last().is_some_and(|last| last.trim().is_empty()) {
            continue;
        }
        out.push(line);
    }
    out.join("\n").trim_end().to_string()
}

fn group_statements(script: &str) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut depth: i32 = 0;

    for line in script.lines() {
        if current.is_empty() {
            depth = 0;
        }
        current.push(line.to_string());
        depth += depth_delta(strip_comment(line));
        let continued = strip_comment(line).trim_end().ends_with('\\');
        if depth <= 0 && !continued {
            statements.push(finish_statement(std::mem::take(&mut current)));
        }
    }
    if !current.is_empty() {
        statements.push(finish_statement(current));
    }
    statements
}

fn finish_statement(lines: Vec<String>) -> Statement {
    let indent = lines
        .first()
        .map_or(0, |line| line.len() - line.trim_start().len());
    Statement { lines, indent }
}

/// Bracket depth change of a line, ignoring string contents
fn depth_delta(code: &str) -> i32 {
    let mut depth = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in code.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
    }
    depth
}

/// Line without its trailing `#` comment, respecting string literals
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (index, c) in line.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '#' => return &line[..index],
            _ => {}
        }
    }
    line
}

/// Script with comments removed
fn code_only(script: &str) -> String {
    script
        .lines()
        .map(strip_comment)
        .collect::<Vec<_>>()
        .join("\n")
}
