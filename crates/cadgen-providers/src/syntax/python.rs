//! Python syntax checking with tree-sitter

use cadgen_domain::ports::providers::{ScriptSyntaxChecker, SyntaxIssue};
use tree_sitter::{Language, Node, Parser};

const SNIPPET_CHARS: usize = 40;

/// Parse-only checker for CadQuery scripts
#[derive(Clone)]
pub struct PythonSyntaxChecker {
    language: Language,
}

impl PythonSyntaxChecker {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn parse(&self, script: &str) -> Result<tree_sitter::Tree, SyntaxIssue> {
        let mut parser = Parser::new();
        parser.set_language(&self.language).map_err(|e| SyntaxIssue {
            line: None,
            message: format!("Failed to set tree-sitter language: {e:?}"),
        })?;
        parser.parse(script, None).ok_or_else(|| SyntaxIssue {
            line: None,
            message: "Tree-sitter parsing failed".to_string(),
        })
    }
}

impl Default for PythonSyntaxChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PythonSyntaxChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PythonSyntaxChecker").finish()
    }
}

impl ScriptSyntaxChecker for PythonSyntaxChecker {
    fn check(&self, script: &str) -> Result<(), SyntaxIssue> {
        let tree = self.parse(script)?;
        let root = tree.root_node();
        if !root.has_error() {
            return Ok(());
        }
        let issue = first_error(root)
            .map(|node| describe(node, script))
            .unwrap_or_else(|| SyntaxIssue {
                line: None,
                message: "invalid syntax".to_string(),
            });
        Err(issue)
    }

    fn language(&self) -> &str {
        "python"
    }
}

/// Depth-first search for the first ERROR or MISSING node
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn describe(node: Node<'_>, script: &str) -> SyntaxIssue {
    let line = Some(node.start_position().row + 1);
    if node.is_missing() {
        return SyntaxIssue {
            line,
            message: format!("missing {}", node.kind()),
        };
    }
    let text = script
        .get(node.start_byte()..node.end_byte())
        .unwrap_or_default();
    let snippet: String = text
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .take(SNIPPET_CHARS)
        .collect();
    let message = if snippet.is_empty() {
        "invalid syntax".to_string()
    } else {
        format!("unexpected `{snippet}`")
    };
    SyntaxIssue { line, message }
}
