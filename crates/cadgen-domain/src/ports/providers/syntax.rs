use std::fmt;

/// First syntax problem found in a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    /// 1-based line, when the parser could locate it
    pub line: Option<usize>,
    pub message: String,
}

impl fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Parse-only check for the target scripting language
///
/// No code is executed; semantic problems are the sandbox's concern.
pub trait ScriptSyntaxChecker: Send + Sync {
    /// `Ok(())` when the script parses
    fn check(&self, script: &str) -> Result<(), SyntaxIssue>;

    /// Name of the checked language
    fn language(&self) -> &str;
}
