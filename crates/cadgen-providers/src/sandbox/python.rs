//! Python subprocess sandbox
//!
//! Each script runs in a fresh interpreter through a small harness that
//! executes it, checks the `result` variable and prints one JSON report.
//! The process is killed when the wall-clock limit passes or the calling
//! future is dropped.

use std::io::Write;
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use cadgen_domain::entities::{Diagnostic, DiagnosticKind};
use cadgen_domain::error::{Error, Result};
use cadgen_domain::ports::providers::{SandboxOutcome, ScriptSandbox};

use crate::constants::{DEFAULT_PYTHON_INTERPRETER, STDERR_TAIL_BYTES};

const HARNESS: &str = r#"
import json, sys, traceback

def script_line(exc):
    line = None
    for frame in traceback.extract_tb(exc.__traceback__):
        if frame.filename == "<script>":
            line = frame.lineno
    return line

report = {"ok": False, "kind": "exception", "message": "", "line": None, "name": None, "exception": None}
try:
    with open(sys.argv[1], encoding="utf-8") as handle:
        source = handle.read()
    scope = {"__name__": "__cadgen__"}
    exec(compile(source, "<script>", "exec"), scope)
    result = scope.get("result")
    if result is None:
        report.update(kind="missing_result", message="the script never assigns `result`")
    else:
        shape = result.val() if hasattr(result, "val") else result
        if hasattr(shape, "isValid") and not shape.isValid():
            report.update(kind="exception", exception="InvalidShape", message="null shape: result is not a valid solid")
        else:
            report.update(ok=True, kind=None)
except SyntaxError as exc:
    report.update(kind="syntax", message=str(exc.msg), line=exc.lineno)
except NameError as exc:
    report.update(kind="name_error", message=str(exc), name=getattr(exc, "name", None), line=script_line(exc))
except BaseException as exc:
    report.update(exception=type(exc).__name__, message=str(exc), line=script_line(exc))
sys.stdout.write("\n" + json.dumps(report) + "\n")
"#;

static UNDEFINED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"name '([A-Za-z_][A-Za-z0-9_]*)' is not defined").expect("Invalid regex"));

static DIMENSION_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:negative|zero|positive|must be|radius|diameter|height|width|depth|length|thickness|dimension|size)\b")
        .expect("Invalid regex")
});

/// Kernel failure markers reported by OpenCascade through CadQuery
const KERNEL_MARKERS: &[&str] = &[
    "StdFail_NotDone",
    "BRep_API",
    "Standard_ConstructionError",
    "Standard_Failure",
    "null shape",
    "Null TopoDS_Shape",
    "No pending wires",
    "InvalidShape",
    "BRepAlgoAPI",
];

/// JSON report printed by the harness
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HarnessReport {
    pub ok: bool,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub line: Option<usize>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exception: Option<String>,
}

/// Map a harness report onto a sandbox outcome
pub fn classify_report(report: &HarnessReport) -> SandboxOutcome {
    if report.ok {
        return SandboxOutcome::Success;
    }
    let exception = report.exception.as_deref().unwrap_or_default();
    let message = report.message.as_str();

    let mut diagnostic = match report.kind.as_deref() {
        Some("syntax") => Diagnostic::new(DiagnosticKind::Syntax, message),
        Some("missing_result") => Diagnostic::new(DiagnosticKind::MissingResult, message),
        Some("name_error") => {
            let name = report.name.clone().or_else(|| {
                UNDEFINED_NAME
                    .captures(message)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string())
            });
            let diagnostic = Diagnostic::new(DiagnosticKind::UndefinedParameter, message);
            match name {
                Some(name) => diagnostic.with_construct(name),
                None => diagnostic,
            }
        }
        _ => {
            let text = format!("{exception}: {message}");
            let kind = if KERNEL_MARKERS
                .iter()
                .any(|marker| text.contains(marker))
            {
                DiagnosticKind::GeometricDegeneracy
            } else if exception == "ZeroDivisionError"
                || (exception == "ValueError" && DIMENSION_WORDS.is_match(message))
            {
                DiagnosticKind::InvalidDimension
            } else {
                DiagnosticKind::Runtime
            };
            let diagnostic = Diagnostic::new(kind, text.trim_start_matches(": ").to_string());
            if exception.is_empty() {
                diagnostic
            } else {
                diagnostic.with_construct(exception.to_string())
            }
        }
    };
    if let Some(line) = report.line {
        diagnostic = diagnostic.with_line(line);
    }
    SandboxOutcome::Failure(diagnostic)
}

/// Sandbox running scripts in a separate Python interpreter
#[derive(Debug, Clone)]
pub struct PythonSandbox {
    interpreter: String,
}

impl PythonSandbox {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }
}

impl Default for PythonSandbox {
    fn default() -> Self {
        Self::new(DEFAULT_PYTHON_INTERPRETER)
    }
}

#[async_trait]
impl ScriptSandbox for PythonSandbox {
    async fn execute(&self, script: &str, timeout: Duration) -> Result<SandboxOutcome> {
        let mut file = tempfile::Builder::new()
            .prefix("cadgen-")
            .suffix(".py")
            .tempfile()
            .map_err(|e| Error::io_with_source("Failed to create script file", e))?;
        file.write_all(script.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| Error::io_with_source("Failed to write script file", e))?;

        let child = Command::new(&self.interpreter)
            .arg("-c")
            .arg(HARNESS)
            .arg(file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::sandbox(format!("Failed to start {}: {e}", self.interpreter)))?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => {
                output.map_err(|e| Error::sandbox(format!("Interpreter failed: {e}")))?
            }
            Err(_) => {
                warn!(?timeout, "Script execution timed out");
                return Ok(SandboxOutcome::Failure(Diagnostic::new(
                    DiagnosticKind::Timeout,
                    format!("execution exceeded {timeout:?}"),
                )));
            }
        };

        // Scripts may print; the report is the last line
        let stdout = String::from_utf8_lossy(&output.stdout);
        let last_line = stdout
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or_default();
        match serde_json::from_str::<HarnessReport>(last_line.trim()) {
            Ok(report) => {
                debug!(ok = report.ok, kind = ?report.kind, "Harness report");
                Ok(classify_report(&report))
            }
            Err(_) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let tail_start = stderr.len().saturating_sub(STDERR_TAIL_BYTES);
                let tail_start = (tail_start..stderr.len())
                    .find(|i| stderr.is_char_boundary(*i))
                    .unwrap_or(stderr.len());
                Ok(SandboxOutcome::Failure(Diagnostic::new(
                    DiagnosticKind::Runtime,
                    format!(
                        "interpreter exited with {} and no report: {}",
                        output.status,
                        stderr[tail_start..].trim()
                    ),
                )))
            }
        }
    }

    fn sandbox_name(&self) -> &str {
        "python"
    }
}
