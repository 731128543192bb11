//! Null text generation provider
//!
//! Answers with the first Python block found in the prompt, so direct
//! adaptation works offline: the reference script comes back unchanged and
//! post-processing binds parameters and removes disabled features. Prompts
//! without a script get a parametric box.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use cadgen_domain::error::Result;
use cadgen_domain::ports::providers::{GenerationRequest, TextGenerationProvider};

use crate::constants::GENERATION_MODEL_NULL;

static PYTHON_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```python\s*\n(.*?)```").expect("Invalid regex"));

const FALLBACK_SCRIPT: &str = r#"import cadquery as cq

width = 50
depth = 50
height = 50

result = cq.Workplane("XY").box(width, depth, height)"#;

/// Offline generator
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGenerationProvider;

impl NullGenerationProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextGenerationProvider for NullGenerationProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let script = PYTHON_BLOCK
            .captures(&request.prompt)
            .and_then(|captures| captures.get(1))
            .map_or(FALLBACK_SCRIPT, |block| block.as_str().trim_end());
        Ok(format!("```python\n{script}\n```"))
    }

    fn provider_name(&self) -> &str {
        "null"
    }

    fn model(&self) -> &str {
        GENERATION_MODEL_NULL
    }
}
