//! Code Synthesizer Use Case
//!
//! Builds a prompt from the strategy, reference, parameters and toggles,
//! calls the generative collaborator and post-processes the reply into a
//! script that parses, carries every bound parameter literally and holds
//! no code of a disabled feature. Rejected replies are retried with a
//! "fix this" instruction up to a fixed bound.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use cadgen_domain::constants::{DEFAULT_SYNTHESIS_RETRIES, feature_root};
use cadgen_domain::entities::GeneratedArtifact;
use cadgen_domain::error::{Error, Result};
use cadgen_domain::ports::providers::{
    GenerationRequest, ScriptSyntaxChecker, TextGenerationProvider,
};
use cadgen_domain::value_objects::{FeatureSpec, GenerationBudget};
use tracing::{debug, info, warn};

use crate::domain_services::prompt::PromptBuilder;
use crate::domain_services::script::{
    bind_parameters, extract_script, feature_of, looks_like_script, mentions_feature,
    strip_feature,
};
use crate::ports::services::{CodeSynthesizerInterface, SynthesisRequest};

/// Synthesizer backed by a text generation provider
pub struct CodeSynthesizer {
    generator: Arc<dyn TextGenerationProvider>,
    syntax: Arc<dyn ScriptSyntaxChecker>,
    prompts: PromptBuilder,
    budget: GenerationBudget,
    max_retries: usize,
}

impl CodeSynthesizer {
    pub fn new(
        generator: Arc<dyn TextGenerationProvider>,
        syntax: Arc<dyn ScriptSyntaxChecker>,
        budget: GenerationBudget,
    ) -> Self {
        Self {
            generator,
            syntax,
            prompts: PromptBuilder::new(budget),
            budget,
            max_retries: DEFAULT_SYNTHESIS_RETRIES,
        }
    }

    /// Extra attempts after the first rejected reply
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Total generation calls one synthesis may make
    pub fn max_attempts(&self) -> usize {
        self.max_retries + 1
    }

    /// Turn a raw reply into an accepted script and the values bound in it,
    /// or say why it was rejected
    fn post_process(
        &self,
        raw: &str,
        request: &SynthesisRequest,
    ) -> std::result::Result<(String, BTreeMap<String, f64>), String> {
        let mut script = extract_script(raw);
        if script.is_empty() || !looks_like_script(&script) {
            return Err("the answer contains no script".to_string());
        }
        self.syntax
            .check(&script)
            .map_err(|issue| format!("the script does not parse ({issue})"))?;

        let disabled: Vec<FeatureSpec> = request
            .toggles
            .disabled()
            .map(|name| FeatureSpec {
                name: name.to_string(),
                keyword: feature_root(name).to_string(),
                default_enabled: false,
            })
            .collect();
        for feature in &disabled {
            script = strip_feature(&script, &feature.keyword);
        }

        let parameters: BTreeMap<String, f64> = request
            .parameters
            .iter()
            .filter(|(name, _)| feature_of(name, &disabled).is_none())
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        script = bind_parameters(&script, &parameters);

        self.syntax
            .check(&script)
            .map_err(|issue| format!("the script does not parse after editing ({issue})"))?;
        if let Some(feature) = disabled
            .iter()
            .find(|feature| mentions_feature(&script, &feature.keyword))
        {
            return Err(format!(
                "the script still builds the {} although it must be omitted",
                feature.name.replace('_', " ")
            ));
        }
        Ok((script, parameters))
    }

    async fn generate_once(&self, prompt: String) -> std::result::Result<String, String> {
        let call = GenerationRequest {
            prompt,
            temperature: self.budget.temperature,
            max_tokens: self.budget.max_tokens,
            context_window: self.budget.context_window,
        };
        match tokio::time::timeout(self.budget.timeout, self.generator.generate(&call)).await {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(Error::timeout("generation", self.budget.timeout).to_string()),
        }
    }
}

#[async_trait]
impl CodeSynthesizerInterface for CodeSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<GeneratedArtifact> {
        let attempts = self.max_attempts();
        let mut problem: Option<String> = None;

        for attempt in 1..=attempts {
            let prompt = self.prompts.build(request, problem.as_deref());
            debug!(attempt, strategy = %request.strategy, prompt_chars = prompt.len(), "Generating script");

            let outcome = match self.generate_once(prompt).await {
                Ok(raw) => self.post_process(&raw, request),
                Err(failure) => Err(format!("generation failed: {failure}")),
            };
            match outcome {
                Ok((script, parameters)) => {
                    info!(attempt, strategy = %request.strategy, "Script synthesized");
                    let reference_name = request
                        .strategy
                        .uses_reference()
                        .then(|| request.reference.as_ref().map(|r| r.name.clone()))
                        .flatten();
                    return Ok(GeneratedArtifact::new(
                        script,
                        request.strategy,
                        reference_name,
                        parameters,
                        request.toggles.clone(),
                        attempt,
                    ));
                }
                Err(reason) => {
                    warn!(attempt, max_attempts = attempts, %reason, "Generated script rejected");
                    problem = Some(reason);
                }
            }
        }

        Err(Error::SynthesisFailed {
            attempts,
            diagnostic: problem.unwrap_or_else(|| "no attempt was made".to_string()),
        })
    }
}
