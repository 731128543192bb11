//! Library maintenance commands

use std::path::PathBuf;

use cadgen_application::use_cases::NewReference;
use cadgen_domain::error::{Error, Result};
use cadgen_domain::value_objects::{ComplexityTier, format_value};
use cadgen_infrastructure::di::AppContext;
use cadgen_infrastructure::error_ext::ErrorContext;

use super::render::{format_matches, format_report};

pub(super) struct AddArgs {
    pub name: String,
    pub description: String,
    pub script_file: PathBuf,
    pub complexity: ComplexityTier,
    pub category: String,
}

pub(super) async fn search(context: &AppContext, query: &str, k: usize) -> Result<()> {
    if k == 0 {
        return Err(Error::invalid_argument("k must be at least 1"));
    }
    let matches = context.library().search(query, k).await?;
    print!("{}", format_matches(&matches, context.engine().selector()));
    Ok(())
}

pub(super) async fn add_reference(context: &AppContext, args: AddArgs) -> Result<()> {
    let script = tokio::fs::read_to_string(&args.script_file)
        .await
        .io_context(format!("Failed to read {}", args.script_file.display()))?;

    let library = context.library();
    // Cached embeddings are reused, so this only embeds what is new
    if context.initialize().await?.is_none() {
        return Err(Error::embedding_unavailable(
            "the reference cannot be indexed while the embedding service is down",
        ));
    }
    let example = library
        .add_reference_example(NewReference {
            name: args.name,
            description: args.description,
            script,
            complexity: args.complexity,
            category: args.category,
        })
        .await?;

    println!(
        "Added '{}' ({}, {}) with {} parameter(s)",
        example.name,
        example.complexity,
        example.category,
        example.parameters.len()
    );
    for parameter in &example.parameters {
        println!(
            "  {} = {}{}",
            parameter.name,
            format_value(parameter.default),
            if parameter.required { "  (asked)" } else { "" }
        );
    }
    Ok(())
}

pub(super) async fn rebuild(context: &AppContext) -> Result<()> {
    let report = context.library().rebuild().await?;
    println!("{}", format_report(&report));
    Ok(())
}

pub(super) fn stats(context: &AppContext) -> Result<()> {
    let stats = context.library().store().stats();
    let json = serde_json::to_string_pretty(&stats)?;
    println!("{json}");
    Ok(())
}
