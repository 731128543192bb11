//! cadgen - Entry Point
//!
//! Binary entry point for the conversational CAD script generator.

use cadgen::cli::{Cli, run};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run(cli).await?;
    Ok(())
}
