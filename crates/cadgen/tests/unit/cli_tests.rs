//! Argument parsing tests

use std::path::PathBuf;

use cadgen::cli::{Cli, Command};
use cadgen::domain::value_objects::ComplexityTier;
use clap::Parser;

#[test]
fn test_search_defaults_to_top_three() {
    let cli = Cli::try_parse_from(["cadgen", "search", "coffee mug"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Search {
            query: "coffee mug".to_string(),
            k: 3
        }
    );
    assert!(cli.config.is_none());
}

#[test]
fn test_global_config_flag_after_subcommand() {
    let cli = Cli::try_parse_from(["cadgen", "stats", "--config", "dev.toml"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("dev.toml")));
    assert_eq!(cli.command, Command::Stats);
}

#[test]
fn test_add_reference_parses_tier_aliases() {
    let cli = Cli::try_parse_from([
        "cadgen",
        "add-reference",
        "--name",
        "wall_hook",
        "--description",
        "A hook screwed to a wall",
        "--script-file",
        "hook.py",
        "--complexity",
        "medium",
    ])
    .unwrap();
    match cli.command {
        Command::AddReference {
            complexity,
            category,
            script_file,
            ..
        } => {
            assert_eq!(complexity, ComplexityTier::Functional);
            assert_eq!(category, "general");
            assert_eq!(script_file, PathBuf::from("hook.py"));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_unknown_tier_rejected() {
    let parsed = Cli::try_parse_from([
        "cadgen",
        "add-reference",
        "--name",
        "x",
        "--description",
        "y",
        "--script-file",
        "x.py",
        "--complexity",
        "galactic",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["cadgen"]).is_err());
}
