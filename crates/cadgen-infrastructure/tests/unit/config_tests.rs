//! Configuration loading tests
//!
//! `figment::Jail` isolates the working directory and environment of each test.

use cadgen_domain::error::Error;
use cadgen_domain::value_objects::PerformanceMode;
use cadgen_infrastructure::config::{AppConfig, ConfigLoader};
use figment::Jail;

fn load_err(loader: &ConfigLoader) -> Error {
    match loader.load() {
        Ok(config) => panic!("expected a configuration error, got {config:?}"),
        Err(e) => e,
    }
}

#[test]
fn test_defaults_without_file_or_environment() {
    Jail::expect_with(|_jail| {
        let config = ConfigLoader::new().load().map_err(|e| e.to_string())?;
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.embedding.provider, "null");
        assert_eq!(config.retrieval.top_k, 3);
        assert!((config.strategy.direct_adaptation - 0.5).abs() < f64::EPSILON);
        Ok(())
    });
}

#[test]
fn test_file_in_working_directory_is_found() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "cadgen.toml",
            r#"
            [generation]
            performance_mode = "quality"
            max_retries = 4

            [strategy]
            direct_adaptation = 0.6
            "#,
        )?;
        let config = ConfigLoader::new().load().map_err(|e| e.to_string())?;
        assert_eq!(config.generation.performance_mode, PerformanceMode::Quality);
        assert_eq!(config.generation.max_retries, 4);
        assert!((config.strategy.direct_adaptation - 0.6).abs() < f64::EPSILON);
        // untouched keys keep their defaults
        assert!((config.strategy.pattern_combination - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.sandbox.provider, "null");
        Ok(())
    });
}

#[test]
fn test_environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
            [retrieval]
            top_k = 2

            [sandbox]
            provider = "python"
            interpreter = "python3.11"
            "#,
        )?;
        jail.set_env("CADGEN__RETRIEVAL__TOP_K", "5");
        jail.set_env("CADGEN__STRATEGY__DIRECT_ADAPTATION", "0.55");
        jail.set_env("CADGEN__CONVERSATION__MAX_QUESTIONS", "2");

        let config = ConfigLoader::new()
            .with_config_path(jail.directory().join("custom.toml"))
            .load()
            .map_err(|e| e.to_string())?;
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.conversation.max_questions, 2);
        assert!((config.strategy.direct_adaptation - 0.55).abs() < 1e-9);
        assert_eq!(config.sandbox.provider, "python");
        assert_eq!(config.sandbox.interpreter, "python3.11");
        Ok(())
    });
}

#[test]
fn test_single_underscore_variables_are_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("CADGEN_LOG", "debug");
        jail.set_env("CADGEN_RETRIEVAL_TOP_K", "9");
        let config = ConfigLoader::new().load().map_err(|e| e.to_string())?;
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.logging.level, "info");
        Ok(())
    });
}

#[test]
fn test_missing_explicit_file_falls_back_to_defaults() {
    Jail::expect_with(|jail| {
        let config = ConfigLoader::new()
            .with_config_path(jail.directory().join("absent.toml"))
            .load()
            .map_err(|e| e.to_string())?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    });
}

#[test]
fn test_thresholds_must_descend() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "cadgen.toml",
            r#"
            [strategy]
            direct_adaptation = 0.5
            pattern_combination = 0.6
            category_adaptation = 0.2
            "#,
        )?;
        let err = load_err(&ConfigLoader::new());
        assert!(matches!(err, Error::Configuration { .. }), "{err}");
        assert!(err.to_string().contains("descending"));
        Ok(())
    });
}

#[test]
fn test_thresholds_must_lie_in_cosine_range() {
    Jail::expect_with(|jail| {
        jail.set_env("CADGEN__STRATEGY__DIRECT_ADAPTATION", "1.5");
        let err = load_err(&ConfigLoader::new());
        assert!(err.to_string().contains("[-1, 1]"), "{err}");
        Ok(())
    });
}

#[test]
fn test_unknown_provider_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("CADGEN__EMBEDDING__PROVIDER", "voyage");
        let err = load_err(&ConfigLoader::new());
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.to_string().contains("voyage"));
        Ok(())
    });
}

#[test]
fn test_openai_requires_api_key() {
    Jail::expect_with(|jail| {
        jail.set_env("CADGEN__EMBEDDING__PROVIDER", "openai");
        let err = load_err(&ConfigLoader::new());
        assert!(err.to_string().contains("api_key"), "{err}");

        jail.set_env("CADGEN__EMBEDDING__API_KEY", "sk-test");
        let config = ConfigLoader::new().load().map_err(|e| e.to_string())?;
        assert_eq!(config.embedding.api_key.as_deref(), Some("sk-test"));
        Ok(())
    });
}

#[test]
fn test_zero_bounds_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("CADGEN__RETRIEVAL__TOP_K", "0");
        assert!(load_err(&ConfigLoader::new()).to_string().contains("top_k"));

        jail.set_env("CADGEN__RETRIEVAL__TOP_K", "3");
        jail.set_env("CADGEN__RETRIEVAL__ATTEMPTS", "0");
        assert!(load_err(&ConfigLoader::new()).to_string().contains("attempts"));

        jail.set_env("CADGEN__RETRIEVAL__ATTEMPTS", "1");
        jail.set_env("CADGEN__SANDBOX__TIMEOUT_SECS", "0");
        assert!(load_err(&ConfigLoader::new()).to_string().contains("timeout"));
        Ok(())
    });
}

#[test]
fn test_invalid_log_level_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("cadgen.toml", "[logging]\nlevel = \"loud\"\n")?;
        let err = load_err(&ConfigLoader::new());
        assert!(err.to_string().contains("Invalid log level"), "{err}");
        Ok(())
    });
}

#[test]
fn test_malformed_file_is_configuration_error() {
    Jail::expect_with(|jail| {
        jail.create_file("cadgen.toml", "[retrieval]\ntop_k = \"many\"\n")?;
        let err = load_err(&ConfigLoader::new());
        assert!(matches!(err, Error::Configuration { source: Some(_), .. }), "{err}");
        Ok(())
    });
}

#[test]
fn test_saved_file_loads_back() {
    Jail::expect_with(|jail| {
        let mut config = AppConfig::default();
        config.generation.performance_mode = PerformanceMode::Fast;
        config.sandbox.timeout_secs = 12;
        config.references.path = jail.directory().join("refs.json");

        let path = jail.directory().join("saved.toml");
        let loader = ConfigLoader::new().with_config_path(&path);
        loader.save_to_file(&config, &path).map_err(|e| e.to_string())?;

        let loaded = loader.load().map_err(|e| e.to_string())?;
        assert_eq!(loaded, config);
        assert_eq!(loader.config_path(), Some(path.as_path()));
        Ok(())
    });
}
