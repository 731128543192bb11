//! # cadgen Infrastructure Layer
//!
//! Cross-cutting technical concerns around the engine:
//!
//! - **config** - Figment-based loading (defaults, TOML file, `CADGEN__` environment)
//! - **logging** - `tracing-subscriber` setup with optional JSON and rolling file output
//! - **error_ext** - Context helpers that turn foreign errors into domain errors
//! - **di** - Provider factory and the bootstrap that assembles the services

/// Infrastructure constants
pub mod constants;

/// Configuration types and loader
pub mod config;

/// Error context extensions
pub mod error_ext;

/// Logging setup
pub mod logging;

/// Service wiring
pub mod di;

pub use config::{AppConfig, ConfigLoader};
pub use di::{AppContext, init_app};
