//! Configuration module for scrape runs
//!
//! This module provides the `ScrapeConfig` struct and its type-safe builder
//! for configuring lead scraping with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{Complete, ScrapeConfigBuilder, WithKeyword};
pub use types::{ConfigError, Pacing, ScrapeConfig};
