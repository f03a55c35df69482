//! # Core Module
//!
//! Shared configuration types used by the presentation pipeline.

pub mod config;

pub use config::{Config, ConfigError, PresentConfig, WindowConfig};
