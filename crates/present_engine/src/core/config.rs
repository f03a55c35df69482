//! # Presentation Configuration
//!
//! Settings consumed while negotiating a device and swapchain for a window.
//!
//! Everything has a compiled-in default: an 800x600 window and validation
//! layers in debug builds only. The `Config` trait parses the same settings
//! from TOML or RON text.

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Default window width in screen coordinates
pub const DEFAULT_WIDTH: u32 = 800;
/// Default window height in screen coordinates
pub const DEFAULT_HEIGHT: u32 = 600;
/// Default window title
pub const DEFAULT_TITLE: &str = "Vulkan";

/// # Window Configuration
///
/// Size and title of the window the surface is created against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window width in screen coordinates
    pub width: u32,
    /// Window height in screen coordinates
    pub height: u32,
    /// Window title
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// # Presentation Pipeline Configuration
///
/// Top-level configuration for building the instance, device and swapchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Application name for Vulkan instance creation
    pub application_name: String,
    /// Application version (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Whether to enable Vulkan validation layers
    pub enable_validation: Option<bool>,
}

impl PresentConfig {
    /// Create a new configuration with default window settings
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            window: WindowConfig::default(),
            application_name: app_name.into(),
            application_version: (1, 0, 0),
            enable_validation: None, // Auto-detect based on build type
        }
    }

    /// Set window size
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    /// Set window title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// Set application version
    #[must_use]
    pub fn with_version(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.application_version = (major, minor, patch);
        self
    }

    /// Enable or disable validation layers
    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.enable_validation = Some(enabled);
        self
    }

    /// Whether validation layers should be requested
    ///
    /// Falls back to the build type when unset.
    pub fn validation_enabled(&self) -> bool {
        self.enable_validation.unwrap_or(cfg!(debug_assertions))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self.window.title.is_empty() {
            return Err(ConfigError::Invalid("window title cannot be empty".to_string()));
        }

        if self.application_name.is_empty() {
            return Err(ConfigError::Invalid("application name cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl Default for PresentConfig {
    fn default() -> Self {
        Self::new("Hello Swapchain")
    }
}

impl Config for PresentConfig {}
