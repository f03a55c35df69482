//! # Present Engine
//!
//! Vulkan device selection and swapchain negotiation for a GLFW window.
//!
//! ```rust,no_run
//! use present_engine::prelude::*;
//!
//! fn main() -> Result<(), VulkanError> {
//!     let config = PresentConfig::default();
//!     let mut window = Window::new(&config.window)?;
//!     let context = PresentContext::new(&window, &config)?;
//!
//!     while !window.should_close() {
//!         window.poll_events();
//!     }
//!
//!     drop(context);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{Config, ConfigError, PresentConfig, WindowConfig},
        render::vulkan::{PresentContext, VulkanError, VulkanResult, Window, WindowError},
    };
}
