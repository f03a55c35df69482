//! Vulkan error types

use ash::vk;
use thiserror::Error;

use super::window::WindowError;

/// Exit status used for failures that carry no driver result code
pub const GENERIC_FAILURE_CODE: i32 = -1;

/// Vulkan-specific error types
#[derive(Error, Debug)]
pub enum VulkanError {
    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// The Vulkan loader library could not be opened
    #[error("Failed to load Vulkan: {0}")]
    Loading(String),

    /// The window system refused to create a presentation surface
    #[error("Failed to create window surface: {0:?}")]
    SurfaceCreation(vk::Result),

    /// The instance enumerated zero physical devices
    #[error("Failed to find GPUs with Vulkan support")]
    NoPhysicalDevices,

    /// None of the enumerated physical devices can present to the surface
    #[error("Failed to find a suitable GPU")]
    NoSuitableDevice,

    /// Vulkan context initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Window system failure
    #[error(transparent)]
    Window(#[from] WindowError),
}

impl VulkanError {
    /// Process exit status for this error
    ///
    /// Driver failures report the raw `VkResult`; everything else is -1.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Api(result) | Self::SurfaceCreation(result) => result.as_raw(),
            _ => GENERIC_FAILURE_CODE,
        }
    }
}

impl From<vk::Result> for VulkanError {
    fn from(result: vk::Result) -> Self {
        Self::Api(result)
    }
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;
