//! Vulkan presentation backend
//!
//! Components in construction order: window, instance, surface, device
//! selection (queue families and swapchain support), logical device,
//! swapchain. Each owns its handles and releases them on drop.

pub mod acquire;
pub mod context;
pub mod device;
pub mod device_query;
pub mod error;
pub mod instance;
pub mod physical_device;
pub mod queue_family;
pub mod surface;
pub mod swapchain;
pub mod swapchain_support;
pub mod window;

pub use context::{required_device_extensions, PresentChain, PresentContext};
pub use device::LogicalDevice;
pub use device_query::{DeviceQuery, VulkanDeviceQuery};
pub use error::{VulkanError, VulkanResult, GENERIC_FAILURE_CODE};
pub use instance::VulkanInstance;
pub use physical_device::PhysicalDeviceInfo;
pub use queue_family::{QueueFamilies, QueueFamilyIndices};
pub use surface::Surface;
pub use swapchain::{DeviceSwapchainOps, Swapchain, SwapchainDevice, SwapchainSettings};
pub use swapchain_support::SwapchainSupport;
pub use window::{Window, WindowError, WindowResult};
