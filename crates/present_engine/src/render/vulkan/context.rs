//! Vulkan presentation context
//!
//! Builds instance, surface, device selection, logical device and swapchain
//! in that order against a window, and owns the result.
//!
//! Teardown is ownership-driven. While building, each stage is a local, so a
//! failure drops exactly the stages already built, newest first. Once built,
//! the fields drop in declaration order: swapchain, device, surface, instance.
//! The window is owned by the caller and must outlive the context.

use std::ffi::CStr;

use ash::extensions::khr::Swapchain as SwapchainLoader;
use ash::vk;

use super::{
    LogicalDevice, PhysicalDeviceInfo, Surface, Swapchain, VulkanDeviceQuery, VulkanInstance, VulkanResult, Window,
};
use crate::core::PresentConfig;

/// Device extensions every selected GPU must support
pub fn required_device_extensions() -> Vec<&'static CStr> {
    vec![SwapchainLoader::name()]
}

/// Instance, surface, device and swapchain owned as one unit
///
/// Generic over the owned stage types; [`PresentContext`] is the live one.
pub struct PresentChain<I, S, D, C> {
    // Declaration order is destruction order.
    swapchain: C,
    device: D,
    physical_device: PhysicalDeviceInfo,
    surface: S,
    instance: I,
}

/// Main Vulkan context that owns all core Vulkan resources
pub type PresentContext = PresentChain<VulkanInstance, Surface, LogicalDevice, Swapchain>;

impl<I, S, D, C> PresentChain<I, S, D, C> {
    /// Run each stage against the ones built before it
    ///
    /// The first failing stage ends the build and its error is returned
    /// unchanged, after the stages already built are dropped newest first.
    pub fn build<FI, FS, FP, FD, FC>(
        create_instance: FI,
        create_surface: FS,
        select_device: FP,
        create_device: FD,
        create_swapchain: FC,
    ) -> VulkanResult<Self>
    where
        FI: FnOnce() -> VulkanResult<I>,
        FS: FnOnce(&I) -> VulkanResult<S>,
        FP: FnOnce(&I, &S) -> VulkanResult<PhysicalDeviceInfo>,
        FD: FnOnce(&I, &PhysicalDeviceInfo) -> VulkanResult<D>,
        FC: FnOnce(&I, &S, &PhysicalDeviceInfo, &D) -> VulkanResult<C>,
    {
        let instance = create_instance()?;
        let surface = create_surface(&instance)?;
        let physical_device = select_device(&instance, &surface)?;
        let device = create_device(&instance, &physical_device)?;
        let swapchain = create_swapchain(&instance, &surface, &physical_device, &device)?;

        Ok(Self {
            swapchain,
            device,
            physical_device,
            surface,
            instance,
        })
    }

    /// Get the instance stage
    pub const fn instance(&self) -> &I {
        &self.instance
    }

    /// Get the surface
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Get the physical device info
    pub const fn physical_device(&self) -> &PhysicalDeviceInfo {
        &self.physical_device
    }

    /// Get the logical device
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Get the swapchain
    pub const fn swapchain(&self) -> &C {
        &self.swapchain
    }
}

impl PresentContext {
    /// Negotiate a device and swapchain for `window`
    pub fn new(window: &Window, config: &PresentConfig) -> VulkanResult<Self> {
        let required_extensions = required_device_extensions();

        Self::build(
            || VulkanInstance::new(window, config),
            |instance| Surface::new(instance, window),
            |instance, surface| {
                let candidates = instance.physical_devices()?;
                log::info!("Found {} physical device(s)", candidates.len());

                let queries = VulkanDeviceQuery::new(&instance.instance, surface);
                PhysicalDeviceInfo::select_suitable_device(&queries, &candidates, &required_extensions)
            },
            |instance, physical_device| LogicalDevice::new(&instance.instance, physical_device, &required_extensions),
            |instance, surface, physical_device, device| {
                let queries = VulkanDeviceQuery::new(&instance.instance, surface);
                Swapchain::new(&queries, device, surface, physical_device, window.framebuffer_size())
            },
        )
    }

    /// Get the graphics queue
    pub const fn graphics_queue(&self) -> vk::Queue {
        self.device.graphics_queue
    }

    /// Get the present queue
    pub const fn present_queue(&self) -> vk::Queue {
        self.device.present_queue
    }
}

impl<I, S, D, C> Drop for PresentChain<I, S, D, C> {
    fn drop(&mut self) {
        log::info!("Tearing down Vulkan context");
    }
}
