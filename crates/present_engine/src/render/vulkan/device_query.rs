//! Per-device capability queries
//!
//! Device selection only needs a handful of read-only queries against a
//! physical device and the target surface. `DeviceQuery` names them so the
//! selection logic runs the same against a live driver or a test double.

use std::ffi::{CStr, CString};

use ash::{vk, Instance};

use super::{Surface, VulkanResult};

/// Read-only queries against a physical device and a presentation surface
pub trait DeviceQuery {
    /// Queue family properties, indexed by family index
    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties>;

    /// Whether queue family `index` can present to the surface
    fn supports_present(&self, device: vk::PhysicalDevice, index: u32) -> VulkanResult<bool>;

    /// Names of every device extension the device supports
    fn extension_names(&self, device: vk::PhysicalDevice) -> VulkanResult<Vec<CString>>;

    /// Surface capabilities for this device
    fn surface_capabilities(&self, device: vk::PhysicalDevice) -> VulkanResult<vk::SurfaceCapabilitiesKHR>;

    /// Supported surface formats, in driver order
    fn surface_formats(&self, device: vk::PhysicalDevice) -> VulkanResult<Vec<vk::SurfaceFormatKHR>>;

    /// Supported present modes, in driver order
    fn present_modes(&self, device: vk::PhysicalDevice) -> VulkanResult<Vec<vk::PresentModeKHR>>;

    /// Human-readable device name for logging
    fn device_name(&self, device: vk::PhysicalDevice) -> String;
}

/// `DeviceQuery` backed by a live instance and surface
pub struct VulkanDeviceQuery<'a> {
    instance: &'a Instance,
    surface: &'a Surface,
}

impl<'a> VulkanDeviceQuery<'a> {
    /// Query devices of `instance` against `surface`
    pub const fn new(instance: &'a Instance, surface: &'a Surface) -> Self {
        Self { instance, surface }
    }
}

impl DeviceQuery for VulkanDeviceQuery<'_> {
    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        unsafe { self.instance.get_physical_device_queue_family_properties(device) }
    }

    fn supports_present(&self, device: vk::PhysicalDevice, index: u32) -> VulkanResult<bool> {
        self.surface.supports_present(device, index)
    }

    fn extension_names(&self, device: vk::PhysicalDevice) -> VulkanResult<Vec<CString>> {
        let properties = unsafe { self.instance.enumerate_device_extension_properties(device)? };

        Ok(properties
            .iter()
            .map(|p| unsafe { CStr::from_ptr(p.extension_name.as_ptr()) }.to_owned())
            .collect())
    }

    fn surface_capabilities(&self, device: vk::PhysicalDevice) -> VulkanResult<vk::SurfaceCapabilitiesKHR> {
        self.surface.capabilities(device)
    }

    fn surface_formats(&self, device: vk::PhysicalDevice) -> VulkanResult<Vec<vk::SurfaceFormatKHR>> {
        self.surface.formats(device)
    }

    fn present_modes(&self, device: vk::PhysicalDevice) -> VulkanResult<Vec<vk::PresentModeKHR>> {
        self.surface.present_modes(device)
    }

    fn device_name(&self, device: vk::PhysicalDevice) -> String {
        let properties = unsafe { self.instance.get_physical_device_properties(device) };
        unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }
}
