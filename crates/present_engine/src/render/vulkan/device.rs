//! Logical device creation
//!
//! One queue is requested per distinct family among the graphics and present
//! roles; when both roles share a family the two queue handles alias.

use std::ffi::{c_char, CStr};

use ash::extensions::khr::Swapchain as SwapchainLoader;
use ash::{vk, Device, Instance};

use super::{PhysicalDeviceInfo, QueueFamilies, VulkanResult};

/// Priority given to every requested queue
pub const QUEUE_PRIORITY: f32 = 1.0;

/// Families to request one queue each from, graphics first
pub fn queue_create_families(families: &QueueFamilies) -> Vec<u32> {
    families.unique()
}

/// Logical device wrapper with RAII cleanup
pub struct LogicalDevice {
    /// Vulkan logical device handle
    pub device: Device,
    /// Graphics operations queue
    pub graphics_queue: vk::Queue,
    /// Surface presentation queue
    pub present_queue: vk::Queue,
    /// Graphics and present family indices the queues came from
    pub queue_families: QueueFamilies,
    /// Swapchain extension loader
    pub swapchain_loader: SwapchainLoader,
}

impl LogicalDevice {
    /// Create a new logical device with the required extensions and queues
    ///
    /// Takes resolved `QueueFamilies`, so it cannot be built from a device
    /// missing either queue role.
    pub fn new(
        instance: &Instance,
        physical_device_info: &PhysicalDeviceInfo,
        required_extensions: &[&CStr],
    ) -> VulkanResult<Self> {
        let queue_families = physical_device_info.queue_families;
        let priorities = [QUEUE_PRIORITY];

        let queue_infos: Vec<vk::DeviceQueueCreateInfo> = queue_create_families(&queue_families)
            .into_iter()
            .map(|family| {
                vk::DeviceQueueCreateInfo::builder()
                    .queue_family_index(family)
                    .queue_priorities(&priorities)
                    .build()
            })
            .collect();

        let extension_ptrs: Vec<*const c_char> = required_extensions.iter().map(|e| e.as_ptr()).collect();
        let device_features = vk::PhysicalDeviceFeatures::default();

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extension_ptrs)
            .enabled_features(&device_features);

        let device = unsafe { instance.create_device(physical_device_info.device, &create_info, None)? };

        let graphics_queue = unsafe { device.get_device_queue(queue_families.graphics, 0) };
        let present_queue = unsafe { device.get_device_queue(queue_families.present, 0) };

        let swapchain_loader = SwapchainLoader::new(instance, &device);

        log::info!(
            "Created logical device with {} queue families (graphics {}, present {})",
            queue_infos.len(),
            queue_families.graphics,
            queue_families.present
        );

        Ok(Self {
            device,
            graphics_queue,
            present_queue,
            queue_families,
            swapchain_loader,
        })
    }
}

impl Drop for LogicalDevice {
    fn drop(&mut self) {
        unsafe {
            // Ensure device is idle before destruction
            let _ = self.device.device_wait_idle();
            self.device.destroy_device(None);
        }
        log::debug!("Destroyed logical device");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_family_requests_one_queue() {
        let families = QueueFamilies { graphics: 2, present: 2 };
        assert_eq!(queue_create_families(&families), vec![2]);
    }

    #[test]
    fn test_split_families_request_two_queues() {
        let families = QueueFamilies { graphics: 1, present: 3 };
        assert_eq!(queue_create_families(&families), vec![1, 3]);
    }
}
