//! Physical device selection
//!
//! Walks the enumerated GPUs in order and takes the first one that has both
//! queue roles, every required device extension, and an adequate swapchain.
//! There is no ranking between suitable devices.

use std::ffi::{CStr, CString};

use ash::vk;

use super::{DeviceQuery, QueueFamilies, QueueFamilyIndices, SwapchainSupport, VulkanError, VulkanResult};

/// The selected GPU and the queue roles resolved on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalDeviceInfo {
    /// Vulkan physical device handle
    pub device: vk::PhysicalDevice,
    /// Graphics and present family indices
    pub queue_families: QueueFamilies,
}

impl PhysicalDeviceInfo {
    /// Select the first suitable device among `candidates`
    pub fn select_suitable_device<P: DeviceQuery>(
        queries: &P,
        candidates: &[vk::PhysicalDevice],
        required_extensions: &[&CStr],
    ) -> VulkanResult<Self> {
        if candidates.is_empty() {
            return Err(VulkanError::NoPhysicalDevices);
        }

        for &device in candidates {
            let name = queries.device_name(device);
            log::info!("Evaluating GPU: {name}");

            if let Some(queue_families) = evaluate_device(queries, device, required_extensions)? {
                log::info!("Selected GPU: {name}");
                return Ok(Self { device, queue_families });
            }
        }

        Err(VulkanError::NoSuitableDevice)
    }
}

/// Queue roles of `device` if it is suitable, `None` otherwise
///
/// Checks run in order and stop at the first failure, so later queries are
/// never issued against a device that already failed an earlier one.
fn evaluate_device<P: DeviceQuery>(
    queries: &P,
    device: vk::PhysicalDevice,
    required_extensions: &[&CStr],
) -> VulkanResult<Option<QueueFamilies>> {
    let Some(queue_families) = QueueFamilyIndices::resolve(queries, device).complete() else {
        log::debug!("Rejected: missing graphics or present queue family");
        return Ok(None);
    };

    if !extensions_supported(&queries.extension_names(device)?, required_extensions) {
        log::debug!("Rejected: required device extensions not supported");
        return Ok(None);
    }

    if !SwapchainSupport::query(queries, device)?.is_adequate() {
        log::debug!("Rejected: no surface formats or present modes");
        return Ok(None);
    }

    Ok(Some(queue_families))
}

/// Every required extension name appears among `available`
pub fn extensions_supported(available: &[CString], required: &[&CStr]) -> bool {
    required
        .iter()
        .all(|required| available.iter().any(|name| name.as_c_str() == *required))
}
