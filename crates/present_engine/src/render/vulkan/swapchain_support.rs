//! Swapchain support queries and negotiation policy
//!
//! `SwapchainSupport` snapshots what a device offers for a surface; the
//! `choose_*` functions turn that snapshot into concrete swapchain settings.

use ash::vk;

use super::{DeviceQuery, QueueFamilies, VulkanResult};

/// Sentinel current-extent width meaning "the swapchain decides the size"
pub const UNDEFINED_EXTENT: u32 = u32::MAX;

/// Surface capabilities, formats and present modes for one device
#[derive(Debug, Clone)]
pub struct SwapchainSupport {
    /// Image count, extent and transform limits
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    /// Supported formats, in driver order
    pub formats: Vec<vk::SurfaceFormatKHR>,
    /// Supported present modes, in driver order
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupport {
    /// Query swapchain support for `device`
    pub fn query<P: DeviceQuery>(queries: &P, device: vk::PhysicalDevice) -> VulkanResult<Self> {
        let capabilities = queries.surface_capabilities(device)?;
        let formats = queries.surface_formats(device)?;
        let present_modes = queries.present_modes(device)?;

        log::debug!(
            "Swapchain support: {} formats, {} present modes, image count: {}-{}",
            formats.len(),
            present_modes.len(),
            capabilities.min_image_count,
            if capabilities.max_image_count == 0 {
                "unlimited".to_string()
            } else {
                capabilities.max_image_count.to_string()
            }
        );

        Ok(Self {
            capabilities,
            formats,
            present_modes,
        })
    }

    /// At least one format and one present mode are available
    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}

/// Prefer BGRA8 sRGB with the sRGB non-linear color space, else the first entry
///
/// Returns `None` only for an empty list.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .find(|sf| sf.format == vk::Format::B8G8R8A8_SRGB && sf.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR)
        .or_else(|| formats.first())
        .copied()
}

/// Prefer mailbox, else FIFO, which every implementation must support
pub fn choose_present_mode(present_modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    if present_modes.contains(&vk::PresentModeKHR::MAILBOX) {
        vk::PresentModeKHR::MAILBOX
    } else {
        vk::PresentModeKHR::FIFO
    }
}

/// Use the surface's current extent, or clamp the framebuffer size into range
pub fn choose_extent(capabilities: &vk::SurfaceCapabilitiesKHR, framebuffer_size: (u32, u32)) -> vk::Extent2D {
    if capabilities.current_extent.width != UNDEFINED_EXTENT {
        return capabilities.current_extent;
    }

    let (width, height) = framebuffer_size;
    vk::Extent2D {
        width: width.clamp(
            capabilities.min_image_extent.width,
            capabilities.max_image_extent.width,
        ),
        height: height.clamp(
            capabilities.min_image_extent.height,
            capabilities.max_image_extent.height,
        ),
    }
}

/// One image over the minimum, capped by the maximum when it is non-zero
pub const fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let desired = capabilities.min_image_count + 1;
    if capabilities.max_image_count > 0 && desired > capabilities.max_image_count {
        capabilities.max_image_count
    } else {
        desired
    }
}

/// Image sharing mode and the family list that goes with it
///
/// Distinct graphics and present families share images concurrently across
/// exactly those two; a single family owns them exclusively with no list.
pub fn image_sharing(families: &QueueFamilies) -> (vk::SharingMode, Vec<u32>) {
    if families.is_shared() {
        (vk::SharingMode::EXCLUSIVE, Vec::new())
    } else {
        (vk::SharingMode::CONCURRENT, vec![families.graphics, families.present])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR { format, color_space }
    }

    fn capabilities(min: u32, max: u32) -> vk::SurfaceCapabilitiesKHR {
        vk::SurfaceCapabilitiesKHR {
            min_image_count: min,
            max_image_count: max,
            current_extent: vk::Extent2D { width: 800, height: 600 },
            min_image_extent: vk::Extent2D { width: 1, height: 1 },
            max_image_extent: vk::Extent2D { width: 4096, height: 4096 },
            ..Default::default()
        }
    }

    #[test]
    fn test_preferred_format_found_anywhere() {
        let preferred = format(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR);
        let formats = [
            format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT),
            preferred,
        ];

        assert_eq!(choose_surface_format(&formats), Some(preferred));
    }

    #[test]
    fn test_format_falls_back_to_first_entry() {
        let formats = [
            format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];

        assert_eq!(choose_surface_format(&formats), Some(formats[0]));
    }

    #[test]
    fn test_no_formats_yields_none() {
        assert_eq!(choose_surface_format(&[]), None);
    }

    #[test]
    fn test_mailbox_preferred_regardless_of_order() {
        let modes = [
            vk::PresentModeKHR::IMMEDIATE,
            vk::PresentModeKHR::FIFO,
            vk::PresentModeKHR::MAILBOX,
        ];
        assert_eq!(choose_present_mode(&modes), vk::PresentModeKHR::MAILBOX);
    }

    #[test]
    fn test_present_mode_falls_back_to_fifo() {
        let modes = [vk::PresentModeKHR::IMMEDIATE, vk::PresentModeKHR::FIFO_RELAXED];
        assert_eq!(choose_present_mode(&modes), vk::PresentModeKHR::FIFO);
    }

    #[test]
    fn test_defined_current_extent_used_verbatim() {
        let caps = capabilities(2, 0);
        let extent = choose_extent(&caps, (10_000, 3));

        assert_eq!(extent, vk::Extent2D { width: 800, height: 600 });
    }

    #[test]
    fn test_undefined_extent_clamps_framebuffer_per_axis() {
        let mut caps = capabilities(2, 0);
        caps.current_extent = vk::Extent2D { width: UNDEFINED_EXTENT, height: UNDEFINED_EXTENT };
        caps.min_image_extent = vk::Extent2D { width: 100, height: 200 };
        caps.max_image_extent = vk::Extent2D { width: 1000, height: 500 };

        assert_eq!(choose_extent(&caps, (50, 300)), vk::Extent2D { width: 100, height: 300 });
        assert_eq!(choose_extent(&caps, (1920, 1080)), vk::Extent2D { width: 1000, height: 500 });
        assert_eq!(choose_extent(&caps, (640, 480)), vk::Extent2D { width: 640, height: 480 });
    }

    #[test]
    fn test_image_count_unbounded_max() {
        assert_eq!(choose_image_count(&capabilities(2, 0)), 3);
    }

    #[test]
    fn test_image_count_capped_by_max() {
        assert_eq!(choose_image_count(&capabilities(3, 3)), 3);
    }

    #[test]
    fn test_image_count_below_max() {
        assert_eq!(choose_image_count(&capabilities(2, 8)), 3);
    }

    #[test]
    fn test_shared_family_uses_exclusive_sharing() {
        let (mode, indices) = image_sharing(&QueueFamilies { graphics: 2, present: 2 });

        assert_eq!(mode, vk::SharingMode::EXCLUSIVE);
        assert!(indices.is_empty());
    }

    #[test]
    fn test_split_families_use_concurrent_sharing() {
        let (mode, indices) = image_sharing(&QueueFamilies { graphics: 1, present: 3 });

        assert_eq!(mode, vk::SharingMode::CONCURRENT);
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn test_adequacy_requires_formats_and_modes() {
        let mut support = SwapchainSupport {
            capabilities: capabilities(2, 0),
            formats: vec![format(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR)],
            present_modes: vec![vk::PresentModeKHR::FIFO],
        };
        assert!(support.is_adequate());

        support.present_modes.clear();
        assert!(!support.is_adequate());

        support.present_modes.push(vk::PresentModeKHR::FIFO);
        support.formats.clear();
        assert!(!support.is_adequate());
    }
}
