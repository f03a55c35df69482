//! Vulkan swapchain management
//!
//! Negotiates format, present mode, extent and image count from the surface's
//! reported support, creates the swapchain and one color view per image.
//! Always built from scratch; there is no old swapchain to hand over.

use ash::extensions::khr::Swapchain as SwapchainLoader;
use ash::{vk, Device};

use super::acquire::create_all;
use super::swapchain_support::{
    choose_extent, choose_image_count, choose_present_mode, choose_surface_format, image_sharing,
};
use super::{
    DeviceQuery, LogicalDevice, PhysicalDeviceInfo, QueueFamilies, Surface, SwapchainSupport, VulkanError,
    VulkanResult,
};

/// Everything decided before the swapchain is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapchainSettings {
    /// Chosen surface format and color space
    pub format: vk::SurfaceFormatKHR,
    /// Chosen present mode
    pub present_mode: vk::PresentModeKHR,
    /// Chosen image extent
    pub extent: vk::Extent2D,
    /// Requested minimum image count
    pub image_count: u32,
    /// Image sharing mode across queue families
    pub sharing_mode: vk::SharingMode,
    /// Families sharing the images; empty for exclusive sharing
    pub queue_family_indices: Vec<u32>,
    /// Transform applied before presentation
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
}

impl SwapchainSettings {
    /// Pick swapchain settings from `support`
    pub fn negotiate(
        support: &SwapchainSupport,
        queue_families: &QueueFamilies,
        framebuffer_size: (u32, u32),
    ) -> VulkanResult<Self> {
        let format = choose_surface_format(&support.formats)
            .ok_or_else(|| VulkanError::InitializationFailed("Surface reports no formats".to_string()))?;
        let (sharing_mode, queue_family_indices) = image_sharing(queue_families);

        Ok(Self {
            format,
            present_mode: choose_present_mode(&support.present_modes),
            extent: choose_extent(&support.capabilities, framebuffer_size),
            image_count: choose_image_count(&support.capabilities),
            sharing_mode,
            queue_family_indices,
            pre_transform: support.capabilities.current_transform,
        })
    }

    fn create_info(&self, surface: vk::SurfaceKHR) -> vk::SwapchainCreateInfoKHRBuilder<'_> {
        vk::SwapchainCreateInfoKHR::builder()
            .surface(surface)
            .min_image_count(self.image_count)
            .image_format(self.format.format)
            .image_color_space(self.format.color_space)
            .image_extent(self.extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(self.sharing_mode)
            .queue_family_indices(&self.queue_family_indices)
            .pre_transform(self.pre_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(self.present_mode)
            .clipped(true)
            .old_swapchain(vk::SwapchainKHR::null())
    }
}

/// Driver calls a swapchain makes over its lifetime
///
/// The live implementation is [`DeviceSwapchainOps`]; image and view
/// bookkeeping in [`Swapchain`] is written against this trait only.
pub trait SwapchainDevice {
    /// Create the swapchain object
    fn create_swapchain(&self, create_info: &vk::SwapchainCreateInfoKHR) -> VulkanResult<vk::SwapchainKHR>;

    /// Images owned by `swapchain`, in presentation index order
    fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VulkanResult<Vec<vk::Image>>;

    /// Create one image view
    fn create_image_view(&self, create_info: &vk::ImageViewCreateInfo) -> VulkanResult<vk::ImageView>;

    /// Destroy an image view created by `create_image_view`
    fn destroy_image_view(&self, view: vk::ImageView);

    /// Destroy a swapchain created by `create_swapchain`
    fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR);
}

/// `SwapchainDevice` backed by a live logical device
pub struct DeviceSwapchainOps {
    device: Device,
    swapchain_loader: SwapchainLoader,
}

impl DeviceSwapchainOps {
    /// Issue swapchain calls against `device`
    pub fn new(device: &LogicalDevice) -> Self {
        Self {
            device: device.device.clone(),
            swapchain_loader: device.swapchain_loader.clone(),
        }
    }
}

impl SwapchainDevice for DeviceSwapchainOps {
    fn create_swapchain(&self, create_info: &vk::SwapchainCreateInfoKHR) -> VulkanResult<vk::SwapchainKHR> {
        Ok(unsafe { self.swapchain_loader.create_swapchain(create_info, None)? })
    }

    fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VulkanResult<Vec<vk::Image>> {
        Ok(unsafe { self.swapchain_loader.get_swapchain_images(swapchain)? })
    }

    fn create_image_view(&self, create_info: &vk::ImageViewCreateInfo) -> VulkanResult<vk::ImageView> {
        Ok(unsafe { self.device.create_image_view(create_info, None)? })
    }

    fn destroy_image_view(&self, view: vk::ImageView) {
        unsafe { self.device.destroy_image_view(view, None) }
    }

    fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
        unsafe { self.swapchain_loader.destroy_swapchain(swapchain, None) }
    }
}

/// Swapchain management wrapper with RAII cleanup
///
/// Dropping destroys the image views, then the swapchain. The images
/// themselves belong to the swapchain and are never destroyed individually.
pub struct Swapchain<D: SwapchainDevice = DeviceSwapchainOps> {
    ops: D,
    swapchain: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    image_views: Vec<vk::ImageView>,
    settings: SwapchainSettings,
}

impl Swapchain {
    /// Create a new swapchain for `surface`
    pub fn new<Q: DeviceQuery>(
        queries: &Q,
        device: &LogicalDevice,
        surface: &Surface,
        physical_device_info: &PhysicalDeviceInfo,
        framebuffer_size: (u32, u32),
    ) -> VulkanResult<Self> {
        let support = SwapchainSupport::query(queries, physical_device_info.device)?;
        let settings = SwapchainSettings::negotiate(&support, &device.queue_families, framebuffer_size)?;

        log::info!(
            "Swapchain settings: {:?}/{:?}, {:?}, {}x{}, {} images requested, {:?} sharing",
            settings.format.format,
            settings.format.color_space,
            settings.present_mode,
            settings.extent.width,
            settings.extent.height,
            settings.image_count,
            settings.sharing_mode
        );

        Self::create(DeviceSwapchainOps::new(device), surface.handle(), settings)
    }
}

impl<D: SwapchainDevice> Swapchain<D> {
    /// Create the swapchain described by `settings`, then one view per image
    ///
    /// The driver may return more images than requested; every returned
    /// image gets a view.
    pub fn create(ops: D, surface: vk::SurfaceKHR, settings: SwapchainSettings) -> VulkanResult<Self> {
        let swapchain = ops.create_swapchain(&settings.create_info(surface))?;

        // From here on, Drop releases whatever has been built so far.
        let mut chain = Self {
            ops,
            swapchain,
            images: Vec::new(),
            image_views: Vec::new(),
            settings,
        };

        chain.images = chain.ops.swapchain_images(chain.swapchain)?;
        chain.image_views = chain.create_image_views()?;

        log::info!(
            "Created swapchain with {} images ({} requested)",
            chain.images.len(),
            chain.settings.image_count
        );

        Ok(chain)
    }

    fn create_image_views(&self) -> VulkanResult<Vec<vk::ImageView>> {
        let format = self.settings.format.format;
        create_all(
            &self.images,
            |&image| self.ops.create_image_view(&image_view_create_info(image, format)),
            |view| self.ops.destroy_image_view(view),
        )
    }

    /// Get swapchain extent
    pub const fn extent(&self) -> vk::Extent2D {
        self.settings.extent
    }

    /// Get surface format
    pub const fn format(&self) -> vk::SurfaceFormatKHR {
        self.settings.format
    }

    /// Get present mode
    pub const fn present_mode(&self) -> vk::PresentModeKHR {
        self.settings.present_mode
    }

    /// Get the negotiated settings
    pub const fn settings(&self) -> &SwapchainSettings {
        &self.settings
    }

    /// Get the images returned by the driver
    pub fn images(&self) -> &[vk::Image] {
        &self.images
    }

    /// Get image views, one per image
    pub fn image_views(&self) -> &[vk::ImageView] {
        &self.image_views
    }

    /// Get swapchain handle
    pub const fn handle(&self) -> vk::SwapchainKHR {
        self.swapchain
    }
}

impl<D: SwapchainDevice> Drop for Swapchain<D> {
    fn drop(&mut self) {
        for image_view in self.image_views.drain(..) {
            self.ops.destroy_image_view(image_view);
        }
        self.images.clear();

        self.ops.destroy_swapchain(self.swapchain);
        log::debug!("Destroyed swapchain");
    }
}

/// 2D color view over a whole single-level, single-layer image
fn image_view_create_info(image: vk::Image, format: vk::Format) -> vk::ImageViewCreateInfo {
    vk::ImageViewCreateInfo::builder()
        .image(image)
        .view_type(vk::ImageViewType::TYPE_2D)
        .format(format)
        .components(vk::ComponentMapping {
            r: vk::ComponentSwizzle::IDENTITY,
            g: vk::ComponentSwizzle::IDENTITY,
            b: vk::ComponentSwizzle::IDENTITY,
            a: vk::ComponentSwizzle::IDENTITY,
        })
        .subresource_range(vk::ImageSubresourceRange {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        })
        .build()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use ash::vk::Handle;

    fn support() -> SwapchainSupport {
        SwapchainSupport {
            capabilities: vk::SurfaceCapabilitiesKHR {
                min_image_count: 2,
                max_image_count: 0,
                current_extent: vk::Extent2D { width: 800, height: 600 },
                current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
                ..Default::default()
            },
            formats: vec![
                vk::SurfaceFormatKHR {
                    format: vk::Format::R8G8B8A8_UNORM,
                    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
                },
                vk::SurfaceFormatKHR {
                    format: vk::Format::B8G8R8A8_SRGB,
                    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
                },
            ],
            present_modes: vec![vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX],
        }
    }

    #[test]
    fn test_negotiate_shared_family() {
        let settings = SwapchainSettings::negotiate(&support(), &QueueFamilies { graphics: 2, present: 2 }, (800, 600))
            .unwrap();

        assert_eq!(settings.format.format, vk::Format::B8G8R8A8_SRGB);
        assert_eq!(settings.present_mode, vk::PresentModeKHR::MAILBOX);
        assert_eq!(settings.extent, vk::Extent2D { width: 800, height: 600 });
        assert_eq!(settings.image_count, 3);
        assert_eq!(settings.sharing_mode, vk::SharingMode::EXCLUSIVE);
        assert!(settings.queue_family_indices.is_empty());
        assert_eq!(settings.pre_transform, vk::SurfaceTransformFlagsKHR::IDENTITY);
    }

    #[test]
    fn test_negotiate_split_families() {
        let settings = SwapchainSettings::negotiate(&support(), &QueueFamilies { graphics: 1, present: 3 }, (800, 600))
            .unwrap();

        assert_eq!(settings.sharing_mode, vk::SharingMode::CONCURRENT);
        assert_eq!(settings.queue_family_indices, vec![1, 3]);
    }

    #[test]
    fn test_negotiate_rejects_empty_formats() {
        let mut support = support();
        support.formats.clear();

        let result = SwapchainSettings::negotiate(&support, &QueueFamilies { graphics: 0, present: 0 }, (800, 600));
        assert!(matches!(result, Err(VulkanError::InitializationFailed(_))));
    }

    #[test]
    fn test_create_info_fixed_policy() {
        let settings = SwapchainSettings::negotiate(&support(), &QueueFamilies { graphics: 1, present: 3 }, (800, 600))
            .unwrap();
        let info = settings.create_info(vk::SurfaceKHR::from_raw(7));

        assert_eq!(info.surface.as_raw(), 7);
        assert_eq!(info.min_image_count, 3);
        assert_eq!(info.image_array_layers, 1);
        assert_eq!(info.image_usage, vk::ImageUsageFlags::COLOR_ATTACHMENT);
        assert_eq!(info.composite_alpha, vk::CompositeAlphaFlagsKHR::OPAQUE);
        assert_eq!(info.clipped, vk::TRUE);
        assert_eq!(info.old_swapchain, vk::SwapchainKHR::null());
        assert_eq!(info.queue_family_index_count, 2);
    }

    #[test]
    fn test_image_view_covers_one_color_level_and_layer() {
        let info = image_view_create_info(vk::Image::from_raw(1), vk::Format::B8G8R8A8_SRGB);

        assert_eq!(info.view_type, vk::ImageViewType::TYPE_2D);
        assert_eq!(info.format, vk::Format::B8G8R8A8_SRGB);
        assert_eq!(info.components.r, vk::ComponentSwizzle::IDENTITY);
        assert_eq!(info.components.a, vk::ComponentSwizzle::IDENTITY);
        assert_eq!(info.subresource_range.aspect_mask, vk::ImageAspectFlags::COLOR);
        assert_eq!(info.subresource_range.level_count, 1);
        assert_eq!(info.subresource_range.layer_count, 1);
    }

    /// Driver stand-in handing back a fixed number of images
    ///
    /// Views are numbered 100 above the image they cover.
    #[derive(Default)]
    struct FakeSwapchainDevice {
        image_count: u64,
        fail_images: bool,
        fail_view_at: Option<u64>,
        calls: Rc<RefCell<Vec<(&'static str, u64)>>>,
    }

    impl SwapchainDevice for FakeSwapchainDevice {
        fn create_swapchain(&self, create_info: &vk::SwapchainCreateInfoKHR) -> VulkanResult<vk::SwapchainKHR> {
            self.calls
                .borrow_mut()
                .push(("create swapchain", u64::from(create_info.min_image_count)));
            Ok(vk::SwapchainKHR::from_raw(1))
        }

        fn swapchain_images(&self, _swapchain: vk::SwapchainKHR) -> VulkanResult<Vec<vk::Image>> {
            if self.fail_images {
                return Err(VulkanError::Api(vk::Result::ERROR_SURFACE_LOST_KHR));
            }
            Ok((1..=self.image_count).map(vk::Image::from_raw).collect())
        }

        fn create_image_view(&self, create_info: &vk::ImageViewCreateInfo) -> VulkanResult<vk::ImageView> {
            let image = create_info.image.as_raw();
            if self.fail_view_at == Some(image) {
                return Err(VulkanError::Api(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY));
            }
            self.calls.borrow_mut().push(("create view", image + 100));
            Ok(vk::ImageView::from_raw(image + 100))
        }

        fn destroy_image_view(&self, view: vk::ImageView) {
            self.calls.borrow_mut().push(("destroy view", view.as_raw()));
        }

        fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
            self.calls.borrow_mut().push(("destroy swapchain", swapchain.as_raw()));
        }
    }

    fn shared_settings() -> SwapchainSettings {
        SwapchainSettings::negotiate(&support(), &QueueFamilies { graphics: 0, present: 0 }, (800, 600)).unwrap()
    }

    #[test]
    fn test_one_view_per_returned_image() {
        // Driver hands back five images for a request of three.
        let ops = FakeSwapchainDevice {
            image_count: 5,
            ..Default::default()
        };
        let calls = Rc::clone(&ops.calls);

        let chain = Swapchain::create(ops, vk::SurfaceKHR::from_raw(7), shared_settings()).unwrap();

        assert_eq!(chain.settings().image_count, 3);
        assert_eq!(calls.borrow()[0], ("create swapchain", 3));
        assert_eq!(chain.images().len(), 5);
        assert_eq!(chain.image_views().len(), chain.images().len());
        for (image, view) in chain.images().iter().zip(chain.image_views()) {
            assert_eq!(view.as_raw(), image.as_raw() + 100);
        }
    }

    #[test]
    fn test_drop_releases_views_before_swapchain() {
        let ops = FakeSwapchainDevice {
            image_count: 2,
            ..Default::default()
        };
        let calls = Rc::clone(&ops.calls);

        drop(Swapchain::create(ops, vk::SurfaceKHR::from_raw(7), shared_settings()).unwrap());

        assert_eq!(
            calls.borrow()[3..],
            [("destroy view", 101), ("destroy view", 102), ("destroy swapchain", 1)]
        );
    }

    #[test]
    fn test_failed_view_releases_earlier_views_and_swapchain() {
        let ops = FakeSwapchainDevice {
            image_count: 4,
            fail_view_at: Some(3),
            ..Default::default()
        };
        let calls = Rc::clone(&ops.calls);

        let result = Swapchain::create(ops, vk::SurfaceKHR::from_raw(7), shared_settings());

        assert!(matches!(result, Err(VulkanError::Api(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY))));
        assert_eq!(
            *calls.borrow(),
            [
                ("create swapchain", 3),
                ("create view", 101),
                ("create view", 102),
                ("destroy view", 102),
                ("destroy view", 101),
                ("destroy swapchain", 1),
            ]
        );
    }

    #[test]
    fn test_failed_image_query_destroys_swapchain() {
        let ops = FakeSwapchainDevice {
            fail_images: true,
            ..Default::default()
        };
        let calls = Rc::clone(&ops.calls);

        let result = Swapchain::create(ops, vk::SurfaceKHR::from_raw(7), shared_settings());

        assert!(matches!(result, Err(VulkanError::Api(vk::Result::ERROR_SURFACE_LOST_KHR))));
        assert_eq!(*calls.borrow(), [("create swapchain", 3), ("destroy swapchain", 1)]);
    }
}
