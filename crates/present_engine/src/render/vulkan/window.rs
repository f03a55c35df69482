//! Window management using GLFW
//!
//! Provides the native window the presentation surface is bound to.

use ash::vk;
use thiserror::Error;

use crate::core::WindowConfig;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW could not be initialised
    #[error("GLFW initialization failed")]
    InitializationFailed,

    /// GLFW found no Vulkan loader or ICD
    #[error("GLFW reports Vulkan is not supported")]
    VulkanUnsupported,

    /// GLFW returned no window
    #[error("Window creation failed")]
    CreationFailed,

    /// Other GLFW failure
    #[error("GLFW error: {0}")]
    GlfwError(String),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// GLFW window wrapper
///
/// Dropping it destroys the window first and then releases the GLFW handle,
/// which terminates the library once no other handle is alive.
pub struct Window {
    // Field order is drop order: the window must go before GLFW terminates.
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    glfw: glfw::Glfw,
    title: String,
}

impl Window {
    /// Create a non-resizable window with no client API attached
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::log_errors).map_err(|_| WindowError::InitializationFailed)?;

        if !glfw.vulkan_supported() {
            return Err(WindowError::VulkanUnsupported);
        }

        // Configure for Vulkan (no OpenGL context)
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        // The swapchain is never rebuilt, so the surface size must stay fixed
        glfw.window_hint(glfw::WindowHint::Resizable(false));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed)?;

        window.set_key_polling(true);
        window.set_close_polling(true);

        log::info!("Created window '{}' ({}x{})", config.title, config.width, config.height);

        Ok(Self {
            window,
            events,
            glfw,
            title: config.title.clone(),
        })
    }

    /// Whether the user asked to close the window
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Process pending events without blocking
    ///
    /// Escape closes the window; every other event is ignored.
    pub fn poll_events(&mut self) {
        self.glfw.poll_events();

        let mut close_requested = false;
        for (_, event) in glfw::flush_messages(&self.events) {
            log::trace!("{:?}", event);
            if let glfw::WindowEvent::Key(glfw::Key::Escape, _, glfw::Action::Press, _) = event {
                close_requested = true;
            }
        }

        if close_requested {
            self.window.set_should_close(true);
        }
    }

    /// Framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (
            u32::try_from(width).unwrap_or(0),
            u32::try_from(height).unwrap_or(0),
        )
    }

    /// Instance extensions the platform surface needs
    pub fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        self.glfw
            .get_required_instance_extensions()
            .ok_or_else(|| WindowError::GlfwError("Failed to get required extensions".to_string()))
    }

    /// Create a raw Vulkan surface for this window
    ///
    /// The caller owns the returned handle and must destroy it before the
    /// instance and before this window.
    pub fn create_surface_handle(&self, instance: vk::Instance) -> Result<vk::SurfaceKHR, vk::Result> {
        let mut surface = vk::SurfaceKHR::null();
        let result = self.window.create_window_surface(instance, std::ptr::null(), &mut surface);

        if result == vk::Result::SUCCESS {
            Ok(surface)
        } else {
            Err(result)
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        log::debug!("Destroying window '{}'", self.title);
    }
}
