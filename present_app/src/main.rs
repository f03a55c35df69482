//! Opens a window, negotiates a Vulkan device and swapchain for it, then idles
//! on window events until the window is closed.
//!
//! Exit status is 0 on a normal close. On an initialization failure it is the
//! driver's `VkResult`, or -1 when no driver result applies.

use present_engine::foundation::logging;
use present_engine::prelude::*;
use present_engine::render::vulkan::GENERIC_FAILURE_CODE;
use thiserror::Error;

/// Top-level failure of the application
#[derive(Error, Debug)]
enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Vulkan(#[from] VulkanError),
}

impl AppError {
    const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => GENERIC_FAILURE_CODE,
            Self::Vulkan(error) => error.exit_code(),
        }
    }
}

impl From<WindowError> for AppError {
    fn from(error: WindowError) -> Self {
        Self::Vulkan(VulkanError::Window(error))
    }
}

fn run(config: &PresentConfig) -> Result<(), AppError> {
    config.validate()?;

    let mut window = Window::new(&config.window)?;
    let context = PresentContext::new(&window, config)?;

    log::info!(
        "Ready: {} swapchain images at {}x{}",
        context.swapchain().images().len(),
        context.swapchain().extent().width,
        context.swapchain().extent().height
    );

    while !window.should_close() {
        window.poll_events();
    }

    log::info!("Window closed");
    Ok(())
}

fn main() {
    logging::init();

    let config = PresentConfig::default();

    // Everything acquired in `run` is released before the process exits.
    if let Err(error) = run(&config) {
        log::error!("{error}");
        println!("{error}");
        std::process::exit(error.exit_code());
    }
}
