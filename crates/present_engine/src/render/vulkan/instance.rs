//! Vulkan instance creation
//!
//! Owns the loader entry and the instance, enables the surface extensions the
//! window system asks for, and in debug setups the validation layer with a
//! debug messenger routed into `log`.

use std::ffi::{c_char, CStr, CString};

use ash::extensions::ext::DebugUtils;
use ash::{vk, Entry, Instance};

use super::{VulkanError, VulkanResult, Window};
use crate::core::PresentConfig;

const VALIDATION_LAYER: &CStr =
    // SAFETY: literal is nul-terminated with no interior nul
    unsafe { CStr::from_bytes_with_nul_unchecked(b"VK_LAYER_KHRONOS_validation\0") };

const ENGINE_NAME: &CStr =
    // SAFETY: literal is nul-terminated with no interior nul
    unsafe { CStr::from_bytes_with_nul_unchecked(b"No Engine\0") };

/// Vulkan instance wrapper with RAII cleanup
pub struct VulkanInstance {
    /// Vulkan entry point
    pub entry: Entry,
    /// Vulkan instance handle
    pub instance: Instance,
    /// Names of the instance extensions that were enabled
    pub enabled_extensions: Vec<CString>,
    debug: Option<(DebugUtils, vk::DebugUtilsMessengerEXT)>,
}

impl VulkanInstance {
    /// Create the instance with the extensions `window` requires
    pub fn new(window: &Window, config: &PresentConfig) -> VulkanResult<Self> {
        let entry = unsafe { Entry::load() }
            .map_err(|e| VulkanError::Loading(e.to_string()))?;

        let available_extensions = extensions_or_empty(available_extension_names(&entry));
        log::info!("{} instance extensions available:", available_extensions.len());
        for name in &available_extensions {
            log::info!("\t{}", name.to_string_lossy());
        }

        let mut enabled_extensions = window
            .required_instance_extensions()?
            .into_iter()
            .map(|name| {
                CString::new(name)
                    .map_err(|e| VulkanError::InitializationFailed(format!("Bad extension name: {e}")))
            })
            .collect::<VulkanResult<Vec<_>>>()?;

        let enable_validation =
            config.validation_enabled() && layer_found_or_disabled(validation_layer_available(&entry));
        if enable_validation {
            enabled_extensions.push(DebugUtils::name().to_owned());
        }

        let app_name = CString::new(config.application_name.as_str())
            .map_err(|e| VulkanError::InitializationFailed(format!("Bad application name: {e}")))?;
        let (major, minor, patch) = config.application_version;
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, major, minor, patch))
            .engine_name(ENGINE_NAME)
            .engine_version(vk::make_api_version(0, 1, 0, 0))
            .api_version(vk::API_VERSION_1_0);

        let extension_ptrs: Vec<*const c_char> = enabled_extensions.iter().map(|e| e.as_ptr()).collect();
        let layer_ptrs: Vec<*const c_char> = if enable_validation {
            vec![VALIDATION_LAYER.as_ptr()]
        } else {
            Vec::new()
        };

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);

        let instance = unsafe { entry.create_instance(&create_info, None)? };

        let debug = if enable_validation {
            let debug_utils = DebugUtils::new(&entry, &instance);
            match setup_debug_messenger(&debug_utils) {
                Ok(messenger) => Some((debug_utils, messenger)),
                Err(error) => {
                    unsafe { instance.destroy_instance(None) };
                    return Err(error);
                }
            }
        } else {
            None
        };

        log::info!(
            "Created Vulkan instance with {} extensions{}",
            enabled_extensions.len(),
            if enable_validation { " and validation" } else { "" }
        );

        Ok(Self {
            entry,
            instance,
            enabled_extensions,
            debug,
        })
    }

    /// Raw instance handle
    pub fn handle(&self) -> vk::Instance {
        self.instance.handle()
    }

    /// Whether the validation layer and debug messenger are active
    pub const fn validation_enabled(&self) -> bool {
        self.debug.is_some()
    }

    /// Enumerate every physical device visible to this instance
    pub fn physical_devices(&self) -> VulkanResult<Vec<vk::PhysicalDevice>> {
        Ok(unsafe { self.instance.enumerate_physical_devices()? })
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        unsafe {
            if let Some((debug_utils, messenger)) = self.debug.take() {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }

            self.instance.destroy_instance(None);
        }
        log::debug!("Destroyed Vulkan instance");
    }
}

fn available_extension_names(entry: &Entry) -> VulkanResult<Vec<CString>> {
    let properties = entry.enumerate_instance_extension_properties(None)?;

    Ok(properties
        .iter()
        .map(|p| unsafe { CStr::from_ptr(p.extension_name.as_ptr()) }.to_owned())
        .collect())
}

fn validation_layer_available(entry: &Entry) -> VulkanResult<bool> {
    let layers = entry.enumerate_instance_layer_properties()?;

    let found = layers
        .iter()
        .any(|layer| unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) } == VALIDATION_LAYER);

    if !found {
        log::warn!("Validation requested but {} is not installed", VALIDATION_LAYER.to_string_lossy());
    }

    Ok(found)
}

/// The extension listing is informational and never stops startup
fn extensions_or_empty(listing: VulkanResult<Vec<CString>>) -> Vec<CString> {
    listing.unwrap_or_else(|error| {
        log::warn!("Could not list instance extensions: {error}");
        Vec::new()
    })
}

/// A failed layer lookup disables validation instead of failing startup
fn layer_found_or_disabled(lookup: VulkanResult<bool>) -> bool {
    lookup.unwrap_or_else(|error| {
        log::warn!("Could not list instance layers, continuing without validation: {error}");
        false
    })
}

fn setup_debug_messenger(debug_utils: &DebugUtils) -> VulkanResult<vk::DebugUtilsMessengerEXT> {
    let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(debug_callback));

    Ok(unsafe { debug_utils.create_debug_utils_messenger(&create_info, None)? })
}

/// Debug callback for validation layers
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    if callback_data.is_null() || (*callback_data).p_message.is_null() {
        return vk::FALSE;
    }
    let message = CStr::from_ptr((*callback_data).p_message).to_string_lossy();

    if message_severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        log::error!("[Vulkan] {:?} - {}", message_type, message);
    } else if message_severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        log::warn!("[Vulkan] {:?} - {}", message_type, message);
    } else {
        log::debug!("[Vulkan] {:?} - {}", message_type, message);
    }

    vk::FALSE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_listing_failure_yields_empty_list() {
        let listing = Err(VulkanError::Api(vk::Result::ERROR_OUT_OF_HOST_MEMORY));
        assert!(extensions_or_empty(listing).is_empty());
    }

    #[test]
    fn test_extension_listing_passes_names_through() {
        let names = vec![CString::new("VK_KHR_surface").unwrap()];
        assert_eq!(extensions_or_empty(Ok(names.clone())), names);
    }

    #[test]
    fn test_layer_lookup_failure_disables_validation() {
        let lookup = Err(VulkanError::Api(vk::Result::ERROR_INITIALIZATION_FAILED));
        assert!(!layer_found_or_disabled(lookup));
    }

    #[test]
    fn test_layer_lookup_result_is_kept() {
        assert!(layer_found_or_disabled(Ok(true)));
        assert!(!layer_found_or_disabled(Ok(false)));
    }

    #[test]
    fn test_layer_and_engine_names() {
        assert_eq!(VALIDATION_LAYER.to_str().unwrap(), "VK_LAYER_KHRONOS_validation");
        assert_eq!(ENGINE_NAME.to_str().unwrap(), "No Engine");
    }
}
