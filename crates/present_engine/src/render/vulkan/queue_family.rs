//! Queue family resolution
//!
//! Finds a graphics-capable family and a present-capable family on a device.
//! The two roles are resolved independently and may land on the same family.

use ash::vk;

use super::DeviceQuery;

/// Queue roles resolved for a device, each possibly missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    /// First family with graphics support
    pub graphics_family: Option<u32>,
    /// First family able to present to the surface
    pub present_family: Option<u32>,
}

/// Queue roles of a device on which both were found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilies {
    /// Index of the graphics queue family
    pub graphics: u32,
    /// Index of the presentation queue family
    pub present: u32,
}

impl QueueFamilyIndices {
    /// Scan `device`'s queue families in ascending index order
    ///
    /// Each role takes the first family satisfying it. Scanning stops once
    /// both roles are assigned. A failed present-support query counts as
    /// "cannot present" for that family.
    pub fn resolve<P: DeviceQuery>(queries: &P, device: vk::PhysicalDevice) -> Self {
        let mut indices = Self::default();

        for (index, family) in (0u32..).zip(queries.queue_families(device)) {
            if indices.graphics_family.is_none() && family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
                indices.graphics_family = Some(index);
            }

            if indices.present_family.is_none() {
                match queries.supports_present(device, index) {
                    Ok(true) => indices.present_family = Some(index),
                    Ok(false) => {}
                    Err(error) => log::warn!("Present support query failed for family {index}: {error}"),
                }
            }

            if indices.is_complete() {
                break;
            }
        }

        indices
    }

    /// Both roles are assigned
    pub const fn is_complete(&self) -> bool {
        self.graphics_family.is_some() && self.present_family.is_some()
    }

    /// The resolved roles, if both were found
    pub const fn complete(&self) -> Option<QueueFamilies> {
        match (self.graphics_family, self.present_family) {
            (Some(graphics), Some(present)) => Some(QueueFamilies { graphics, present }),
            _ => None,
        }
    }
}

impl QueueFamilies {
    /// Graphics and present roles share one family
    pub const fn is_shared(&self) -> bool {
        self.graphics == self.present
    }

    /// Distinct family indices, graphics first
    pub fn unique(&self) -> Vec<u32> {
        if self.is_shared() {
            vec![self.graphics]
        } else {
            vec![self.graphics, self.present]
        }
    }
}
