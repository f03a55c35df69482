//! Partial-acquisition rollback
//!
//! Creating a batch of driver objects either yields all of them or releases
//! the ones already made before reporting the failure.

use super::VulkanResult;

/// Create one object per input, releasing the ones already made on failure
///
/// Returns either every created object in input order, or the first error
/// after `destroy` has run on each object created before it.
pub fn create_all<I, T, C, D>(inputs: &[I], mut create: C, mut destroy: D) -> VulkanResult<Vec<T>>
where
    C: FnMut(&I) -> VulkanResult<T>,
    D: FnMut(T),
{
    let mut created = Vec::with_capacity(inputs.len());

    for input in inputs {
        match create(input) {
            Ok(object) => created.push(object),
            Err(error) => {
                for object in created.drain(..).rev() {
                    destroy(object);
                }
                return Err(error);
            }
        }
    }

    Ok(created)
}
