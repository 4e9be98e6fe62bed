//! Named, single-occupancy attachment points on mesh and points nodes.

use log::debug;

use crate::{
    data_structures::scene_graph::{ObjectId, Scene},
    error::{DescriptorError, Result},
};

/// Slot a material goes to when its markup names none.
pub const DEFAULT_MATERIAL_SLOT: &str = "material";

/// Puts `object` into `slot` on `parent`.
///
/// Fails if `parent` has no slots or if the slot is already taken; an
/// occupied slot is never overwritten.
pub fn attach(scene: &mut Scene, object: ObjectId, parent: ObjectId, slot: &str) -> Result<()> {
    let host = scene.slot_host_mut(parent)?;
    if let Some(occupant) = host.slot(slot) {
        return Err(DescriptorError::SlotOccupied {
            parent,
            slot: slot.to_string(),
            occupant,
        });
    }
    host.set_slot(slot, object);
    debug!("attached {} to slot `{}` of {}", object, slot, parent);
    Ok(())
}

/// Clears `slot` on `parent` if it still holds exactly `object`.
///
/// Returns whether the slot was cleared. A slot taken over by a newer attach,
/// or a parent without slots, is left alone.
pub fn detach(scene: &mut Scene, object: ObjectId, parent: ObjectId, slot: &str) -> Result<bool> {
    if scene.slot_occupant(parent, slot) != Some(object) {
        debug!("{} no longer occupies slot `{}` of {}, leaving it", object, slot, parent);
        return Ok(false);
    }
    scene.slot_host_mut(parent)?.clear_slot(slot);
    debug!("detached {} from slot `{}` of {}", object, slot, parent);
    Ok(true)
}
