//! Descriptors map a kind of markup node onto an engine object.
//!
//! A descriptor is shared by every instance of its kind. It constructs the
//! engine object, declares how props reach it (see [`registry`]) and handles
//! the structural edits the committer performs: parenting, children and
//! teardown.

use crate::{
    context::{Context, MarkupId},
    data_structures::{
        bounds::Aabb,
        scene_graph::{EngineObject, ObjectId},
        value::Props,
    },
    error::{DescriptorError, Result},
    overlay,
};

pub mod children;
pub mod lifecycle;
pub mod material;
pub mod registry;
pub mod slot;

use children::ChildRef;
use registry::{PropertyRegistry, PropertyTarget};

pub trait Descriptor {
    type Object: PropertyTarget + EngineObject;

    /// Markup tag handled by this descriptor.
    fn name(&self) -> &str;

    fn registry(&self) -> &PropertyRegistry<Self::Object>;

    /// Creates a fully defaulted engine object in the scene.
    fn construct(&self, ctx: &mut Context) -> ObjectId;

    fn object<'a>(&self, ctx: &'a Context, id: ObjectId) -> Result<&'a Self::Object>;

    fn object_mut<'a>(&self, ctx: &'a mut Context, id: ObjectId) -> Result<&'a mut Self::Object>;

    fn apply_initial_props(&self, ctx: &mut Context, id: ObjectId, props: &Props) -> Result<usize> {
        let object = self.object_mut(ctx, id)?;
        self.registry().apply_initial(object, props)
    }

    fn update(&self, ctx: &mut Context, id: ObjectId, prev: &Props, next: &Props) -> Result<usize> {
        let object = self.object_mut(ctx, id)?;
        self.registry().apply_update(object, prev, next)
    }

    /// Records `parent` as the markup owning `id`.
    fn set_parent(&self, ctx: &mut Context, id: ObjectId, parent: MarkupId) -> Result<()> {
        if ctx.markups.object(parent).is_none() {
            return Err(DescriptorError::UnknownMarkup(parent));
        }
        self.object_mut(ctx, id)?.user_data_mut().parent_markup = Some(parent);
        Ok(())
    }

    fn unmount(&self, ctx: &mut Context, id: ObjectId) -> Result<()> {
        unmount_base(ctx, id)
    }

    fn add_child(&self, ctx: &mut Context, id: ObjectId, child: ChildRef) -> Result<()> {
        self.add_children(ctx, id, &[child])
    }

    fn add_children(&self, ctx: &mut Context, id: ObjectId, children: &[ChildRef]) -> Result<()>;

    fn move_child(&self, ctx: &mut Context, id: ObjectId, child: &ChildRef, index: usize) -> Result<()>;

    fn remove_child(&self, ctx: &mut Context, id: ObjectId, child: &ChildRef) -> Result<()>;

    fn highlight(&self, ctx: &Context, id: ObjectId) -> Result<()> {
        overlay::highlight(ctx, id, self.object(ctx, id)?)
    }

    fn hide_highlight(&self, ctx: &Context, id: ObjectId) -> Result<()> {
        overlay::hide_highlight(ctx, id, self.object(ctx, id)?)
    }

    fn get_bounding_boxes(&self, ctx: &Context, id: ObjectId) -> Result<Vec<Aabb>> {
        overlay::bounding_boxes(ctx, id, self.object(ctx, id)?)
    }
}

/// Teardown shared by every descriptor. Runs after the descriptor's own
/// teardown: drops the object from the scene and forgets its markups.
pub fn unmount_base(ctx: &mut Context, id: ObjectId) -> Result<()> {
    ctx.scene
        .remove(id)
        .ok_or(DescriptorError::UnknownObject(id))?;
    ctx.markups.unbind_object(id);
    Ok(())
}
