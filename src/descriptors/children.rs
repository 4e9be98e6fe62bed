//! Which children a material accepts.
//!
//! Materials take textures and resource references as children. Both are
//! annotations for the material's own descriptors; nothing gets linked into
//! the scene graph when they are added.

use crate::{
    data_structures::scene_graph::{ObjectId, ObjectKind, Scene},
    resources::ResourceReference,
};

/// A child handed over by the committer.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildRef {
    Object(ObjectId),
    Resource(ResourceReference),
}

impl From<ObjectId> for ChildRef {
    fn from(id: ObjectId) -> Self {
        ChildRef::Object(id)
    }
}

impl From<ResourceReference> for ChildRef {
    fn from(reference: ResourceReference) -> Self {
        ChildRef::Resource(reference)
    }
}

/// A rejected child and where it was in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub index: usize,
    pub kind: String,
}

/// Every child that is neither a texture nor a resource reference.
pub fn validate(scene: &Scene, children: &[ChildRef]) -> Vec<Violation> {
    children
        .iter()
        .enumerate()
        .filter_map(|(index, child)| {
            let kind = match child {
                ChildRef::Resource(_) => return None,
                ChildRef::Object(id) => match scene.kind(*id) {
                    Ok(ObjectKind::Texture) => return None,
                    Ok(kind) => kind.to_string(),
                    Err(_) => format!("unknown object {}", id),
                },
            };
            Some(Violation { index, kind })
        })
        .collect()
}
