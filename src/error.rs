//! Error types returned by descriptor operations.
//!
//! Structural violations (wrong parent kind, slot collision, invalid child
//! kind) signal a bug in the declarative tree. The committer driving the
//! descriptors is expected to abort the current commit when it sees one;
//! nothing in this crate retries or recovers from them.

use crate::{
    context::MarkupId,
    data_structures::scene_graph::{ObjectId, ObjectKind},
    descriptors::{children::Violation, lifecycle::LifecycleState},
};

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("parent {parent} is a {kind}, but only mesh or points objects have material slots")]
    WrongParentKind { parent: ObjectId, kind: ObjectKind },

    #[error("parent {parent} already has a `{slot}` defined ({occupant})")]
    SlotOccupied {
        parent: ObjectId,
        slot: String,
        occupant: ObjectId,
    },

    #[error("material children can only be textures or resource references, found {}", describe(.0))]
    InvalidChildren(Vec<Violation>),

    #[error("`{descriptor}` declares no property named `{name}`")]
    MissingDeclaration { descriptor: String, name: String },

    #[error("property `{name}` expects {expected}, got {actual}")]
    PropertyType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("cannot {operation} an element that is {state}")]
    Lifecycle {
        operation: &'static str,
        state: LifecycleState,
    },

    #[error("no object {0} in the scene")]
    UnknownObject(ObjectId),

    #[error("no object is bound to markup {0}")]
    UnknownMarkup(MarkupId),

    #[error("object {id} is a {actual}, expected a {expected}")]
    ObjectKind {
        id: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    #[error("linking {child} under {parent} would create a cycle")]
    Cycle { parent: ObjectId, child: ObjectId },

    #[error("object {0} is not attached to a parent markup")]
    Detached(ObjectId),

    #[error("updating property `{name}` failed")]
    Update {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DescriptorError {
    /// Whether this error reports a broken tree structure rather than a bad
    /// value or lookup.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::WrongParentKind { .. }
                | Self::SlotOccupied { .. }
                | Self::InvalidChildren(_)
                | Self::Cycle { .. }
        )
    }
}

fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} at index {}", v.kind, v.index))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T, E = DescriptorError> = std::result::Result<T, E>;
