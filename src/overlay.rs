//! Highlight overlays for external UI tooling.
//!
//! Inspectors and dev tools ask a descriptor to highlight the object behind a
//! markup node. The descriptor resolves the renderable that owns the object
//! (through the back-reference in [`UserData`](crate::data_structures::scene_graph::UserData))
//! and emits an [`OverlayEvent`] on the object's [`EventQueue`]. The tooling
//! drains the queue at its own pace.
//!
//! Bounding boxes are not computed when the event is emitted. The event
//! carries a [`BoundingBoxQuery`] that the consumer resolves against the scene
//! only if it actually draws the overlay.

use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use log::{debug, trace};
use uuid::Uuid;

use crate::{
    context::Context,
    data_structures::{
        bounds::Aabb,
        scene_graph::{EngineObject, ObjectId, Scene},
    },
    error::{DescriptorError, Result},
};

/// A notification for overlay tooling.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    Highlight {
        uuid: Uuid,
        bounding_boxes: BoundingBoxQuery,
    },
    HideHighlight,
}

impl OverlayEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OverlayEvent::Highlight { .. } => "highlight",
            OverlayEvent::HideHighlight => "hideHighlight",
        }
    }
}

/// Deferred bounding box computation for the renderable owning a highlighted object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBoxQuery {
    owner: ObjectId,
}

impl BoundingBoxQuery {
    pub fn new(owner: ObjectId) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    /// Computes the world-space box around the owner's whole subtree.
    pub fn resolve(&self, scene: &Scene) -> Result<Vec<Aabb>> {
        Ok(vec![scene.bounding_box(self.owner)?])
    }
}

/// Shared, single-threaded queue of overlay events.
///
/// Clones share the same queue, so every object carries a handle to the
/// context's queue in its user data.
#[derive(Clone, Default)]
pub struct EventQueue {
    events: Rc<RefCell<VecDeque<OverlayEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: OverlayEvent) {
        trace!("emitting {}", event.name());
        self.events.borrow_mut().push_back(event);
    }

    /// Drain all pending events, oldest first.
    pub fn take_events(&self) -> Vec<OverlayEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Whether both handles feed the same queue.
    pub fn same_queue(&self, other: &EventQueue) -> bool {
        Rc::ptr_eq(&self.events, &other.events)
    }
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.len())
            .finish()
    }
}

/// The renderable that owns `object`, found through its parent markup.
pub fn owner_of(ctx: &Context, id: ObjectId, object: &dyn EngineObject) -> Result<ObjectId> {
    let markup = object
        .user_data()
        .parent_markup
        .ok_or(DescriptorError::Detached(id))?;
    ctx.markups
        .object(markup)
        .ok_or(DescriptorError::UnknownMarkup(markup))
}

pub fn highlight(ctx: &Context, id: ObjectId, object: &dyn EngineObject) -> Result<()> {
    if !ctx.config.overlay_enabled {
        trace!("overlay disabled, not highlighting {}", id);
        return Ok(());
    }
    let owner = owner_of(ctx, id, object)?;
    let Some(events) = &object.user_data().events else {
        debug!("{} has no event queue, highlight dropped", id);
        return Ok(());
    };
    events.emit(OverlayEvent::Highlight {
        uuid: object.uuid(),
        bounding_boxes: BoundingBoxQuery::new(owner),
    });
    Ok(())
}

pub fn hide_highlight(ctx: &Context, id: ObjectId, object: &dyn EngineObject) -> Result<()> {
    if !ctx.config.overlay_enabled {
        trace!("overlay disabled, not hiding highlight of {}", id);
        return Ok(());
    }
    let Some(events) = &object.user_data().events else {
        debug!("{} has no event queue, hide highlight dropped", id);
        return Ok(());
    };
    events.emit(OverlayEvent::HideHighlight);
    Ok(())
}

pub fn bounding_boxes(ctx: &Context, id: ObjectId, object: &dyn EngineObject) -> Result<Vec<Aabb>> {
    let owner = owner_of(ctx, id, object)?;
    BoundingBoxQuery::new(owner).resolve(&ctx.scene)
}
