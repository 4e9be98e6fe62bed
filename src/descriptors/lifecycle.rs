//! Per-instance lifecycle: construct, mount, update, unmount.
//!
//! A [`LifecycleController`] wraps one engine object and the descriptor that
//! manages it, and refuses calls that arrive out of order. Each instance goes
//! through
//!
//! ```text
//! Unconstructed -> Constructed -> Mounted -> Updating(n) -> Unmounted
//! ```
//!
//! and `Unmounted` is terminal.

use std::{fmt, rc::Rc};

use crate::{
    context::{Context, MarkupId},
    data_structures::{scene_graph::ObjectId, value::Props},
    descriptors::Descriptor,
    error::{DescriptorError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unconstructed,
    Constructed,
    Mounted,
    /// Mounted and updated `n` times.
    Updating(usize),
    Unmounted,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Unconstructed => f.write_str("unconstructed"),
            LifecycleState::Constructed => f.write_str("constructed"),
            LifecycleState::Mounted => f.write_str("mounted"),
            LifecycleState::Updating(n) => write!(f, "mounted and updated {} times", n),
            LifecycleState::Unmounted => f.write_str("unmounted"),
        }
    }
}

pub struct LifecycleController<D: Descriptor> {
    descriptor: Rc<D>,
    object: Option<ObjectId>,
    state: LifecycleState,
}

impl<D: Descriptor> fmt::Debug for LifecycleController<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleController")
            .field("object", &self.object)
            .field("state", &self.state)
            .finish()
    }
}

impl<D: Descriptor> LifecycleController<D> {
    pub fn new(descriptor: Rc<D>) -> Self {
        Self {
            descriptor,
            object: None,
            state: LifecycleState::Unconstructed,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The managed object, once constructed.
    pub fn object(&self) -> Option<ObjectId> {
        self.object
    }

    pub fn descriptor(&self) -> &Rc<D> {
        &self.descriptor
    }

    pub fn construct(&mut self, ctx: &mut Context) -> Result<ObjectId> {
        if self.state != LifecycleState::Unconstructed {
            return Err(self.out_of_order("construct"));
        }
        let id = self.descriptor.construct(ctx);
        self.object = Some(id);
        self.state = LifecycleState::Constructed;
        Ok(id)
    }

    pub fn apply_initial_props(&mut self, ctx: &mut Context, props: &Props) -> Result<usize> {
        let id = match (self.state, self.object) {
            (LifecycleState::Constructed, Some(id)) => id,
            _ => return Err(self.out_of_order("apply initial props to")),
        };
        let applied = self.descriptor.apply_initial_props(ctx, id, props)?;
        self.state = LifecycleState::Mounted;
        Ok(applied)
    }

    /// Links the object to the markup that owns it. The slot is only known
    /// once the initial props are applied.
    pub fn set_parent(&mut self, ctx: &mut Context, parent: MarkupId) -> Result<()> {
        let id = match (self.state, self.object) {
            (LifecycleState::Mounted | LifecycleState::Updating(_), Some(id)) => id,
            _ => return Err(self.out_of_order("set the parent of")),
        };
        self.descriptor.set_parent(ctx, id, parent)
    }

    pub fn update(&mut self, ctx: &mut Context, prev: &Props, next: &Props) -> Result<usize> {
        let (id, updates) = match (self.state, self.object) {
            (LifecycleState::Mounted, Some(id)) => (id, 0),
            (LifecycleState::Updating(n), Some(id)) => (id, n),
            _ => return Err(self.out_of_order("update")),
        };
        let applied = self.descriptor.update(ctx, id, prev, next)?;
        self.state = LifecycleState::Updating(updates + 1);
        Ok(applied)
    }

    /// Tears the object down. The controller is unmounted afterwards even if
    /// the descriptor's teardown fails, so teardown never runs twice.
    pub fn unmount(&mut self, ctx: &mut Context) -> Result<()> {
        let id = self.live_object("unmount")?;
        self.state = LifecycleState::Unmounted;
        self.descriptor.unmount(ctx, id)
    }

    fn live_object(&self, operation: &'static str) -> Result<ObjectId> {
        match (self.state, self.object) {
            (
                LifecycleState::Constructed | LifecycleState::Mounted | LifecycleState::Updating(_),
                Some(id),
            ) => Ok(id),
            _ => Err(self.out_of_order(operation)),
        }
    }

    fn out_of_order(&self, operation: &'static str) -> DescriptorError {
        DescriptorError::Lifecycle {
            operation,
            state: self.state,
        }
    }
}
