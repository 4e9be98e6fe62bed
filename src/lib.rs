//! flow-markup
//!
//! Declarative markup for flow-ngin scene graphs. A markup node describes an
//! engine object through props; its descriptor constructs the object, applies
//! the declared props at mount, re-applies only the props that changed on
//! every re-render and tears the object down again on unmount. Materials are
//! linked into named, single-occupancy slots of their mesh or points parent.
//!
//! High-level modules
//! - `context`: scene, markup table, overlay queue and runtime configuration
//! - `data_structures`: scene graph, materials, textures, bounds and prop values
//! - `descriptors`: the descriptor trait, property registry, lifecycle, slots
//!   and the material family
//! - `error`: the error type every descriptor operation returns
//! - `overlay`: highlight notifications for inspector tooling
//! - `resources`: references to shared assets
//!

pub mod context;
pub mod data_structures;
pub mod descriptors;
pub mod error;
pub mod overlay;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Deg, Point3, Quaternion, Rotation3, Vector3};
pub use error::{DescriptorError, Result};
