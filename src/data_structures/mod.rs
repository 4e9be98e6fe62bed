//! Engine data structures: scene graph, materials, textures and prop values.
//!
//! - `scene_graph` owns every engine object and the node hierarchy
//! - `material` is the mutable material object descriptors keep in sync
//! - `texture` holds the CPU-side textures that appear as material children
//! - `transform` is the local transform of a node
//! - `bounds` provides axis-aligned bounding boxes
//! - `value` defines declarative prop values and prop sets

pub mod bounds;
pub mod material;
pub mod scene_graph;
pub mod texture;
pub mod transform;
pub mod value;
