//! Scene graph and engine object storage.
//!
//! The [`Scene`] owns every engine object (nodes, materials, textures) and
//! hands out [`ObjectId`]s. Nodes form the hierarchy; mesh and points nodes
//! additionally expose named material slots through [`SlotHost`]. Materials
//! and textures never own their parents: they point back to the markup that
//! owns them via [`UserData::parent_markup`], which is resolved through the
//! context's markup table.

use std::{collections::BTreeMap, collections::HashMap, fmt};

use cgmath::Point3;
use log::warn;
use uuid::Uuid;

use crate::{
    context::MarkupId,
    data_structures::{bounds::Aabb, material::Material, texture::Texture, transform::Transform},
    descriptors::slot::DEFAULT_MATERIAL_SLOT,
    error::{DescriptorError, Result},
    overlay::EventQueue,
};

/// Key of an object stored in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Group,
    Mesh,
    Points,
    Material,
    Texture,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectKind::Group => "group",
            ObjectKind::Mesh => "mesh",
            ObjectKind::Points => "points",
            ObjectKind::Material => "material",
            ObjectKind::Texture => "texture",
        })
    }
}

/// Bookkeeping the markup layer keeps on an engine object.
#[derive(Debug, Clone)]
pub struct UserData {
    /// Slot on the parent this object was declared for.
    pub material_slot: String,
    /// Markup of the owning parent. Lookup only, never ownership.
    pub parent_markup: Option<MarkupId>,
    /// Where overlay notifications for this object go.
    pub events: Option<EventQueue>,
}

impl Default for UserData {
    fn default() -> Self {
        Self {
            material_slot: DEFAULT_MATERIAL_SLOT.to_string(),
            parent_markup: None,
            events: None,
        }
    }
}

/// Capabilities every engine object managed by a descriptor provides.
pub trait EngineObject {
    fn uuid(&self) -> Uuid;

    fn user_data(&self) -> &UserData;

    fn user_data_mut(&mut self) -> &mut UserData;

    /// Marks engine-level resources for release.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// A parent with named, single-occupancy attachment points.
pub trait SlotHost {
    fn slot(&self, name: &str) -> Option<ObjectId>;

    fn set_slot(&mut self, name: &str, object: ObjectId);

    fn clear_slot(&mut self, name: &str) -> Option<ObjectId>;
}

/// Vertex positions of a node, in node-local space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Point3<f32>>,
}

impl Geometry {
    pub fn new(positions: Vec<Point3<f32>>) -> Self {
        Self { positions }
    }

    /// The eight corners of a box centered on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
        let mut positions = Vec::with_capacity(8);
        for sx in [-x, x] {
            for sy in [-y, y] {
                for sz in [-z, z] {
                    positions.push(Point3::new(sx, sy, sz));
                }
            }
        }
        Self { positions }
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.positions)
    }
}

/// A node in the hierarchy: a group, a mesh or a point cloud.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub uuid: Uuid,
    kind: ObjectKind,
    pub local: Transform,
    pub geometry: Geometry,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    slots: BTreeMap<String, ObjectId>,
}

impl SceneNode {
    fn new(kind: ObjectKind, geometry: Geometry) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            kind,
            local: Transform::new(),
            geometry,
            parent: None,
            children: Vec::new(),
            slots: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    fn has_slots(&self) -> bool {
        matches!(self.kind, ObjectKind::Mesh | ObjectKind::Points)
    }
}

impl SlotHost for SceneNode {
    fn slot(&self, name: &str) -> Option<ObjectId> {
        self.slots.get(name).copied()
    }

    fn set_slot(&mut self, name: &str, object: ObjectId) {
        self.slots.insert(name.to_string(), object);
    }

    fn clear_slot(&mut self, name: &str) -> Option<ObjectId> {
        self.slots.remove(name)
    }
}

#[derive(Clone, Debug)]
pub enum SceneObject {
    Node(SceneNode),
    Material(Material),
    Texture(Texture),
}

impl SceneObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            SceneObject::Node(node) => node.kind,
            SceneObject::Material(_) => ObjectKind::Material,
            SceneObject::Texture(_) => ObjectKind::Texture,
        }
    }

    pub fn as_engine_object_mut(&mut self) -> Option<&mut dyn EngineObject> {
        match self {
            SceneObject::Node(_) => None,
            SceneObject::Material(material) => Some(material as &mut dyn EngineObject),
            SceneObject::Texture(texture) => Some(texture as &mut dyn EngineObject),
        }
    }
}

/// Owner of all engine objects.
#[derive(Debug, Default)]
pub struct Scene {
    objects: HashMap<ObjectId, SceneObject>,
    next_id: u32,
    released: Vec<Uuid>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        id
    }

    pub fn add_group(&mut self) -> ObjectId {
        self.insert(SceneObject::Node(SceneNode::new(ObjectKind::Group, Geometry::default())))
    }

    pub fn add_mesh(&mut self, geometry: Geometry) -> ObjectId {
        self.insert(SceneObject::Node(SceneNode::new(ObjectKind::Mesh, geometry)))
    }

    pub fn add_points(&mut self, geometry: Geometry) -> ObjectId {
        self.insert(SceneObject::Node(SceneNode::new(ObjectKind::Points, geometry)))
    }

    pub fn add_material(&mut self, material: Material) -> ObjectId {
        self.insert(SceneObject::Material(material))
    }

    pub fn add_texture(&mut self, texture: Texture) -> ObjectId {
        self.insert(SceneObject::Texture(texture))
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn kind(&self, id: ObjectId) -> Result<ObjectKind> {
        self.get(id)
            .map(SceneObject::kind)
            .ok_or(DescriptorError::UnknownObject(id))
    }

    pub fn node(&self, id: ObjectId) -> Result<&SceneNode> {
        match self.get(id) {
            Some(SceneObject::Node(node)) => Ok(node),
            Some(other) => Err(kind_mismatch(id, ObjectKind::Group, other.kind())),
            None => Err(DescriptorError::UnknownObject(id)),
        }
    }

    pub fn node_mut(&mut self, id: ObjectId) -> Result<&mut SceneNode> {
        match self.get_mut(id) {
            Some(SceneObject::Node(node)) => Ok(node),
            Some(other) => Err(kind_mismatch(id, ObjectKind::Group, other.kind())),
            None => Err(DescriptorError::UnknownObject(id)),
        }
    }

    pub fn material(&self, id: ObjectId) -> Result<&Material> {
        match self.get(id) {
            Some(SceneObject::Material(material)) => Ok(material),
            Some(other) => Err(kind_mismatch(id, ObjectKind::Material, other.kind())),
            None => Err(DescriptorError::UnknownObject(id)),
        }
    }

    pub fn material_mut(&mut self, id: ObjectId) -> Result<&mut Material> {
        match self.get_mut(id) {
            Some(SceneObject::Material(material)) => Ok(material),
            Some(other) => Err(kind_mismatch(id, ObjectKind::Material, other.kind())),
            None => Err(DescriptorError::UnknownObject(id)),
        }
    }

    pub fn texture(&self, id: ObjectId) -> Result<&Texture> {
        match self.get(id) {
            Some(SceneObject::Texture(texture)) => Ok(texture),
            Some(other) => Err(kind_mismatch(id, ObjectKind::Texture, other.kind())),
            None => Err(DescriptorError::UnknownObject(id)),
        }
    }

    /// The slot host behind `id`, or a structural error if `id` is not a
    /// mesh or points node.
    pub fn slot_host_mut(&mut self, id: ObjectId) -> Result<&mut dyn SlotHost> {
        let kind = self.kind(id)?;
        match self.get_mut(id) {
            Some(SceneObject::Node(node)) if matches!(kind, ObjectKind::Mesh | ObjectKind::Points) => {
                Ok(node as &mut dyn SlotHost)
            }
            _ => Err(DescriptorError::WrongParentKind { parent: id, kind }),
        }
    }

    /// Current occupant of `slot` on `host`, if `host` has slots at all.
    pub fn slot_occupant(&self, host: ObjectId, slot: &str) -> Option<ObjectId> {
        match self.get(host) {
            Some(SceneObject::Node(node)) if node.has_slots() => node.slot(slot),
            _ => None,
        }
    }

    /// Name of the slot on `host` that holds `object`.
    pub fn slot_of(&self, host: ObjectId, object: ObjectId) -> Option<&str> {
        match self.get(host) {
            Some(SceneObject::Node(node)) if node.has_slots() => node
                .slots
                .iter()
                .find(|(_, occupant)| **occupant == object)
                .map(|(name, _)| name.as_str()),
            _ => None,
        }
    }

    /// Links `child` under `parent` in the hierarchy, unlinking it from its
    /// previous parent first. Linking a node under itself or one of its
    /// descendants fails with [`DescriptorError::Cycle`] and leaves the
    /// hierarchy untouched.
    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<()> {
        self.node(child)?;
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(DescriptorError::Cycle { parent, child });
            }
            ancestor = self.node(id)?.parent;
        }
        let previous = self.node(child)?.parent;
        if let Some(previous) = previous {
            self.node_mut(previous)?.children.retain(|c| *c != child);
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Removes an object. Nodes are unlinked from their parent and their
    /// children become roots.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let object = self.objects.remove(&id)?;
        if let SceneObject::Node(node) = &object {
            if let Some(Ok(parent)) = node.parent.map(|p| self.node_mut(p)) {
                parent.children.retain(|c| *c != id);
            }
            for child in &node.children {
                if let Ok(child) = self.node_mut(*child) {
                    child.parent = None;
                }
            }
        }
        Some(object)
    }

    /// Disposes the engine resources of `id` and queues them for release by
    /// the renderer. Disposing twice is logged and otherwise ignored.
    pub fn dispose(&mut self, id: ObjectId) -> Result<()> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or(DescriptorError::UnknownObject(id))?;
        let kind = object.kind();
        let engine_object = object.as_engine_object_mut().ok_or(DescriptorError::ObjectKind {
            id,
            expected: ObjectKind::Material,
            actual: kind,
        })?;
        if engine_object.is_disposed() {
            warn!("{} {} was already disposed, ignoring", kind, id);
            return Ok(());
        }
        engine_object.dispose();
        let uuid = engine_object.uuid();
        self.released.push(uuid);
        Ok(())
    }

    /// Resources disposed since the last call, in disposal order.
    pub fn drain_released(&mut self) -> Vec<Uuid> {
        std::mem::take(&mut self.released)
    }

    /// World transform of a node: the product of all parent transforms, root first.
    pub fn world_transform(&self, id: ObjectId) -> Result<Transform> {
        let mut chain = vec![self.node(id)?.local];
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            let node = self.node(parent)?;
            chain.push(node.local);
            current = node.parent;
        }
        Ok(chain
            .iter()
            .rev()
            .fold(Transform::new(), |world, local| &world * local))
    }

    /// World-space box enclosing the geometry of `id` and all its descendants.
    pub fn bounding_box(&self, id: ObjectId) -> Result<Aabb> {
        let mut aabb = Aabb::empty();
        let mut stack = vec![(id, self.world_transform(id)?)];
        while let Some((current, world)) = stack.pop() {
            let node = self.node(current)?;
            let matrix = world.to_matrix();
            for position in &node.geometry.positions {
                aabb.expand_by_point(cgmath::Transform::transform_point(&matrix, *position));
            }
            for child in &node.children {
                let local = self.node(*child)?.local;
                stack.push((*child, &world * &local));
            }
        }
        Ok(aabb)
    }
}

fn kind_mismatch(id: ObjectId, expected: ObjectKind, actual: ObjectKind) -> DescriptorError {
    DescriptorError::ObjectKind {
        id,
        expected,
        actual,
    }
}
