//! Descriptors for the material family.
//!
//! All material kinds share the base properties registered by
//! [`base_properties`]. Kind-specific properties come from small mixin
//! functions (`has_color`, `has_wireframe`, ...) that each add a fixed set of
//! declarations to the registry.
//!
//! A material lives in a named slot of a mesh or points node, `"material"`
//! unless the `slot` prop says otherwise.

use log::{error, trace};

use crate::{
    context::{Context, MarkupId},
    data_structures::{
        material::{Material, MaterialKind},
        scene_graph::{EngineObject, ObjectId, UserData},
        value::{PropValue, Props, ValueType},
    },
    descriptors::{
        children::{self, ChildRef},
        registry::{PropertyDeclaration, PropertyRegistry, PropertyTarget},
        slot::{self, DEFAULT_MATERIAL_SLOT},
        unmount_base, Descriptor,
    },
    error::{DescriptorError, Result},
};

/// Update function assigning the field behind `name`.
fn assign_field(
    name: &'static str,
) -> impl Fn(&mut Material, Option<&PropValue>, bool) -> anyhow::Result<()> {
    move |material, value, _| Ok(material.assign(name, value)?)
}

pub fn base_properties(registry: &mut PropertyRegistry<Material>) {
    registry
        .register(
            PropertyDeclaration::custom("slot", ValueType::String, |material: &mut Material, slot, has_property| {
                material.user_data.material_slot = match (has_property, slot) {
                    (true, Some(slot)) => slot
                        .as_str()
                        .ok_or_else(|| DescriptorError::PropertyType {
                            name: "slot".to_string(),
                            expected: "string",
                            actual: slot.type_name(),
                        })?
                        .to_string(),
                    _ => DEFAULT_MATERIAL_SLOT.to_string(),
                };
                Ok(())
            })
            .with_default(DEFAULT_MATERIAL_SLOT)
            .update_initial(),
        )
        .register(PropertyDeclaration::simple("transparent", ValueType::Bool))
        .register(PropertyDeclaration::initial_only(
            "alphaTest",
            ValueType::Number,
            assign_field("alphaTest"),
        ))
        .register(PropertyDeclaration::custom("side", ValueType::Side, assign_field("side")).update_initial())
        .register(PropertyDeclaration::simple("opacity", ValueType::Number))
        .register(PropertyDeclaration::simple("visible", ValueType::Bool).with_default(true));
}

pub fn has_color(registry: &mut PropertyRegistry<Material>) {
    registry.register(
        PropertyDeclaration::custom("color", ValueType::Color, assign_field("color"))
            .with_default(0xffffff_u32)
            .update_initial(),
    );
}

pub fn has_wireframe(registry: &mut PropertyRegistry<Material>) {
    registry
        .register(PropertyDeclaration::simple("wireframe", ValueType::Bool).with_default(false))
        .register(PropertyDeclaration::simple("wireframeLinewidth", ValueType::Number).with_default(1.0));
}

pub fn has_emissive(registry: &mut PropertyRegistry<Material>) {
    registry.register(
        PropertyDeclaration::custom("emissive", ValueType::Color, assign_field("emissive"))
            .with_default(0x000000_u32)
            .update_initial(),
    );
}

pub fn has_specular(registry: &mut PropertyRegistry<Material>) {
    registry
        .register(
            PropertyDeclaration::custom("specular", ValueType::Color, assign_field("specular"))
                .with_default(0x111111_u32)
                .update_initial(),
        )
        .register(PropertyDeclaration::simple("shininess", ValueType::Number).with_default(30.0));
}

pub fn has_pbr(registry: &mut PropertyRegistry<Material>) {
    registry
        .register(PropertyDeclaration::simple("roughness", ValueType::Number).with_default(1.0))
        .register(PropertyDeclaration::simple("metalness", ValueType::Number).with_default(0.0));
}

pub fn has_point_size(registry: &mut PropertyRegistry<Material>) {
    registry
        .register(PropertyDeclaration::simple("size", ValueType::Number).with_default(1.0))
        .register(PropertyDeclaration::simple("sizeAttenuation", ValueType::Bool).with_default(true));
}

pub fn has_linewidth(registry: &mut PropertyRegistry<Material>) {
    registry.register(PropertyDeclaration::simple("linewidth", ValueType::Number).with_default(1.0));
}

/// Descriptor of one material kind.
#[derive(Debug, Clone)]
pub struct MaterialDescriptor {
    kind: MaterialKind,
    registry: PropertyRegistry<Material>,
}

impl MaterialDescriptor {
    pub fn new(kind: MaterialKind) -> Self {
        let mut registry = PropertyRegistry::new(kind.tag());
        base_properties(&mut registry);
        match kind {
            MaterialKind::MeshBasic => {
                has_color(&mut registry);
                has_wireframe(&mut registry);
            }
            MaterialKind::MeshLambert => {
                has_color(&mut registry);
                has_emissive(&mut registry);
                has_wireframe(&mut registry);
            }
            MaterialKind::MeshPhong => {
                has_color(&mut registry);
                has_emissive(&mut registry);
                has_specular(&mut registry);
                has_wireframe(&mut registry);
            }
            MaterialKind::MeshStandard => {
                has_color(&mut registry);
                has_emissive(&mut registry);
                has_pbr(&mut registry);
                has_wireframe(&mut registry);
            }
            MaterialKind::MeshNormal | MaterialKind::MeshDepth => has_wireframe(&mut registry),
            MaterialKind::Points => {
                has_color(&mut registry);
                has_point_size(&mut registry);
            }
            MaterialKind::LineBasic => {
                has_color(&mut registry);
                has_linewidth(&mut registry);
            }
        }
        Self { kind, registry }
    }

    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    /// For descriptors that customize a kind by overriding declarations.
    pub fn registry_mut(&mut self) -> &mut PropertyRegistry<Material> {
        &mut self.registry
    }

    /// The props a renderer needs to build a shareable material up front.
    pub fn material_description(&self, props: &Props) -> Props {
        let mut description = Props::new();
        if let Some(color) = props.get("color") {
            description.set("color", color.clone());
        }
        description
    }

    /// Constructs a material with its description already applied.
    pub fn construct_described(&self, ctx: &mut Context, props: &Props) -> Result<ObjectId> {
        let mut material = Material::new(self.kind);
        for (name, value) in self.material_description(props).iter() {
            material.assign(name, Some(value))?;
        }
        Ok(ctx.scene.add_material(material))
    }

    fn parent_object(ctx: &Context, material: &Material) -> Option<ObjectId> {
        material
            .user_data
            .parent_markup
            .and_then(|markup| ctx.markups.object(markup))
    }
}

impl Descriptor for MaterialDescriptor {
    type Object = Material;

    fn name(&self) -> &str {
        self.kind.tag()
    }

    fn registry(&self) -> &PropertyRegistry<Material> {
        &self.registry
    }

    fn construct(&self, ctx: &mut Context) -> ObjectId {
        ctx.scene.add_material(Material::new(self.kind))
    }

    fn object<'a>(&self, ctx: &'a Context, id: ObjectId) -> Result<&'a Material> {
        ctx.scene.material(id)
    }

    fn object_mut<'a>(&self, ctx: &'a mut Context, id: ObjectId) -> Result<&'a mut Material> {
        ctx.scene.material_mut(id)
    }

    fn apply_initial_props(&self, ctx: &mut Context, id: ObjectId, props: &Props) -> Result<usize> {
        let events = ctx.events.clone();
        let material = ctx.scene.material_mut(id)?;
        material.user_data = UserData {
            events: Some(events),
            ..material.user_data.clone()
        };
        self.registry.apply_initial(material, props)
    }

    fn set_parent(&self, ctx: &mut Context, id: ObjectId, parent: MarkupId) -> Result<()> {
        let parent_object = ctx
            .markups
            .object(parent)
            .ok_or(DescriptorError::UnknownMarkup(parent))?;
        let slot = ctx.scene.material(id)?.user_data.material_slot.clone();
        slot::attach(&mut ctx.scene, id, parent_object, &slot)?;
        ctx.scene.material_mut(id)?.user_data_mut().parent_markup = Some(parent);
        Ok(())
    }

    fn unmount(&self, ctx: &mut Context, id: ObjectId) -> Result<()> {
        let material = ctx.scene.material(id)?;
        let slot = material.user_data.material_slot.clone();
        if let Some(parent) = Self::parent_object(ctx, material) {
            // the slot prop may have changed since the material was attached
            let slot = ctx.scene.slot_of(parent, id).map_or(slot, str::to_string);
            slot::detach(&mut ctx.scene, id, parent, &slot)?;
        }
        ctx.scene.dispose(id)?;
        unmount_base(ctx, id)
    }

    fn add_children(&self, ctx: &mut Context, id: ObjectId, children: &[ChildRef]) -> Result<()> {
        let violations = children::validate(&ctx.scene, children);
        if violations.is_empty() {
            trace!("{} {}: accepted {} children", self.name(), id, children.len());
            return Ok(());
        }
        if ctx.config.report_invalid_children {
            for violation in &violations {
                error!(
                    "{} {}: invalid child {} at index {}",
                    self.name(),
                    id,
                    violation.kind,
                    violation.index
                );
            }
        }
        Err(DescriptorError::InvalidChildren(violations))
    }

    fn move_child(&self, _: &mut Context, _: ObjectId, _: &ChildRef, _: usize) -> Result<()> {
        Ok(())
    }

    fn remove_child(&self, _: &mut Context, _: ObjectId, _: &ChildRef) -> Result<()> {
        Ok(())
    }
}
