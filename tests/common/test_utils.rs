use std::{collections::HashMap, rc::Rc};

use flow_markup::{
    context::{Config, Context, MarkupId},
    data_structures::{
        material::{Material, MaterialKind},
        scene_graph::{Geometry, ObjectId},
        value::{PropValue, Props},
    },
    descriptors::{
        lifecycle::LifecycleController, material::MaterialDescriptor, registry::PropertyTarget,
    },
};

pub(crate) fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Property target that records every assignment and custom update call.
#[derive(Default)]
pub(crate) struct Probe {
    pub fields: HashMap<String, Option<PropValue>>,
    pub assignments: Vec<String>,
    pub calls: Vec<(String, Option<PropValue>, bool)>,
}

impl Probe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update function that logs its invocation on the probe.
    pub fn record(
        name: &'static str,
    ) -> impl Fn(&mut Probe, Option<&PropValue>, bool) -> anyhow::Result<()> {
        move |probe, value, has_property| {
            probe
                .calls
                .push((name.to_string(), value.cloned(), has_property));
            Ok(())
        }
    }

    pub fn calls_to(&self, name: &str) -> usize {
        self.calls.iter().filter(|(n, _, _)| n == name).count()
    }

    pub fn assignments_to(&self, name: &str) -> usize {
        self.assignments.iter().filter(|n| *n == name).count()
    }

    pub fn field(&self, name: &str) -> Option<&Option<PropValue>> {
        self.fields.get(name)
    }
}

impl PropertyTarget for Probe {
    fn assign(&mut self, name: &str, value: Option<&PropValue>) -> flow_markup::Result<()> {
        self.assignments.push(name.to_string());
        self.fields.insert(name.to_string(), value.cloned());
        Ok(())
    }
}

/// Stands in for the tree committer: a context with one mesh whose markup
/// materials get mounted on.
pub(crate) struct Harness {
    pub ctx: Context,
    pub mesh: ObjectId,
    pub mesh_markup: MarkupId,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        init_test_logger();
        let mut ctx = Context::with_config(config);
        let mesh = ctx.scene.add_mesh(Geometry::cuboid(2.0, 2.0, 2.0));
        let mesh_markup = ctx.markups.bind(mesh);
        Self {
            ctx,
            mesh,
            mesh_markup,
        }
    }

    /// Constructs, applies `props` and parents the material on the mesh.
    pub fn mount(
        &mut self,
        descriptor: &Rc<MaterialDescriptor>,
        props: &Props,
    ) -> flow_markup::Result<LifecycleController<MaterialDescriptor>> {
        let parent = self.mesh_markup;
        self.mount_on(descriptor, props, parent)
    }

    pub fn mount_on(
        &mut self,
        descriptor: &Rc<MaterialDescriptor>,
        props: &Props,
        parent: MarkupId,
    ) -> flow_markup::Result<LifecycleController<MaterialDescriptor>> {
        let mut controller = LifecycleController::new(Rc::clone(descriptor));
        controller.construct(&mut self.ctx)?;
        controller.apply_initial_props(&mut self.ctx, props)?;
        controller.set_parent(&mut self.ctx, parent)?;
        Ok(controller)
    }

    pub fn material(&self, id: ObjectId) -> &Material {
        self.ctx.scene.material(id).expect("material should be in the scene")
    }

    pub fn slot(&self, slot: &str) -> Option<ObjectId> {
        self.ctx.scene.slot_occupant(self.mesh, slot)
    }
}

pub(crate) fn descriptor(kind: MaterialKind) -> Rc<MaterialDescriptor> {
    Rc::new(MaterialDescriptor::new(kind))
}
