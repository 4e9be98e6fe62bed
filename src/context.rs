use std::{collections::HashMap, fmt};

use crate::{
    data_structures::scene_graph::{ObjectId, Scene},
    overlay::EventQueue,
};

/// Identifies a declarative (markup) node owned by the outer tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkupId(u32);

impl fmt::Display for MarkupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Side table from markup nodes to the engine objects they produced.
///
/// Engine objects refer to their owning markup by [`MarkupId`] only; this
/// table is how those back-references are resolved.
#[derive(Debug, Default)]
pub struct MarkupTable {
    objects: HashMap<MarkupId, ObjectId>,
    next_id: u32,
}

impl MarkupTable {
    /// Registers a new markup node for `object`.
    pub fn bind(&mut self, object: ObjectId) -> MarkupId {
        let markup = MarkupId(self.next_id);
        self.next_id += 1;
        self.objects.insert(markup, object);
        markup
    }

    pub fn object(&self, markup: MarkupId) -> Option<ObjectId> {
        self.objects.get(&markup).copied()
    }

    /// Drops every markup bound to `object`.
    pub fn unbind_object(&mut self, object: ObjectId) {
        self.objects.retain(|_, bound| *bound != object);
    }
}

/// Runtime switches for the markup layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Emit highlight notifications for overlay tooling.
    pub overlay_enabled: bool,
    /// Log every invalid child found during validation.
    pub report_invalid_children: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overlay_enabled: true,
            report_invalid_children: true,
        }
    }
}

/// Everything descriptors operate on during a commit pass.
#[derive(Debug, Default)]
pub struct Context {
    pub scene: Scene,
    pub markups: MarkupTable,
    pub events: EventQueue,
    pub config: Config,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }
}

/// Installs `env_logger` as the `log` backend. Safe to call more than once.
pub fn init_logger() {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };
}
