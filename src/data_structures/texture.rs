//! CPU-side textures.
//!
//! Textures appear in markup as children of a material. The material only
//! validates them; the texture's own descriptor decides which material map it
//! fills.

use uuid::Uuid;

use crate::data_structures::scene_graph::{EngineObject, UserData};

/// A texture known to the scene: a label, a source and its pixel size.
#[derive(Clone, Debug)]
pub struct Texture {
    pub uuid: Uuid,
    pub label: String,
    pub source: String,
    pub size: [u32; 2],
    pub user_data: UserData,
    disposed: bool,
}

impl Texture {
    pub fn new(label: impl Into<String>, source: impl Into<String>, size: [u32; 2]) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            label: label.into(),
            source: source.into(),
            size: [size[0].max(1), size[1].max(1)],
            user_data: UserData::default(),
            disposed: false,
        }
    }
}

impl EngineObject for Texture {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn user_data(&self) -> &UserData {
        &self.user_data
    }

    fn user_data_mut(&mut self) -> &mut UserData {
        &mut self.user_data
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
