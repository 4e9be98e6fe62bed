//! Engine-side materials.
//!
//! A [`Material`] is the mutable object that material descriptors construct
//! and keep in sync with their markup. One struct covers every
//! [`MaterialKind`]; fields a kind doesn't use keep their engine defaults and
//! are simply not declared by that kind's descriptor.

use uuid::Uuid;

use crate::{
    data_structures::{
        scene_graph::{EngineObject, UserData},
        value::PropValue,
    },
    descriptors::registry::PropertyTarget,
    error::{DescriptorError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    MeshBasic,
    MeshLambert,
    MeshPhong,
    MeshStandard,
    MeshNormal,
    MeshDepth,
    Points,
    LineBasic,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 8] = [
        MaterialKind::MeshBasic,
        MaterialKind::MeshLambert,
        MaterialKind::MeshPhong,
        MaterialKind::MeshStandard,
        MaterialKind::MeshNormal,
        MaterialKind::MeshDepth,
        MaterialKind::Points,
        MaterialKind::LineBasic,
    ];

    /// The markup tag of this kind.
    pub fn tag(self) -> &'static str {
        match self {
            MaterialKind::MeshBasic => "meshBasicMaterial",
            MaterialKind::MeshLambert => "meshLambertMaterial",
            MaterialKind::MeshPhong => "meshPhongMaterial",
            MaterialKind::MeshStandard => "meshStandardMaterial",
            MaterialKind::MeshNormal => "meshNormalMaterial",
            MaterialKind::MeshDepth => "meshDepthMaterial",
            MaterialKind::Points => "pointsMaterial",
            MaterialKind::LineBasic => "lineBasicMaterial",
        }
    }
}

/// Which faces get rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

impl Side {
    /// Maps the numeric side constants used in markup (0, 1, 2).
    pub fn from_constant(constant: i64) -> Option<Side> {
        match constant {
            0 => Some(Side::Front),
            1 => Some(Side::Back),
            2 => Some(Side::Double),
            _ => None,
        }
    }

    pub fn constant(self) -> u32 {
        match self {
            Side::Front => 0,
            Side::Back => 1,
            Side::Double => 2,
        }
    }
}

/// Linear RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: u32) -> Self {
        let mut color = Color::BLACK;
        color.set_hex(hex);
        color
    }

    pub fn set_hex(&mut self, hex: u32) {
        self.r = ((hex >> 16) & 0xff) as f32 / 255.0;
        self.g = ((hex >> 8) & 0xff) as f32 / 255.0;
        self.b = (hex & 0xff) as f32 / 255.0;
    }

    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// A material as the engine sees it.
#[derive(Debug, Clone)]
pub struct Material {
    pub uuid: Uuid,
    pub kind: MaterialKind,
    pub transparent: bool,
    pub opacity: f32,
    pub visible: bool,
    pub alpha_test: f32,
    pub side: Side,
    pub color: Color,
    pub emissive: Color,
    pub specular: Color,
    pub shininess: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub wireframe: bool,
    pub wireframe_linewidth: f32,
    pub size: f32,
    pub size_attenuation: bool,
    pub linewidth: f32,
    /// Bumped on every field assignment so the renderer knows to re-upload.
    pub version: u32,
    pub user_data: UserData,
    disposed: bool,
}

impl Material {
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            kind,
            transparent: false,
            opacity: 1.0,
            visible: true,
            alpha_test: 0.0,
            side: Side::Front,
            color: Color::WHITE,
            emissive: Color::BLACK,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            roughness: 1.0,
            metalness: 0.0,
            wireframe: false,
            wireframe_linewidth: 1.0,
            size: 1.0,
            size_attenuation: true,
            linewidth: 1.0,
            version: 0,
            user_data: UserData::default(),
            disposed: false,
        }
    }

    pub fn needs_update(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Packs the uniform block the shaders read.
    pub fn to_raw(&self) -> MaterialRaw {
        MaterialRaw {
            color: self.color.to_rgba(self.opacity),
            emissive: self.emissive.to_rgba(1.0),
            specular: self.specular.to_rgba(self.shininess),
            params: [self.alpha_test, self.roughness, self.metalness, self.size],
            flags: [
                u32::from(self.transparent),
                u32::from(self.wireframe),
                self.side.constant(),
                u32::from(self.visible),
            ],
        }
    }

    /// Restores one field to the value a freshly constructed material has.
    fn reset_field(&mut self, name: &str) -> Result<()> {
        let defaults = Material::new(self.kind);
        match name {
            "transparent" => self.transparent = defaults.transparent,
            "opacity" => self.opacity = defaults.opacity,
            "visible" => self.visible = defaults.visible,
            "alphaTest" => self.alpha_test = defaults.alpha_test,
            "side" => self.side = defaults.side,
            "color" => self.color = defaults.color,
            "emissive" => self.emissive = defaults.emissive,
            "specular" => self.specular = defaults.specular,
            "shininess" => self.shininess = defaults.shininess,
            "roughness" => self.roughness = defaults.roughness,
            "metalness" => self.metalness = defaults.metalness,
            "wireframe" => self.wireframe = defaults.wireframe,
            "wireframeLinewidth" => self.wireframe_linewidth = defaults.wireframe_linewidth,
            "size" => self.size = defaults.size,
            "sizeAttenuation" => self.size_attenuation = defaults.size_attenuation,
            "linewidth" => self.linewidth = defaults.linewidth,
            _ => return Err(self.unknown_field(name)),
        }
        Ok(())
    }

    fn unknown_field(&self, name: &str) -> DescriptorError {
        DescriptorError::MissingDeclaration {
            descriptor: self.kind.tag().to_string(),
            name: name.to_string(),
        }
    }
}

impl PropertyTarget for Material {
    fn assign(&mut self, name: &str, value: Option<&PropValue>) -> Result<()> {
        let Some(value) = value else {
            self.reset_field(name)?;
            self.needs_update();
            return Ok(());
        };
        let mismatch = |expected: &'static str| DescriptorError::PropertyType {
            name: name.to_string(),
            expected,
            actual: value.type_name(),
        };
        let bool_value = || value.as_bool().ok_or_else(|| mismatch("bool"));
        let number = || value.as_f32().ok_or_else(|| mismatch("number"));
        let color = || value.as_color().ok_or_else(|| mismatch("color"));

        match name {
            "transparent" => self.transparent = bool_value()?,
            "opacity" => self.opacity = number()?,
            "visible" => self.visible = bool_value()?,
            "alphaTest" => self.alpha_test = number()?,
            "side" => self.side = value.as_side().ok_or_else(|| mismatch("side"))?,
            "color" => self.color = color()?,
            "emissive" => self.emissive = color()?,
            "specular" => self.specular = color()?,
            "shininess" => self.shininess = number()?,
            "roughness" => self.roughness = number()?,
            "metalness" => self.metalness = number()?,
            "wireframe" => self.wireframe = bool_value()?,
            "wireframeLinewidth" => self.wireframe_linewidth = number()?,
            "size" => self.size = number()?,
            "sizeAttenuation" => self.size_attenuation = bool_value()?,
            "linewidth" => self.linewidth = number()?,
            _ => return Err(self.unknown_field(name)),
        }
        self.needs_update();
        Ok(())
    }
}

impl EngineObject for Material {
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

/**
 * The raw material is the uniform block stored on the GPU.
 *
 * `specular.w` carries the shininess; `params` is alpha test, roughness,
 * metalness and point size; `flags` is transparent, wireframe, side and visible.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialRaw {
    pub color: [f32; 4],
    pub emissive: [f32; 4],
    pub specular: [f32; 4],
    pub params: [f32; 4],
    pub flags: [u32; 4],
}
