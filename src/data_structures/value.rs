//! Declarative property values.
//!
//! [`Props`] is what a markup node hands to its descriptor on every render.
//! Presence is explicit: a prop that is missing from the map is different
//! from one that is set, which lets custom updates tell "removed" apart from
//! "set back to the default".

use std::collections::HashMap;

use crate::data_structures::material::{Color, Side};

/// The type a declared property expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Number,
    String,
    /// A [`Color`] or a `0xRRGGBB` number.
    Color,
    /// A [`Side`] or its numeric constant (0, 1, 2).
    Side,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Color => "color",
            ValueType::Side => "side",
        }
    }
}

/// A single prop value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    String(String),
    Color(Color),
    Side(Side),
}

impl PropValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropValue::Bool(_) => "bool",
            PropValue::Number(_) => "number",
            PropValue::String(_) => "string",
            PropValue::Color(_) => "color",
            PropValue::Side(_) => "side",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            PropValue::Number(n) => Some(*n as f32),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            PropValue::Color(c) => Some(*c),
            PropValue::Number(n) if n.is_finite() && *n >= 0.0 && *n <= f64::from(0xffffff_u32) => {
                Some(Color::from_hex(*n as u32))
            }
            _ => None,
        }
    }

    pub fn as_side(&self) -> Option<Side> {
        match self {
            PropValue::Side(s) => Some(*s),
            PropValue::Number(n) if n.fract() == 0.0 => Side::from_constant(*n as i64),
            _ => None,
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<f32> for PropValue {
    fn from(value: f32) -> Self {
        PropValue::Number(f64::from(value))
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(f64::from(value))
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        PropValue::Number(f64::from(value))
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(value)
    }
}

impl From<Color> for PropValue {
    fn from(value: Color) -> Self {
        PropValue::Color(value)
    }
}

impl From<Side> for PropValue {
    fn from(value: Side) -> Self {
        PropValue::Side(value)
    }
}

/// The props of one markup node at one render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    values: HashMap<String, PropValue>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        self.values.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
