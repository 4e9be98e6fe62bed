//! Declared properties and how they reach the engine object.
//!
//! Every descriptor builds one [`PropertyRegistry`] when it is created. Each
//! entry says how a prop is applied: by plain field assignment
//! ([`UpdateStrategy::Simple`]), through a function that may touch several
//! fields ([`UpdateStrategy::Custom`]), or once at mount only
//! ([`UpdateStrategy::InitialOnly`]).
//!
//! Registration order is application order. A `slot` declaration must, for
//! example, run before anything that looks at the slot, so the registry keeps
//! entries in the order they were first registered, even when a later
//! registration overrides one.

use std::{collections::HashMap, fmt, rc::Rc};

use log::{debug, trace};

use crate::{
    data_structures::value::{PropValue, Props, ValueType},
    error::{DescriptorError, Result},
};

/// Something whose fields can be assigned by property name.
///
/// `None` means the prop is absent and has no default; implementors restore
/// the field to the value a freshly constructed object has.
pub trait PropertyTarget {
    fn assign(&mut self, name: &str, value: Option<&PropValue>) -> Result<()>;
}

/// Update function: `(target, value, has_property)`.
///
/// `value` is the prop, or the declared default when the prop is absent.
/// `has_property` tells the two apart.
pub type UpdateFn<T> = Rc<dyn Fn(&mut T, Option<&PropValue>, bool) -> anyhow::Result<()>>;

pub enum UpdateStrategy<T> {
    Simple,
    Custom(UpdateFn<T>),
    InitialOnly(UpdateFn<T>),
}

impl<T> Clone for UpdateStrategy<T> {
    fn clone(&self) -> Self {
        match self {
            UpdateStrategy::Simple => UpdateStrategy::Simple,
            UpdateStrategy::Custom(f) => UpdateStrategy::Custom(Rc::clone(f)),
            UpdateStrategy::InitialOnly(f) => UpdateStrategy::InitialOnly(Rc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for UpdateStrategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpdateStrategy::Simple => "Simple",
            UpdateStrategy::Custom(_) => "Custom",
            UpdateStrategy::InitialOnly(_) => "InitialOnly",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initial,
    Update,
}

pub struct PropertyDeclaration<T> {
    name: String,
    value_type: ValueType,
    default: Option<PropValue>,
    strategy: UpdateStrategy<T>,
    update_initial: bool,
}

impl<T> PropertyDeclaration<T> {
    fn new(name: impl Into<String>, value_type: ValueType, strategy: UpdateStrategy<T>) -> Self {
        Self {
            name: name.into(),
            value_type,
            default: None,
            strategy,
            update_initial: false,
        }
    }

    /// A property assigned straight to the field of the same name.
    pub fn simple(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, value_type, UpdateStrategy::Simple)
    }

    /// A property applied through `update` whenever its value changes.
    pub fn custom<F>(name: impl Into<String>, value_type: ValueType, update: F) -> Self
    where
        F: Fn(&mut T, Option<&PropValue>, bool) -> anyhow::Result<()> + 'static,
    {
        Self::new(name, value_type, UpdateStrategy::Custom(Rc::new(update)))
    }

    /// A property applied through `update` at mount and never again.
    pub fn initial_only<F>(name: impl Into<String>, value_type: ValueType, update: F) -> Self
    where
        F: Fn(&mut T, Option<&PropValue>, bool) -> anyhow::Result<()> + 'static,
    {
        Self::new(name, value_type, UpdateStrategy::InitialOnly(Rc::new(update)))
    }

    pub fn with_default(mut self, default: impl Into<PropValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Also run a custom update at mount.
    pub fn update_initial(mut self) -> Self {
        self.update_initial = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn default_value(&self) -> Option<&PropValue> {
        self.default.as_ref()
    }

    pub fn strategy(&self) -> &UpdateStrategy<T> {
        &self.strategy
    }

    pub fn applies_on_initial(&self) -> bool {
        self.update_initial
            || matches!(
                self.strategy,
                UpdateStrategy::Simple | UpdateStrategy::InitialOnly(_)
            )
    }

    pub fn applies_on_update(&self) -> bool {
        matches!(self.strategy, UpdateStrategy::Simple | UpdateStrategy::Custom(_))
    }

    /// Applies this declaration to `target` for `props`.
    ///
    /// Returns whether anything was assigned or invoked. At mount nothing
    /// happens when there is neither a prop nor a default.
    pub fn apply(&self, target: &mut T, props: &Props, phase: Phase) -> Result<bool>
    where
        T: PropertyTarget,
    {
        let has_property = props.contains(&self.name);
        let value = props.get(&self.name).or(self.default.as_ref());

        match (&self.strategy, phase) {
            (UpdateStrategy::Simple, Phase::Initial) => {
                let Some(value) = value else {
                    return Ok(false);
                };
                target.assign(&self.name, Some(value))?;
            }
            (UpdateStrategy::Simple, Phase::Update) => target.assign(&self.name, value)?,
            (UpdateStrategy::Custom(update) | UpdateStrategy::InitialOnly(update), Phase::Initial) => {
                if value.is_none() {
                    return Ok(false);
                }
                self.invoke(update, target, value, has_property)?;
            }
            (UpdateStrategy::Custom(update), Phase::Update) => {
                self.invoke(update, target, value, has_property)?
            }
            (UpdateStrategy::InitialOnly(_), Phase::Update) => return Ok(false),
        }
        Ok(true)
    }

    fn invoke(
        &self,
        update: &UpdateFn<T>,
        target: &mut T,
        value: Option<&PropValue>,
        has_property: bool,
    ) -> Result<()> {
        update(target, value, has_property).map_err(|err| match err.downcast::<DescriptorError>() {
            Ok(err) => err,
            Err(source) => DescriptorError::Update {
                name: self.name.clone(),
                source,
            },
        })
    }
}

impl<T> Clone for PropertyDeclaration<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            value_type: self.value_type,
            default: self.default.clone(),
            strategy: self.strategy.clone(),
            update_initial: self.update_initial,
        }
    }
}

impl<T> fmt::Debug for PropertyDeclaration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDeclaration")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("default", &self.default)
            .field("strategy", &self.strategy)
            .field("update_initial", &self.update_initial)
            .finish()
    }
}

/// Ordered table of the properties one descriptor declares.
pub struct PropertyRegistry<T> {
    owner: String,
    declarations: Vec<PropertyDeclaration<T>>,
    index: HashMap<String, usize>,
}

impl<T> PropertyRegistry<T> {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            declarations: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Adds `declaration`, or replaces the entry with the same name in place.
    pub fn register(&mut self, declaration: PropertyDeclaration<T>) -> &mut Self {
        match self.index.get(declaration.name()) {
            Some(&position) => {
                debug!(
                    "{}: overriding property `{}` ({:?} -> {:?})",
                    self.owner,
                    declaration.name(),
                    self.declarations[position].strategy(),
                    declaration.strategy()
                );
                self.declarations[position] = declaration;
            }
            None => {
                self.index
                    .insert(declaration.name().to_string(), self.declarations.len());
                self.declarations.push(declaration);
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDeclaration<T>> {
        self.index.get(name).map(|&position| &self.declarations[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declared names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(PropertyDeclaration::name)
    }

    pub fn entries_for_initial(&self) -> impl Iterator<Item = &PropertyDeclaration<T>> {
        self.declarations.iter().filter(|d| d.applies_on_initial())
    }

    pub fn entries_for_update(&self) -> impl Iterator<Item = &PropertyDeclaration<T>> {
        self.declarations.iter().filter(|d| d.applies_on_update())
    }
}

impl<T: PropertyTarget> PropertyRegistry<T> {
    /// Applies every mount-time declaration. Returns how many were applied.
    ///
    /// Stops at the first failure; properties applied before it stay applied.
    pub fn apply_initial(&self, target: &mut T, props: &Props) -> Result<usize> {
        let mut applied = 0;
        for declaration in self.entries_for_initial() {
            if declaration.apply(target, props, Phase::Initial)? {
                trace!("{}: applied `{}` at mount", self.owner, declaration.name());
                applied += 1;
            } else {
                trace!("{}: `{}` has no value, left at engine default", self.owner, declaration.name());
            }
        }
        Ok(applied)
    }

    /// Re-applies the declarations whose prop changed between `prev` and
    /// `next`, in value or in presence. Returns how many were re-applied.
    pub fn apply_update(&self, target: &mut T, prev: &Props, next: &Props) -> Result<usize> {
        let mut applied = 0;
        for declaration in self.entries_for_update() {
            let name = declaration.name();
            if prev.get(name) == next.get(name) {
                trace!("{}: `{}` unchanged, skipping", self.owner, name);
                continue;
            }
            if declaration.apply(target, next, Phase::Update)? {
                trace!("{}: updated `{}`", self.owner, name);
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Applies a single declared property by name.
    pub fn apply_property(&self, target: &mut T, name: &str, props: &Props, phase: Phase) -> Result<bool> {
        let declaration = self.get(name).ok_or_else(|| DescriptorError::MissingDeclaration {
            descriptor: self.owner.clone(),
            name: name.to_string(),
        })?;
        declaration.apply(target, props, phase)
    }
}

impl<T> Clone for PropertyRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner.clone(),
            declarations: self.declarations.clone(),
            index: self.index.clone(),
        }
    }
}

impl<T> fmt::Debug for PropertyRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("owner", &self.owner)
            .field("declarations", &self.declarations)
            .finish()
    }
}
