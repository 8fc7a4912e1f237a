//! Static shape descriptions supplied by container types.
//!
//! A container implements [`Transplant`] and returns a [`Shape`]: which type
//! it is, whether it takes part in transplanting, its fields (one of them
//! marked as the root), its constructors (at most one of them designated) and
//! how to build a default instance. Field values cross the descriptor layer
//! type-erased as [`FieldValue`]; typed conversion is delegated to serde.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::TransplantError;

/// A type that can describe its own transplant shape.
pub trait Transplant: Sized + 'static {
    fn shape() -> Shape<Self>;
}

// ── FieldValue ────────────────────────────────────────────────────────────

/// A converted field value of the field's declared type.
pub struct FieldValue {
    type_name: &'static str,
    value: Box<dyn Any + Send>,
}

impl FieldValue {
    pub fn new<F: Any + Send>(value: F) -> Self {
        Self {
            type_name: type_name::<F>(),
            value: Box::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<F: Any>(&self) -> bool {
        self.value.is::<F>()
    }

    /// Recovers the typed value; gives `self` back on a type mismatch.
    pub fn downcast<F: Any>(self) -> Result<F, Self> {
        let type_name = self.type_name;
        match self.value.downcast::<F>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self { type_name, value }),
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

type EncodeFn<T> = Arc<dyn Fn(&T) -> Result<Value, serde_json::Error> + Send + Sync>;
type DecodeFn = Arc<dyn Fn(Value) -> Result<FieldValue, serde_json::Error> + Send + Sync>;
type AssignFn<T> = Arc<dyn Fn(&mut T, FieldValue) -> Result<(), FieldValue> + Send + Sync>;
type BuildFn<T> = Arc<dyn Fn(ConstructionArgs) -> Result<T, TransplantError> + Send + Sync>;
pub(crate) type DefaultFn<T> = Arc<dyn Fn() -> T + Send + Sync>;

// ── FieldDef ──────────────────────────────────────────────────────────────

/// One declared field of a container: name, declared type and accessors.
pub struct FieldDef<T> {
    name: &'static str,
    type_id: TypeId,
    type_name: &'static str,
    root: bool,
    encode: EncodeFn<T>,
    decode: DecodeFn,
    assign: Option<AssignFn<T>>,
}

impl<T: 'static> FieldDef<T> {
    /// A field with a getter and a setter.
    pub fn new<F, G, S>(name: &'static str, get: G, set: S) -> Self
    where
        F: Serialize + DeserializeOwned + Send + 'static,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        S: Fn(&mut T, F) + Send + Sync + 'static,
    {
        let mut field = Self::read_only(name, get);
        field.assign = Some(Arc::new(move |target: &mut T, value: FieldValue| {
            set(target, value.downcast::<F>()?);
            Ok(())
        }));
        field
    }

    /// A field that can only be populated through a constructor.
    pub fn read_only<F, G>(name: &'static str, get: G) -> Self
    where
        F: Serialize + DeserializeOwned + Send + 'static,
        G: Fn(&T) -> &F + Send + Sync + 'static,
    {
        Self {
            name,
            type_id: TypeId::of::<F>(),
            type_name: type_name::<F>(),
            root: false,
            encode: Arc::new(move |target: &T| serde_json::to_value(get(target))),
            decode: Arc::new(|value: Value| serde_json::from_value::<F>(value).map(FieldValue::new)),
            assign: None,
        }
    }

    /// Marks this field as the transplant root.
    pub fn root(mut self) -> Self {
        self.root = true;
        self
    }
}

impl<T> FieldDef<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_is<F: Any>(&self) -> bool {
        self.type_id == TypeId::of::<F>()
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    pub fn is_assignable(&self) -> bool {
        self.assign.is_some()
    }

    pub(crate) fn encode(&self, target: &T) -> Result<Value, serde_json::Error> {
        (self.encode)(target)
    }

    pub(crate) fn decode(&self, value: Value) -> Result<FieldValue, serde_json::Error> {
        (self.decode)(value)
    }

    /// `None` when the field has no setter.
    pub(crate) fn assign(&self, target: &mut T, value: FieldValue) -> Option<Result<(), FieldValue>> {
        self.assign.as_ref().map(|assign| assign(target, value))
    }
}

impl<T> Clone for FieldDef<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            type_id: self.type_id,
            type_name: self.type_name,
            root: self.root,
            encode: Arc::clone(&self.encode),
            decode: Arc::clone(&self.decode),
            assign: self.assign.clone(),
        }
    }
}

impl<T> fmt::Debug for FieldDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("root", &self.root)
            .field("assignable", &self.assign.is_some())
            .finish()
    }
}

// ── Constructors ──────────────────────────────────────────────────────────

/// A named, typed constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDef {
    pub name: &'static str,
    pub type_id: TypeId,
    pub type_name: &'static str,
}

impl ParamDef {
    pub fn of<F: Any>(name: &'static str) -> Self {
        Self {
            name,
            type_id: TypeId::of::<F>(),
            type_name: type_name::<F>(),
        }
    }
}

/// A constructor that builds the container from positional arguments.
pub struct ConstructorDef<T> {
    params: Vec<ParamDef>,
    designated: bool,
    build: BuildFn<T>,
}

impl<T> ConstructorDef<T> {
    pub fn new<B>(build: B) -> Self
    where
        B: Fn(ConstructionArgs) -> Result<T, TransplantError> + Send + Sync + 'static,
    {
        Self {
            params: Vec::new(),
            designated: false,
            build: Arc::new(build),
        }
    }

    /// Appends a parameter of declared type `F`.
    pub fn param<F: Any>(mut self, name: &'static str) -> Self {
        self.params.push(ParamDef::of::<F>(name));
        self
    }

    /// Marks this constructor as the one used when reading JSON.
    pub fn designated(mut self) -> Self {
        self.designated = true;
        self
    }

    pub fn params(&self) -> &[ParamDef] {
        &self.params
    }

    pub fn is_designated(&self) -> bool {
        self.designated
    }

    pub fn invoke(&self, args: ConstructionArgs) -> Result<T, TransplantError> {
        (self.build)(args)
    }
}

impl<T> Clone for ConstructorDef<T> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            designated: self.designated,
            build: Arc::clone(&self.build),
        }
    }
}

impl<T> fmt::Debug for ConstructorDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDef")
            .field("params", &self.params)
            .field("designated", &self.designated)
            .finish()
    }
}

/// Positional argument vector handed to a constructor.
///
/// Slots that no field filled read as the parameter type's default.
#[derive(Debug)]
pub struct ConstructionArgs {
    names: Vec<&'static str>,
    slots: Vec<Option<FieldValue>>,
}

impl ConstructionArgs {
    pub fn new(params: &[ParamDef]) -> Self {
        Self {
            names: params.iter().map(|p| p.name).collect(),
            slots: params.iter().map(|_| None).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_filled(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// Places a value in a slot, replacing anything already there.
    pub fn fill(&mut self, index: usize, value: FieldValue) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(value);
        }
    }

    /// Takes the value in slot `index`; `None` when nothing filled it.
    pub fn take<F: Any>(&mut self, index: usize) -> Result<Option<F>, TransplantError> {
        let param = self.names.get(index).copied().unwrap_or("<out of range>");
        match self.slots.get_mut(index).and_then(Option::take) {
            None => Ok(None),
            Some(value) => value
                .downcast::<F>()
                .map(Some)
                .map_err(|_| TransplantError::ArgumentType {
                    param,
                    expected: type_name::<F>(),
                }),
        }
    }

    pub fn take_or_default<F: Any + Default>(&mut self, index: usize) -> Result<F, TransplantError> {
        Ok(self.take::<F>(index)?.unwrap_or_default())
    }
}

// ── Shape ─────────────────────────────────────────────────────────────────

/// Everything a container type declares about itself.
pub struct Shape<T> {
    pub(crate) type_name: &'static str,
    pub(crate) container: bool,
    pub(crate) fields: Vec<FieldDef<T>>,
    pub(crate) constructors: Vec<ConstructorDef<T>>,
    pub(crate) default: Option<DefaultFn<T>>,
}

impl<T: 'static> Shape<T> {
    /// Shape of a type marked as a transplant container.
    pub fn container(type_name: &'static str) -> Self {
        Self {
            type_name,
            container: true,
            fields: Vec::new(),
            constructors: Vec::new(),
            default: None,
        }
    }

    /// Shape of a type that is not marked as a container.
    pub fn plain(type_name: &'static str) -> Self {
        Self {
            container: false,
            ..Self::container(type_name)
        }
    }

    /// Declares the next field; declaration order is wire order.
    pub fn field(mut self, field: FieldDef<T>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn constructor(mut self, constructor: ConstructorDef<T>) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn default_with<D>(mut self, factory: D) -> Self
    where
        D: Fn() -> T + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(factory));
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_container(&self) -> bool {
        self.container
    }

    pub fn fields(&self) -> &[FieldDef<T>] {
        &self.fields
    }

    pub fn constructors(&self) -> &[ConstructorDef<T>] {
        &self.constructors
    }
}

impl<T: Default + 'static> Shape<T> {
    /// Uses `T::default()` to build instances on the assignment path.
    pub fn with_default(self) -> Self {
        self.default_with(T::default)
    }
}
