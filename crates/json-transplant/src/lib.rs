//! Transplanting JSON converter.
//!
//! A container type marks exactly one of its fields as the root. On the
//! wire, the root's properties are lifted into the container's own object
//! and the container's other fields follow them as siblings:
//!
//! ```text
//! Container { rewt: { RootA, RootB }, Other1, Other2 }
//!   <->  { "RootA": .., "RootB": .., "Other1": .., "Other2": .. }
//! ```
//!
//! Reading reverses it: keys naming a sibling field go to that field, every
//! other key is handed to the root. Name matching goes through a
//! [`NameComparer`], case-insensitive unless configured otherwise.
//!
//! Types describe themselves through [`Transplant::shape`]; resolved
//! [`TypeDescriptor`]s are cached per type by default.

pub mod cache;
pub mod comparer;
pub mod converter;
pub mod descriptor;
pub mod error;
pub mod options;
pub mod ordered_map;
pub mod remap;
pub mod serde_impl;
pub mod shape;

use std::sync::Arc;

use serde_json::Value;

pub use cache::DescriptorCache;
pub use comparer::{default_comparer, ComparerKind, NameComparer, Ordinal, OrdinalIgnoreCase, SharedComparer};
pub use converter::TransplantConverter;
pub use descriptor::{DescriptorFactory, ParamBinding, Recipe, ShapeDescriptorFactory, TypeDescriptor};
pub use error::{ErrorKind, TransplantError};
pub use options::TransplantOptions;
pub use ordered_map::{DuplicateKeyError, OrderedMap};
pub use remap::{JsonObject, TreeRemapper};
pub use serde_impl::default_converter;
pub use shape::{ConstructionArgs, ConstructorDef, FieldDef, FieldValue, ParamDef, Shape, Transplant};

#[doc(hidden)]
pub mod __private {
    pub use serde;
}

/// Serializes with the process-wide default converter.
pub fn serialize<T: Transplant>(value: Option<&T>) -> Result<Value, TransplantError> {
    default_converter().serialize(value)
}

/// Deserializes with the process-wide default converter.
pub fn deserialize<T: Transplant>(value: Value) -> Result<Option<T>, TransplantError> {
    default_converter().deserialize(value)
}

/// Whether `T` is marked as a transplant container.
pub fn is_container_type<T: Transplant>() -> bool {
    default_converter().is_container_type::<T>()
}

/// Resolves (or fetches the cached) descriptor for `T` on the default
/// converter.
pub fn resolve_descriptor<T: Transplant>() -> Result<Arc<TypeDescriptor<T>>, TransplantError> {
    default_converter().resolve_descriptor::<T>()
}
