//! The transplanting converter: serialize and deserialize container types.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::cache::DescriptorCache;
use crate::descriptor::{DescriptorFactory, ShapeDescriptorFactory, TypeDescriptor};
use crate::error::{token_name, TransplantError};
use crate::ordered_map::OrderedMap;
use crate::options::TransplantOptions;
use crate::remap::{JsonObject, TreeRemapper};
use crate::shape::{FieldDef, FieldValue, Transplant};

/// Converts container types to and from their flattened JSON form.
#[derive(Debug)]
pub struct TransplantConverter<F = ShapeDescriptorFactory> {
    factory: F,
    cache: Option<DescriptorCache>,
}

impl TransplantConverter {
    /// Case-insensitive names, descriptors cached per type.
    pub fn new() -> Self {
        Self::from_options(&TransplantOptions::default())
    }

    pub fn from_options(options: &TransplantOptions) -> Self {
        let converter = Self::with_factory(ShapeDescriptorFactory::new(options.comparer.comparer()));
        if options.cache_descriptors {
            converter.with_cache()
        } else {
            converter
        }
    }

    /// Uses a built-in comparer selected by name, e.g. `"Ordinal"`.
    pub fn from_comparer_name(name: &str) -> Result<Self, TransplantError> {
        Ok(Self::with_factory(ShapeDescriptorFactory::from_comparer_name(name)?))
    }
}

impl Default for TransplantConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: DescriptorFactory> TransplantConverter<F> {
    /// A converter that resolves descriptors afresh on every call.
    pub fn with_factory(factory: F) -> Self {
        Self {
            factory,
            cache: None,
        }
    }

    pub fn with_cache(mut self) -> Self {
        self.cache = Some(DescriptorCache::new());
        self
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn cache(&self) -> Option<&DescriptorCache> {
        self.cache.as_ref()
    }

    pub fn is_container_type<T: Transplant>(&self) -> bool {
        self.factory.can_convert::<T>()
    }

    pub fn resolve_descriptor<T: Transplant>(&self) -> Result<Arc<TypeDescriptor<T>>, TransplantError> {
        match &self.cache {
            Some(cache) => cache.get_or_try_insert(|| self.factory.build_descriptor::<T>()),
            None => self.factory.build_descriptor::<T>().map(Arc::new),
        }
    }

    /// Writes `value` in flattened form. `None`, or a container whose root is
    /// null, becomes JSON null.
    pub fn serialize<T: Transplant>(&self, value: Option<&T>) -> Result<Value, TransplantError> {
        let Some(value) = value else {
            return Ok(Value::Null);
        };
        let descriptor = self.resolve_descriptor::<T>()?;
        let td = &*descriptor;
        let remapper = TreeRemapper::new(td);

        let mut decomposed = OrderedMap::new(td.comparer().clone());
        for field in td.fields() {
            let encoded = field.encode(value).map_err(|source| TransplantError::Encode {
                type_name: td.type_name(),
                field: field.name(),
                source,
            })?;
            decomposed
                .try_insert(field.name(), encoded)
                .map_err(|source| TransplantError::DuplicateField {
                    type_name: td.type_name(),
                    source,
                })?;
        }

        let (rest, root_value) = remapper.split_root_value(decomposed.into_json_object())?;
        let written = remapper.merge_root_into_flattened(rest, root_value, td.type_name())?;
        debug!(
            container = td.type_name(),
            null = written.is_null(),
            "serialized transplant container"
        );
        Ok(written)
    }

    /// Reads a container from its flattened form. JSON null yields `None`.
    pub fn deserialize<T: Transplant>(&self, value: Value) -> Result<Option<T>, TransplantError> {
        let descriptor = self.resolve_descriptor::<T>()?;
        let td = &*descriptor;
        match value {
            Value::Null => Ok(None),
            Value::Object(object) => read_object(td, object).map(Some),
            other => Err(TransplantError::UnexpectedToken {
                type_name: td.type_name(),
                token: token_name(&other),
            }),
        }
    }
}

fn read_object<T>(td: &TypeDescriptor<T>, object: JsonObject) -> Result<T, TransplantError> {
    let type_name = td.type_name();
    // Every top-level name, root-bound or not, must be unique under the comparer.
    OrderedMap::from_entries(td.comparer().clone(), object.keys().map(|key| (key.as_str(), ())))
        .map_err(|source| TransplantError::DuplicateKey { type_name, source })?;
    let (siblings, root_only) = TreeRemapper::new(td).split_root_properties(object);

    let root = td.root();
    let root_value = decode_field(type_name, root, Value::Object(root_only))?;

    let mut converted = Vec::with_capacity(siblings.len());
    for (name, raw) in siblings {
        // Entries that name no declared sibling are dropped.
        if let Some((index, _, field)) = td.siblings().get_full(&name) {
            converted.push((index, field, decode_field(type_name, field, raw)?));
        }
    }

    let instance = match td.recipe() {
        None => {
            let mut instance = td.new_default()?;
            assign_field(type_name, root, &mut instance, root_value)?;
            for (_, field, value) in converted {
                assign_field(type_name, field, &mut instance, value)?;
            }
            instance
        }
        Some(recipe) => {
            let mut args = recipe.new_args();
            args.fill(recipe.root_slot(), root_value);
            for (index, _, value) in converted {
                if let Some(slot) = recipe.sibling_slot(index) {
                    args.fill(slot, value);
                }
            }
            recipe.invoke(args)?
        }
    };
    debug!(container = type_name, "deserialized transplant container");
    Ok(instance)
}

fn decode_field<T>(
    type_name: &'static str,
    field: &FieldDef<T>,
    raw: Value,
) -> Result<FieldValue, TransplantError> {
    field.decode(raw).map_err(|source| TransplantError::Decode {
        type_name,
        field: field.name(),
        source,
    })
}

fn assign_field<T>(
    type_name: &'static str,
    field: &FieldDef<T>,
    instance: &mut T,
    value: FieldValue,
) -> Result<(), TransplantError> {
    match field.assign(instance, value) {
        Some(Ok(())) => Ok(()),
        Some(Err(_)) => Err(TransplantError::ArgumentType {
            param: field.name(),
            expected: field.type_name(),
        }),
        None => Err(TransplantError::ReadOnlyField {
            type_name,
            field: field.name(),
        }),
    }
}
