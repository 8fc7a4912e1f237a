//! Pure JSON-object transformations between a container's flattened wire form
//! and its root/sibling parts.
//!
//! Every operation takes ownership of the object it works on and hands back
//! the split or merged result; key order is preserved throughout.

use serde_json::{Map, Value};
use tracing::trace;

use crate::descriptor::TypeDescriptor;
use crate::error::{token_name, TransplantError};
use crate::ordered_map::OrderedMap;

pub type JsonObject = Map<String, Value>;

pub struct TreeRemapper<'a, T> {
    descriptor: &'a TypeDescriptor<T>,
}

impl<'a, T> TreeRemapper<'a, T> {
    pub fn new(descriptor: &'a TypeDescriptor<T>) -> Self {
        Self { descriptor }
    }

    /// Partitions `flattened` into `(siblings, root_only)`.
    ///
    /// Keys naming a sibling field go left, everything else belongs to the
    /// root. Both halves keep their original relative order.
    pub fn split_root_properties(&self, flattened: JsonObject) -> (JsonObject, JsonObject) {
        let mut siblings = Map::new();
        let mut root_only = Map::new();
        for (key, value) in flattened {
            if self.descriptor.is_sibling_name(&key) {
                siblings.insert(key, value);
            } else {
                root_only.insert(key, value);
            }
        }
        trace!(
            container = self.descriptor.type_name(),
            siblings = siblings.len(),
            root_properties = root_only.len(),
            "split root properties"
        );
        (siblings, root_only)
    }

    /// Removes the single root-named property, returning `(rest, root_value)`.
    pub fn split_root_value(&self, flattened: JsonObject) -> Result<(JsonObject, Value), TransplantError> {
        let root_name = self.descriptor.root().name();
        let matching = flattened
            .keys()
            .filter(|key| self.descriptor.is_root_name(key))
            .take(2)
            .count();
        match matching {
            0 => {
                return Err(TransplantError::RootKeyMissing {
                    root: root_name.to_string(),
                })
            }
            1 => {}
            _ => {
                return Err(TransplantError::DuplicateRootKey {
                    root: root_name.to_string(),
                })
            }
        }

        let mut rest = Map::new();
        let mut root_value = Value::Null;
        for (key, value) in flattened {
            if self.descriptor.is_root_name(&key) {
                root_value = value;
            } else {
                rest.insert(key, value);
            }
        }
        Ok((rest, root_value))
    }

    /// Moves the root's own properties to the front of `rest`.
    ///
    /// A null root collapses the whole container to null. A root that is not
    /// an object, or whose property names clash with a remaining key, fails.
    pub fn merge_root_into_flattened(
        &self,
        rest: JsonObject,
        root_value: Value,
        container: &'static str,
    ) -> Result<Value, TransplantError> {
        let root = match root_value {
            Value::Null => return Ok(Value::Null),
            Value::Object(root) => root,
            other => {
                return Err(TransplantError::UnexpectedRootShape {
                    type_name: container,
                    token: token_name(&other),
                })
            }
        };

        // Names clash under the descriptor's comparer, so `Other1` on the
        // root collides with an `OTHER1` sibling when case is ignored.
        let mut names = OrderedMap::new(self.descriptor.comparer().clone());
        for key in root.keys() {
            // Case variants inside the root belong to the root type.
            let _ = names.try_insert(key.as_str(), ());
        }

        let mut merged = root;
        for (key, value) in rest {
            if let Err(source) = names.try_insert(key.as_str(), ()) {
                return Err(TransplantError::Collision {
                    key,
                    type_name: container,
                    source,
                });
            }
            merged.insert(key, value);
        }
        trace!(container, properties = merged.len(), "merged root into flattened form");
        Ok(Value::Object(merged))
    }
}
