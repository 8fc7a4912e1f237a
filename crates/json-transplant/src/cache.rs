//! Per-type descriptor cache.
//!
//! Descriptors are immutable and depend only on the container type and the
//! factory that built them, so one entry per [`TypeId`] is populated once and
//! then shared. Lookups take a read lock only.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::descriptor::TypeDescriptor;

type Entry = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct DescriptorCache {
    entries: RwLock<HashMap<TypeId, Entry>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: 'static>(&self) -> Option<Arc<TypeDescriptor<T>>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|entry| entry.downcast::<TypeDescriptor<T>>().ok())
    }

    /// Returns the cached descriptor for `T`, building it on first use.
    ///
    /// `build` runs without the lock held. If two callers race, the first
    /// stored descriptor wins and both get it back.
    pub fn get_or_try_insert<T, E, B>(&self, build: B) -> Result<Arc<TypeDescriptor<T>>, E>
    where
        T: 'static,
        B: FnOnce() -> Result<TypeDescriptor<T>, E>,
    {
        if let Some(found) = self.get::<T>() {
            return Ok(found);
        }
        let built = Arc::new(build()?);
        let stored = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                entries
                    .entry(TypeId::of::<T>())
                    .or_insert_with(|| Arc::clone(&built) as Entry),
            )
        };
        debug!(container = built.type_name(), "cached transplant descriptor");
        Ok(stored.downcast::<TypeDescriptor<T>>().unwrap_or(built))
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl fmt::Debug for DescriptorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorCache")
            .field("len", &self.len())
            .finish()
    }
}
