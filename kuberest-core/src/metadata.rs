//! Per-type field metadata and the provider contract that supplies it.
//!
//! Models are not deserialized through reflection; instead every mappable type
//! has an ordered table of [`FieldDescriptor`]s (hand-written or generated)
//! describing where each field comes from in the raw data and how to interpret
//! it. The [`ModelMapper`](crate::mapper::ModelMapper) walks these tables.
use std::{collections::HashMap, fmt, sync::Arc};

use parking_lot::RwLock;

use crate::{gvk::GroupVersionKind, Error, Result};

/// Opaque identifier for a mappable model type.
///
/// Metadata tables are static (generated or hand-written), so identifiers are
/// cheap `&'static str` newtypes, e.g. `TypeId("core.v1.Pod")`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeId(pub &'static str);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// How a raw value is interpreted when mapped into a model field.
///
/// Nested kinds carry the [`TypeId`] of their target model structurally, so a
/// descriptor cannot claim to be nested without naming what it nests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Carried through as-is from the wire representation
    Scalar,
    /// An RFC 3339 timestamp string, parsed into an immutable instant
    DateTime,
    /// A nested model, mapped recursively
    Model(TypeId),
    /// An ordered list of nested models of the given element type
    Collection(TypeId),
}

/// Describes one field of a mappable model type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field identifier on the mapped object
    pub name: &'static str,
    /// Key holding the field's value in the raw data
    pub source_key: &'static str,
    /// How the raw value is interpreted
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Descriptor for a scalar field
    pub const fn scalar(name: &'static str, source_key: &'static str) -> Self {
        Self {
            name,
            source_key,
            kind: FieldKind::Scalar,
        }
    }

    /// Descriptor for a date-time field
    pub const fn datetime(name: &'static str, source_key: &'static str) -> Self {
        Self {
            name,
            source_key,
            kind: FieldKind::DateTime,
        }
    }

    /// Descriptor for a nested model field
    pub const fn model(name: &'static str, source_key: &'static str, target: TypeId) -> Self {
        Self {
            name,
            source_key,
            kind: FieldKind::Model(target),
        }
    }

    /// Descriptor for an ordered collection of nested models
    pub const fn collection(name: &'static str, source_key: &'static str, element: TypeId) -> Self {
        Self {
            name,
            source_key,
            kind: FieldKind::Collection(element),
        }
    }
}

/// Ordered field descriptors for one model type.
///
/// Declaration order is preserved into the mapped object, but lookup during
/// mapping is by `source_key`, never by position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMetadata {
    fields: Vec<FieldDescriptor>,
}

impl TypeMetadata {
    /// Collect descriptors in declaration order
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// The descriptors, in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

impl FromIterator<FieldDescriptor> for TypeMetadata {
    fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Supplies field metadata for model types.
///
/// Implementations are typically generated alongside the model catalog.
/// `fields_of` must be deterministic for a given [`TypeId`]: results are
/// cached for the process lifetime by [`MetadataCache`].
pub trait MetadataProvider: Send + Sync {
    /// Ordered field descriptors for the given type
    ///
    /// Fails with [`Error::UnknownType`] for identifiers the provider does not
    /// know about.
    fn fields_of(&self, type_id: TypeId) -> Result<TypeMetadata>;

    /// Resolve an (apiVersion, kind) pair found in object data to a model type
    ///
    /// Fails with [`Error::UnresolvedKind`] if the pair is not part of the
    /// provider's catalog.
    fn resolve_gvk(&self, gvk: &GroupVersionKind) -> Result<TypeId>;
}

/// Lazily populated, process-lifetime cache over a [`MetadataProvider`].
///
/// Entries are published atomically under a write lock. Concurrent first
/// accesses for the same type may both invoke the provider; the recomputation
/// is deterministic and the first published entry wins.
pub struct MetadataCache {
    provider: Arc<dyn MetadataProvider>,
    entries: RwLock<HashMap<TypeId, Arc<TypeMetadata>>>,
}

impl MetadataCache {
    /// Wrap a provider in a cache
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            provider,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached field descriptors for the given type
    pub fn fields_of(&self, type_id: TypeId) -> Result<Arc<TypeMetadata>> {
        if let Some(metadata) = self.entries.read().get(&type_id) {
            return Ok(metadata.clone());
        }
        let computed = Arc::new(self.provider.fields_of(type_id)?);
        let mut entries = self.entries.write();
        Ok(entries.entry(type_id).or_insert(computed).clone())
    }

    /// Resolve an (apiVersion, kind) pair through the underlying provider
    pub fn resolve_gvk(&self, gvk: &GroupVersionKind) -> Result<TypeId> {
        self.provider.resolve_gvk(gvk)
    }
}

impl fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataCache")
            .field("entries", &self.entries.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WIDGET: TypeId = TypeId("test.Widget");

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl MetadataProvider for CountingProvider {
        fn fields_of(&self, type_id: TypeId) -> Result<TypeMetadata> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if type_id == WIDGET {
                Ok(TypeMetadata::new(vec![FieldDescriptor::scalar("name", "name")]))
            } else {
                Err(Error::UnknownType(type_id))
            }
        }

        fn resolve_gvk(&self, gvk: &GroupVersionKind) -> Result<TypeId> {
            Err(Error::UnresolvedKind(gvk.clone()))
        }
    }

    #[test]
    fn cache_computes_each_type_once() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let cache = MetadataCache::new(provider.clone());

        let first = cache.fields_of(WIDGET).unwrap();
        let second = cache.fields_of(WIDGET).unwrap();
        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cache_propagates_unknown_type() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let cache = MetadataCache::new(provider);

        let err = cache.fields_of(TypeId("test.Nope")).unwrap_err();
        assert!(matches!(err, Error::UnknownType(id) if id == TypeId("test.Nope")));
    }
}
