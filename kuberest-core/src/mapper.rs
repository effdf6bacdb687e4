//! Metadata-driven mapping of raw wire data into typed object graphs.
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    gvk::GroupVersionKind,
    metadata::{FieldKind, MetadataCache, MetadataProvider, TypeId},
    object::{TypedObject, TypedValue},
    watch, Error, Result,
};

/// Recursion cap for nested models.
///
/// Well-formed type graphs stay shallow; the cap turns self-referential
/// metadata into [`Error::DepthLimitExceeded`] instead of a stack overflow.
pub const MAX_DEPTH: usize = 64;

/// Maps raw key-value data into [`TypedObject`] graphs.
///
/// Stateless apart from a read-mostly metadata cache; a mapper is safe to
/// share across threads and mapping is a pure function of its inputs.
#[derive(Debug)]
pub struct ModelMapper {
    cache: MetadataCache,
}

impl ModelMapper {
    /// Construct a mapper over a metadata provider
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            cache: MetadataCache::new(provider),
        }
    }

    /// Map a raw object into an instance of `type_id`
    ///
    /// Walks the type's field descriptors in declaration order. Source keys
    /// absent from `data` are skipped; the produced object simply has no entry
    /// for them. Shape or parse failures abort the whole call, so no partial
    /// graph is ever returned.
    pub fn map(&self, data: &Map<String, Value>, type_id: TypeId) -> Result<TypedObject> {
        tracing::trace!(%type_id, "mapping raw object");
        self.map_at(data, type_id, 0)
    }

    fn map_at(&self, data: &Map<String, Value>, type_id: TypeId, depth: usize) -> Result<TypedObject> {
        if depth >= MAX_DEPTH {
            return Err(Error::DepthLimitExceeded(MAX_DEPTH));
        }
        let metadata = self.cache.fields_of(type_id)?;
        let mut fields = Vec::with_capacity(metadata.fields().len());
        for descriptor in metadata.fields() {
            let Some(raw) = data.get(descriptor.source_key) else {
                continue;
            };
            // The envelope's object field is resolved from payload data, not
            // from the descriptor's static kind.
            let value = if type_id == watch::WATCH_EVENT && descriptor.name == watch::OBJECT_FIELD {
                self.map_event_object(raw, depth)?
            } else {
                match descriptor.kind {
                    FieldKind::Scalar => TypedValue::Scalar(raw.clone()),
                    FieldKind::DateTime => parse_datetime(descriptor.name, raw)?,
                    FieldKind::Model(target) => {
                        let map = as_object(descriptor.name, raw)?;
                        TypedValue::Model(self.map_at(map, target, depth + 1)?)
                    }
                    FieldKind::Collection(element) => {
                        let items = raw.as_array().ok_or(Error::ShapeMismatch {
                            field: descriptor.name,
                            expected: "array",
                            found: shape_of(raw),
                        })?;
                        let mapped = items
                            .iter()
                            .map(|item| {
                                let map = as_object(descriptor.name, item)?;
                                self.map_at(map, element, depth + 1)
                            })
                            .collect::<Result<Vec<_>>>()?;
                        TypedValue::Collection(mapped)
                    }
                }
            };
            fields.push((descriptor.name, value));
        }
        Ok(TypedObject::new(type_id, fields))
    }

    fn map_event_object(&self, raw: &Value, depth: usize) -> Result<TypedValue> {
        let map = as_object(watch::OBJECT_FIELD, raw)?;
        let api_version = map
            .get("apiVersion")
            .and_then(Value::as_str)
            .ok_or(Error::MissingDiscriminant("apiVersion"))?;
        let kind = map
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(Error::MissingDiscriminant("kind"))?;
        let gvk =
            GroupVersionKind::try_from_api_version(api_version, kind).map_err(Error::ParseGroupVersion)?;
        let resolved = self.cache.resolve_gvk(&gvk)?;
        tracing::trace!(%resolved, "resolved watch event object");
        Ok(TypedValue::Model(self.map_at(map, resolved, depth + 1)?))
    }
}

fn parse_datetime(field: &'static str, raw: &Value) -> Result<TypedValue> {
    let s = raw.as_str().ok_or(Error::ShapeMismatch {
        field,
        expected: "date-time string",
        found: shape_of(raw),
    })?;
    let parsed = chrono::DateTime::parse_from_rfc3339(s).map_err(Error::MalformedDateTime)?;
    Ok(TypedValue::DateTime(parsed.with_timezone(&chrono::Utc)))
}

fn as_object<'a>(field: &'static str, raw: &'a Value) -> Result<&'a Map<String, Value>> {
    raw.as_object().ok_or(Error::ShapeMismatch {
        field,
        expected: "object",
        found: shape_of(raw),
    })
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
