//! The typed object graph produced by the mapper.
use chrono::{DateTime, Utc};

use crate::metadata::TypeId;

/// A single mapped field value.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    /// A wire scalar (string, number, bool, null, or untyped structure)
    Scalar(serde_json::Value),
    /// A parsed timestamp
    DateTime(DateTime<Utc>),
    /// A nested model
    Model(TypedObject),
    /// An ordered collection of nested models, order and length as received
    Collection(Vec<TypedObject>),
}

impl TypedValue {
    /// The scalar value, if this is a scalar field
    pub fn as_scalar(&self) -> Option<&serde_json::Value> {
        match self {
            TypedValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// The scalar as a string slice, if this is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(serde_json::Value::as_str)
    }

    /// The parsed timestamp, if this is a date-time field
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            TypedValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// The nested model, if this is a model field
    pub fn as_model(&self) -> Option<&TypedObject> {
        match self {
            TypedValue::Model(obj) => Some(obj),
            _ => None,
        }
    }

    /// The nested models, if this is a collection field
    pub fn as_collection(&self) -> Option<&[TypedObject]> {
        match self {
            TypedValue::Collection(items) => Some(items),
            _ => None,
        }
    }
}

/// A fully-mapped model instance.
///
/// Produced in one step by the mapper once all field values for the instance
/// have been accumulated; a partially-populated object is never observable.
/// Fields appear in metadata declaration order. A source key that was absent
/// from the raw data has no entry here, so [`TypedObject::get`] returns `None`
/// for it; absence is the documented default, not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedObject {
    type_id: TypeId,
    fields: Vec<(&'static str, TypedValue)>,
}

impl TypedObject {
    pub(crate) fn new(type_id: TypeId, fields: Vec<(&'static str, TypedValue)>) -> Self {
        Self { type_id, fields }
    }

    /// The model type this instance was mapped as
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Look up a field by its metadata name
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// All populated fields, in metadata declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &TypedValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }
}
