//! Types for the watch api
//!
//! A watch query returns newline separated event envelopes, each carrying a
//! change-type discriminant plus the changed object. The object's concrete
//! model is not fixed by the envelope's metadata; the mapper resolves it from
//! the `apiVersion` and `kind` keys inside the object itself.
use serde::{Deserialize, Serialize};

use crate::{
    metadata::{FieldDescriptor, TypeId, TypeMetadata},
    object::TypedObject,
    Error, Result,
};

/// The envelope's model type identifier, special-cased by the mapper
pub const WATCH_EVENT: TypeId = TypeId("meta.v1.WatchEvent");

/// The envelope field whose model is resolved from payload data
pub const OBJECT_FIELD: &str = "object";

/// The envelope field carrying the change-type discriminant
pub const TYPE_FIELD: &str = "type";

/// Field metadata for the envelope, for providers to register under
/// [`WATCH_EVENT`].
///
/// The `object` field is declared scalar here; its real model is picked per
/// event from the payload's own type keys.
pub fn metadata() -> TypeMetadata {
    TypeMetadata::new(vec![
        FieldDescriptor::scalar(TYPE_FIELD, "type"),
        FieldDescriptor::scalar(OBJECT_FIELD, "object"),
    ])
}

/// The change-type discriminant of a watch event
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    /// Resource was added
    Added,
    /// Resource was modified
    Modified,
    /// Resource was deleted
    Deleted,
    /// Resource bookmark, carrying little more than a resource version
    Bookmark,
    /// The server reported an error mid-watch
    Error,
}

impl EventType {
    fn from_wire(s: &str) -> Result<Self> {
        match s {
            "ADDED" => Ok(EventType::Added),
            "MODIFIED" => Ok(EventType::Modified),
            "DELETED" => Ok(EventType::Deleted),
            "BOOKMARK" => Ok(EventType::Bookmark),
            "ERROR" => Ok(EventType::Error),
            other => Err(Error::UnknownEventType(other.to_string())),
        }
    }
}

/// A typed view over a mapped watch event envelope
#[derive(Clone, Debug, PartialEq)]
pub struct WatchEvent {
    /// What happened to the object
    pub event_type: EventType,
    /// The changed object, mapped as its resolved model type
    pub object: TypedObject,
}

impl WatchEvent {
    /// Interpret a mapped envelope
    ///
    /// The envelope must have been mapped under [`WATCH_EVENT`], so that its
    /// `object` field already carries the resolved model.
    pub fn from_object(envelope: &TypedObject) -> Result<Self> {
        let event_type = envelope
            .get(TYPE_FIELD)
            .and_then(|v| v.as_str())
            .ok_or(Error::MissingDiscriminant(TYPE_FIELD))
            .and_then(EventType::from_wire)?;
        let object = envelope
            .get(OBJECT_FIELD)
            .and_then(|v| v.as_model())
            .ok_or(Error::MissingDiscriminant(OBJECT_FIELD))?
            .clone();
        Ok(Self { event_type, object })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_types_parse_from_wire_names() {
        assert_eq!(EventType::from_wire("ADDED").unwrap(), EventType::Added);
        assert_eq!(EventType::from_wire("MODIFIED").unwrap(), EventType::Modified);
        assert_eq!(EventType::from_wire("DELETED").unwrap(), EventType::Deleted);
        assert_eq!(EventType::from_wire("BOOKMARK").unwrap(), EventType::Bookmark);
        assert_eq!(EventType::from_wire("ERROR").unwrap(), EventType::Error);
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        let err = EventType::from_wire("RENAMED").unwrap_err();
        assert!(matches!(err, Error::UnknownEventType(t) if t == "RENAMED"));
    }

    #[test]
    fn event_type_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&EventType::Added).unwrap(), "\"ADDED\"");
    }

    #[test]
    fn envelope_without_object_field_is_rejected() {
        let envelope = TypedObject::new(
            WATCH_EVENT,
            vec![(
                TYPE_FIELD,
                crate::object::TypedValue::Scalar(serde_json::Value::String("ADDED".into())),
            )],
        );
        let err = WatchEvent::from_object(&envelope).unwrap_err();
        assert!(matches!(err, Error::MissingDiscriminant(OBJECT_FIELD)));
    }
}
