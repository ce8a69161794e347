//! Type registry: object type tag to payload codec
//!
//! The registry is built once at startup and handed to writers and readers
//! (usually behind an `Arc`). It is immutable after construction, so any
//! number of writers and readers may share it.
//!
//! ## Payload encoding
//!
//! | Action | Payload |
//! |--------|---------|
//! | Create / Modify | JSON encoding of the registered Rust type |
//! | Delete | JSON encoding of the key string |
//!
//! Writers are type-checked: passing a value whose Rust type differs from the
//! one registered for the tag fails with [`JournalError::TypeMismatch`].

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{JournalError, Result};
use crate::objects::{Cluster, Domain, Listener, Proxy, Route, SharedRules, Zone};
use crate::types::ObjectType;

/// A value that can travel through the journal as a decoded object
pub trait ObjectValue: Any + fmt::Debug + Send + Sync {
    /// Borrow as `Any` for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Convert into a boxed `Any` for owned downcasting
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;

    /// Rust type name of the concrete value
    fn type_name(&self) -> &'static str;

    /// Re-serialize as a JSON value
    fn to_json(&self) -> Result<serde_json::Value>;
}

impl<T: Any + Serialize + fmt::Debug + Send + Sync> ObjectValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Type-erased decoded object
///
/// Produced by [`TypeRegistry::decode`]; recover the concrete type with
/// [`Object::downcast_ref`] or [`Object::downcast`].
pub struct Object(Box<dyn ObjectValue>);

impl Object {
    /// Wrap a concrete value
    pub fn new<T: ObjectValue>(value: T) -> Self {
        Object(Box::new(value))
    }

    /// Check the concrete type
    pub fn is<T: Any>(&self) -> bool {
        (*self.0).as_any().is::<T>()
    }

    /// Borrow as the concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    /// Take the concrete value, or get the object back on mismatch
    pub fn downcast<T: Any>(self) -> std::result::Result<T, Object> {
        if !self.is::<T>() {
            return Err(self);
        }
        match ObjectValue::into_any(self.0).downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("type checked above"),
        }
    }

    /// Rust type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        (*self.0).type_name()
    }

    /// Re-serialize the wrapped value as JSON
    pub fn to_json(&self) -> Result<serde_json::Value> {
        (*self.0).to_json()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

type DecodeFn = fn(&[u8]) -> Result<Object>;

fn decode_json<T>(bytes: &[u8]) -> Result<Object>
where
    T: DeserializeOwned + ObjectValue,
{
    Ok(Object::new(serde_json::from_slice::<T>(bytes)?))
}

/// Registered object kind
#[derive(Clone)]
pub struct Kind {
    object_type: ObjectType,
    name: &'static str,
    rust_type: TypeId,
    rust_type_name: &'static str,
    decode: DecodeFn,
}

impl Kind {
    /// Tag this kind is registered under
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Human-readable kind name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check whether values of `T` may be written as this kind
    pub fn accepts<T: Any>(&self) -> bool {
        TypeId::of::<T>() == self.rust_type
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kind")
            .field("object_type", &self.object_type)
            .field("name", &self.name)
            .field("rust_type", &self.rust_type_name)
            .finish()
    }
}

/// Mapping from object type tag to payload codec
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    kinds: BTreeMap<ObjectType, Kind>,
}

impl TypeRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the seven standard control-plane kinds
    pub fn control_plane() -> Self {
        let mut registry = Self::new();
        registry.register::<Zone>(ObjectType::ZONE, "Zone");
        registry.register::<Proxy>(ObjectType::PROXY, "Proxy");
        registry.register::<Domain>(ObjectType::DOMAIN, "Domain");
        registry.register::<Route>(ObjectType::ROUTE, "Route");
        registry.register::<Cluster>(ObjectType::CLUSTER, "Cluster");
        registry.register::<SharedRules>(ObjectType::SHARED_RULES, "SharedRules");
        registry.register::<Listener>(ObjectType::LISTENER, "Listener");
        registry
    }

    /// Register `T` under `object_type`
    ///
    /// Returns the kind previously registered under the same tag, if any.
    pub fn register<T>(&mut self, object_type: ObjectType, name: &'static str) -> Option<Kind>
    where
        T: Serialize + DeserializeOwned + ObjectValue,
    {
        let kind = Kind {
            object_type,
            name,
            rust_type: TypeId::of::<T>(),
            rust_type_name: std::any::type_name::<T>(),
            decode: decode_json::<T>,
        };
        self.kinds.insert(object_type, kind)
    }

    /// Builder form of [`register`](Self::register)
    pub fn with<T>(mut self, object_type: ObjectType, name: &'static str) -> Self
    where
        T: Serialize + DeserializeOwned + ObjectValue,
    {
        self.register::<T>(object_type, name);
        self
    }

    /// Look up the kind for a tag
    pub fn resolve(&self, object_type: ObjectType) -> Result<&Kind> {
        self.kinds
            .get(&object_type)
            .ok_or(JournalError::UnknownType(object_type.id()))
    }

    /// Serialize an object payload for `kind`
    pub fn encode<T>(&self, kind: &Kind, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + Any,
    {
        if !kind.accepts::<T>() {
            return Err(JournalError::TypeMismatch {
                object_type: kind.name,
                expected: kind.rust_type_name,
                actual: std::any::type_name::<T>(),
            });
        }
        Ok(serde_json::to_vec(value)?)
    }

    /// Deserialize an object payload for `kind`
    pub fn decode(&self, kind: &Kind, bytes: &[u8]) -> Result<Object> {
        (kind.decode)(bytes).map_err(|e| match e {
            JournalError::Serialization(msg) => {
                JournalError::Serialization(format!("{}: {}", kind.name, msg))
            }
            other => other,
        })
    }

    /// Serialize a Delete key
    pub fn encode_key(&self, key: &str) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(key)?)
    }

    /// Deserialize a Delete key
    pub fn decode_key(&self, bytes: &[u8]) -> Result<String> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Check whether a tag is registered
    pub fn contains(&self, object_type: ObjectType) -> bool {
        self.kinds.contains_key(&object_type)
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if no kinds are registered
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
