//! Core types shared by writers, readers and the type registry
//!
//! - [`ObjectType`]: integer tag identifying a control-plane object kind

use serde::{Deserialize, Serialize};

/// Object type tag
///
/// Identifies the domain kind of a Create/Modify/Delete payload. The tag is
/// written to every frame as a big-endian `i64`; what it means is owned by the
/// [`TypeRegistry`](crate::TypeRegistry), not by the wire format. The
/// associated constants name the standard control-plane kinds.
///
/// # Examples
///
/// ```
/// use ctljournal_core::ObjectType;
///
/// assert_eq!(ObjectType::CLUSTER.id(), 5);
/// assert_eq!(ObjectType::from_id(5), ObjectType::CLUSTER);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectType(i64);

impl ObjectType {
    /// Tag carried by frames that have no object kind (Version)
    pub const NONE: ObjectType = ObjectType(0);
    /// Zone
    pub const ZONE: ObjectType = ObjectType(1);
    /// Proxy
    pub const PROXY: ObjectType = ObjectType(2);
    /// Domain
    pub const DOMAIN: ObjectType = ObjectType(3);
    /// Route
    pub const ROUTE: ObjectType = ObjectType(4);
    /// Cluster
    pub const CLUSTER: ObjectType = ObjectType(5);
    /// Shared rules
    pub const SHARED_RULES: ObjectType = ObjectType(6);
    /// Listener
    pub const LISTENER: ObjectType = ObjectType(7);

    /// Standard control-plane kinds, in tag order
    pub const STANDARD: [ObjectType; 7] = [
        ObjectType::ZONE,
        ObjectType::PROXY,
        ObjectType::DOMAIN,
        ObjectType::ROUTE,
        ObjectType::CLUSTER,
        ObjectType::SHARED_RULES,
        ObjectType::LISTENER,
    ];

    /// Wrap a raw tag
    pub const fn from_id(id: i64) -> Self {
        ObjectType(id)
    }

    /// Raw tag as written to the wire
    pub const fn id(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ObjectType {
    fn from(id: i64) -> Self {
        ObjectType(id)
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tags_are_distinct() {
        let mut ids: Vec<i64> = ObjectType::STANDARD.iter().map(|t| t.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ObjectType::STANDARD.len());
        assert!(!ObjectType::STANDARD.contains(&ObjectType::NONE));
    }

    #[test]
    fn test_from_i64() {
        let tag: ObjectType = 42i64.into();
        assert_eq!(tag.id(), 42);
        assert_eq!(tag.to_string(), "42");
    }
}
