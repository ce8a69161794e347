//! Standard control-plane object kinds
//!
//! These carry only the identifying fields the journal needs to be useful on
//! its own. Unknown JSON fields are ignored and missing ones default, so
//! richer producers can write the same tags without breaking readers.

use serde::{Deserialize, Serialize};

/// Zone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Zone {
    /// Unique zone key
    pub zone_key: String,
    /// Display name
    pub name: String,
}

/// Proxy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Proxy {
    /// Unique proxy key
    pub proxy_key: String,
    /// Owning zone
    pub zone_key: String,
    /// Display name
    pub name: String,
    /// Domains served by this proxy
    pub domain_keys: Vec<String>,
    /// Listeners bound by this proxy
    pub listener_keys: Vec<String>,
}

/// Domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    /// Unique domain key
    pub domain_key: String,
    /// Owning zone
    pub zone_key: String,
    /// Host name, `*` for any
    pub name: String,
    /// Port the domain is served on
    pub port: u16,
}

/// Route
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
    /// Unique route key
    pub route_key: String,
    /// Domain the route belongs to
    pub domain_key: String,
    /// Owning zone
    pub zone_key: String,
    /// Request path matched by the route
    pub path: String,
    /// Rules applied to matched requests
    pub shared_rules_key: String,
}

/// Upstream instance of a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instance {
    /// Host name or address
    pub host: String,
    /// Port
    pub port: u16,
}

/// Cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    /// Unique cluster key
    pub cluster_key: String,
    /// Owning zone
    pub zone_key: String,
    /// Display name
    pub name: String,
    /// Upstream instances
    pub instances: Vec<Instance>,
}

/// Shared rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedRules {
    /// Unique shared rules key
    pub shared_rules_key: String,
    /// Owning zone
    pub zone_key: String,
    /// Display name
    pub name: String,
    /// Cluster receiving unmatched traffic
    pub default_cluster_key: String,
}

/// Listener
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Listener {
    /// Unique listener key
    pub listener_key: String,
    /// Owning zone
    pub zone_key: String,
    /// Display name
    pub name: String,
    /// Bind address
    pub ip: String,
    /// Bind port
    pub port: u16,
    /// Protocol served, e.g. `http_auto`
    pub protocol: String,
}
