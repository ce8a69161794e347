//! ReadItem → text conversion.
//!
//! - **Human**: one aligned line per item, object payloads as compact JSON
//! - **Json**: one JSON document per line, suitable for `jq`

use ctljournal_core::{ReadItem, TypeRegistry};
use serde_json::{json, Value};

/// How items are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Display name for the object type of `item`, if it carries one.
fn type_label(item: &ReadItem, registry: &TypeRegistry) -> Option<String> {
    let object_type = item.object_type()?;
    Some(match registry.resolve(object_type) {
        Ok(kind) => format!("{}({})", kind.name(), object_type),
        Err(_) => format!("?({})", object_type),
    })
}

fn payload(item: &ReadItem) -> Value {
    match item {
        ReadItem::Create(record) | ReadItem::Modify(record) => record
            .object
            .to_json()
            .unwrap_or_else(|e| Value::String(format!("<{}>", e))),
        ReadItem::Delete(record) => Value::String(record.key.clone()),
        ReadItem::Version(record) => Value::String(record.version.clone()),
        ReadItem::Error(e) => Value::String(e.to_string()),
    }
}

/// Render one item.
pub fn format_item(index: usize, item: &ReadItem, registry: &TypeRegistry, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format_human(index, item, registry),
        OutputMode::Json => format_json(index, item, registry),
    }
}

fn format_human(index: usize, item: &ReadItem, registry: &TypeRegistry) -> String {
    if let ReadItem::Error(e) = item {
        return format!("#{:<5} (error) {}", index, e);
    }
    let timestamp = item
        .timestamp()
        .map(|t| t.to_string())
        .unwrap_or_default();
    let label = type_label(item, registry).unwrap_or_else(|| "-".to_string());
    format!(
        "#{:<5} {} {:<7} {:<16} {}",
        index,
        timestamp,
        item.kind().name(),
        label,
        payload(item)
    )
}

fn format_json(index: usize, item: &ReadItem, registry: &TypeRegistry) -> String {
    let mut doc = json!({
        "index": index,
        "kind": item.kind().name(),
    });
    if let Some(timestamp) = item.timestamp() {
        doc["timestamp"] = Value::String(timestamp.to_string());
    }
    if let Some(object_type) = item.object_type() {
        doc["object_type"] = json!(object_type.id());
        if let Ok(kind) = registry.resolve(object_type) {
            doc["type_name"] = Value::String(kind.name().to_string());
        }
    }
    let field = match item {
        ReadItem::Create(_) | ReadItem::Modify(_) => "object",
        ReadItem::Delete(_) => "key",
        ReadItem::Version(_) => "version",
        ReadItem::Error(_) => "error",
    };
    doc[field] = payload(item);
    doc.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctljournal_core::objects::Cluster;
    use ctljournal_core::{
        DeleteRecord, JournalError, Object, ObjectRecord, ObjectType, Timestamp, VersionRecord,
    };

    fn ts() -> Timestamp {
        Timestamp::from_unix(1_700_000_000, 0).unwrap()
    }

    fn cluster_item() -> ReadItem {
        ReadItem::Create(ObjectRecord {
            object_type: ObjectType::CLUSTER,
            timestamp: ts(),
            object: Object::new(Cluster {
                cluster_key: "c1".into(),
                ..Default::default()
            }),
        })
    }

    #[test]
    fn test_human_object_line() {
        let registry = TypeRegistry::control_plane();
        let line = format_item(0, &cluster_item(), &registry, OutputMode::Human);
        assert!(line.starts_with("#0"));
        assert!(line.contains("2023-11-14T22:13:20"));
        assert!(line.contains("create"));
        assert!(line.contains("Cluster(5)"));
        assert!(line.contains("\"cluster_key\":\"c1\""));
    }

    #[test]
    fn test_human_error_line() {
        let registry = TypeRegistry::control_plane();
        let item = ReadItem::Error(JournalError::UnknownType(99));
        let line = format_item(3, &item, &registry, OutputMode::Human);
        assert!(line.contains("(error)"));
        assert!(line.contains("99"));
    }

    #[test]
    fn test_json_object_document() {
        let registry = TypeRegistry::control_plane();
        let line = format_item(1, &cluster_item(), &registry, OutputMode::Json);
        let doc: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(doc["index"], 1);
        assert_eq!(doc["kind"], "create");
        assert_eq!(doc["object_type"], 5);
        assert_eq!(doc["type_name"], "Cluster");
        assert_eq!(doc["object"]["cluster_key"], "c1");
    }

    #[test]
    fn test_json_delete_and_version() {
        let registry = TypeRegistry::control_plane();
        let delete = ReadItem::Delete(DeleteRecord {
            object_type: ObjectType::ROUTE,
            timestamp: ts(),
            key: "r1".into(),
        });
        let doc: Value =
            serde_json::from_str(&format_item(0, &delete, &registry, OutputMode::Json)).unwrap();
        assert_eq!(doc["key"], "r1");
        assert_eq!(doc["type_name"], "Route");

        let version = ReadItem::Version(VersionRecord {
            timestamp: ts(),
            version: "2.0.0".into(),
        });
        let doc: Value =
            serde_json::from_str(&format_item(1, &version, &registry, OutputMode::Json)).unwrap();
        assert_eq!(doc["version"], "2.0.0");
        assert!(doc.get("object_type").is_none());
    }
}
