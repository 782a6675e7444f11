//! Schema Loading
//!
//! Reads attribute schemas from JSON documents. A document may hold a single
//! schema resource (`{"id": ..., "attributes": [...]}`), an array of resources,
//! or a bare array of attribute nodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{FlattenError, Result};
use crate::flatten::Flattener;
use crate::node::SchemaNode;

/// A schema resource: a named forest of attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaResource {
    /// Schema identifier (e.g. `urn:ietf:params:scim:schemas:core:2.0:User`)
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Vec<SchemaNode>,
}

impl SchemaResource {
    pub fn new(id: impl Into<String>, attributes: Vec<SchemaNode>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            attributes,
        }
    }

    /// Flatten the attributes of this resource, optionally qualified with its id
    pub fn flatten(&self, flattener: &Flattener, qualify_with_id: bool) -> Result<Vec<SchemaNode>> {
        let parent = qualify_with_id.then_some(self.id.as_str());
        flattener.flatten(&self.attributes, parent)
    }
}

fn is_resource(value: &Value) -> bool {
    value.get("attributes").map(Value::is_array).unwrap_or(false)
}

/// Interpret a parsed JSON document; `fallback_id` names resources without an id
pub fn parse_document(value: Value, fallback_id: &str) -> Result<Vec<SchemaResource>> {
    let mut resources = match value {
        Value::Object(_) if is_resource(&value) => vec![serde_json::from_value(value)?],
        Value::Array(items) => {
            let resource_count = items.iter().filter(|item| is_resource(item)).count();
            if resource_count == 0 {
                let attributes: Vec<SchemaNode> = serde_json::from_value(Value::Array(items))?;
                vec![SchemaResource::new(fallback_id, attributes)]
            } else if resource_count == items.len() {
                serde_json::from_value(Value::Array(items))?
            } else {
                return Err(FlattenError::InvalidDocument(format!(
                    "{}: array mixes schema resources and attributes",
                    fallback_id
                )));
            }
        }
        _ => {
            return Err(FlattenError::InvalidDocument(format!(
                "{}: expected a schema resource or an array",
                fallback_id
            )))
        }
    };

    for resource in &mut resources {
        if resource.id.is_empty() {
            resource.id = fallback_id.to_string();
        }
    }
    Ok(resources)
}

/// Load schema resources from a single JSON file
pub fn load_file(path: &Path) -> Result<Vec<SchemaResource>> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    let fallback_id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let resources = parse_document(value, &fallback_id)?;
    debug!(path = %path.display(), resources = resources.len(), "loaded schema file");
    Ok(resources)
}

/// Load schema resources from every `*.json` file below `dir`, in path order
pub fn load_from_directory(dir: &Path) -> Result<Vec<SchemaResource>> {
    let mut resources = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| FlattenError::Io(e.into()))?;
        let path = entry.path();
        if !path.is_file() || path.extension().map(|e| e != "json").unwrap_or(true) {
            continue;
        }
        resources.extend(load_file(path)?);
    }
    debug!(dir = %dir.display(), resources = resources.len(), "loaded schema directory");
    Ok(resources)
}

/// Load from a file or a directory
pub fn load_path(path: &Path) -> Result<Vec<SchemaResource>> {
    if path.is_dir() {
        load_from_directory(path)
    } else {
        load_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_resource() {
        let resources = parse_document(
            json!({
                "id": "urn:example:User",
                "name": "User",
                "attributes": [{ "name": "userName" }]
            }),
            "user",
        )
        .unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].id, "urn:example:User");
        assert_eq!(resources[0].name.as_deref(), Some("User"));
        assert_eq!(resources[0].attributes[0].name, "userName");
    }

    #[test]
    fn test_bare_attribute_array() {
        let resources = parse_document(json!([{ "name": "email" }, { "name": "phone" }]), "contact").unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].id, "contact");
        assert_eq!(resources[0].attributes.len(), 2);
    }

    #[test]
    fn test_resource_array_fills_missing_id() {
        let resources = parse_document(
            json!([
                { "id": "core", "attributes": [] },
                { "attributes": [{ "name": "employeeNumber" }] }
            ]),
            "schemas",
        )
        .unwrap();
        assert_eq!(resources[0].id, "core");
        assert_eq!(resources[1].id, "schemas");
    }

    #[test]
    fn test_mixed_array_rejected() {
        let err = parse_document(json!([{ "attributes": [] }, { "name": "email" }]), "bad").unwrap_err();
        assert!(matches!(err, FlattenError::InvalidDocument(_)));
    }

    #[test]
    fn test_scalar_rejected() {
        assert!(matches!(
            parse_document(json!("nope"), "bad"),
            Err(FlattenError::InvalidDocument(_))
        ));
        assert!(matches!(
            parse_document(json!({ "name": "email" }), "bad"),
            Err(FlattenError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_resource_flatten_with_id() {
        let resource = SchemaResource::new(
            "enterprise",
            vec![SchemaNode::group("manager", vec![SchemaNode::leaf("value")])],
        );
        let flattener = Flattener::default();
        let plain = resource.flatten(&flattener, false).unwrap();
        let qualified = resource.flatten(&flattener, true).unwrap();
        assert_eq!(plain[0].name, "manager.value");
        assert_eq!(qualified[0].name, "enterprise.manager.value");
    }
}
