//! Attribute schema nodes
//!
//! A [`SchemaNode`] is one attribute descriptor of a profile schema. Nodes with
//! sub-attributes are groups; everything else is a leaf. Fields other than
//! `name` and `subAttributes` are opaque and kept behind an [`Arc`], so copying
//! a node shares them instead of deep-cloning.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Opaque descriptive fields of a node (type, mutability, displayName, ...)
pub type Properties = Map<String, Value>;

/// A single attribute schema node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Attribute name, unique among siblings
    #[serde(default)]
    pub name: String,
    /// Nested attributes; present and non-empty only for groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_attributes: Option<Vec<SchemaNode>>,
    /// Everything else, preserved verbatim
    #[serde(flatten)]
    pub properties: Arc<Properties>,
}

impl SchemaNode {
    /// Create a leaf node with no properties
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sub_attributes: None,
            properties: Arc::new(Properties::new()),
        }
    }

    /// Create a group node
    pub fn group(name: impl Into<String>, sub_attributes: Vec<SchemaNode>) -> Self {
        Self {
            name: name.into(),
            sub_attributes: Some(sub_attributes),
            properties: Arc::new(Properties::new()),
        }
    }

    /// Set an opaque property
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        Arc::make_mut(&mut self.properties).insert(key.into(), value);
        self
    }

    /// Look up an opaque property
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Child nodes (empty for leaves)
    pub fn sub_attributes(&self) -> &[SchemaNode] {
        self.sub_attributes.as_deref().unwrap_or(&[])
    }

    /// A node is a leaf iff it has no sub-attributes
    pub fn is_leaf(&self) -> bool {
        self.sub_attributes().is_empty()
    }

    pub fn is_group(&self) -> bool {
        !self.is_leaf()
    }

    /// Copy of this node under another name. Properties are shared, not cloned.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sub_attributes: self.sub_attributes.clone(),
            properties: Arc::clone(&self.properties),
        }
    }

    /// Number of leaves in the tree rooted at this node
    pub fn leaf_count(&self) -> usize {
        count_leaves(std::slice::from_ref(self))
    }

    /// Nesting depth: 0 for a leaf, 1 for a group of leaves, ...
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.sub_attributes().iter().map(|child| (child, depth + 1)));
        }
        deepest
    }
}

/// Count leaves across a forest
pub fn count_leaves(forest: &[SchemaNode]) -> usize {
    let mut count = 0;
    let mut stack: Vec<&SchemaNode> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        if node.is_leaf() {
            count += 1;
        } else {
            stack.extend(node.sub_attributes());
        }
    }
    count
}
