//! Schema flattening
//!
//! Projects a forest of attribute schema nodes onto the ordered sequence of its
//! leaves. Each leaf name is qualified with the names of its ancestor groups,
//! joined root to leaf with the configured separator:
//!
//! ```text
//! name                      name
//! addresses           ->    addresses.street
//! ├── street                addresses.country
//! └── country
//! ```
//!
//! Traversal is pre-order, depth-first and left-to-right, driven by an explicit
//! worklist so input depth never grows the call stack.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

use crate::error::{FlattenError, Result};
use crate::node::SchemaNode;

/// How to treat nodes without a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamePolicy {
    /// Fail with [`FlattenError::MissingName`]
    #[default]
    Reject,
    /// Use an empty path segment
    Tolerate,
}

/// How to treat leaves that end up with the same qualified name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep every leaf
    #[default]
    Allow,
    /// Keep every leaf and log a warning
    Warn,
    /// Fail with [`FlattenError::DuplicateName`]
    Reject,
}

/// Flattening options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenOptions {
    /// Separator between path segments
    pub separator: String,
    pub name_policy: NamePolicy,
    pub duplicates: DuplicatePolicy,
    /// Deepest allowed nesting below the top level (`Some(0)` accepts flat input only)
    pub max_depth: Option<usize>,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            separator: ".".to_string(),
            name_policy: NamePolicy::Reject,
            duplicates: DuplicatePolicy::Allow,
            max_depth: None,
        }
    }
}

/// Flattens schema forests according to a set of [`FlattenOptions`]
#[derive(Debug, Clone, Default)]
pub struct Flattener {
    options: FlattenOptions,
}

/// Pending siblings of one nesting level
struct Frame<'a> {
    nodes: std::iter::Enumerate<std::slice::Iter<'a, SchemaNode>>,
    prefix: Option<String>,
    depth: usize,
}

impl Flattener {
    pub fn new(options: FlattenOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FlattenOptions {
        &self.options
    }

    /// Flatten `schemas` into its leaves.
    ///
    /// `parent_name`, when given, prefixes every output name. Without it,
    /// top-level leaves keep their own name. The input is left untouched and
    /// every returned leaf is a fresh copy sharing its opaque properties with
    /// the source node.
    pub fn flatten(&self, schemas: &[SchemaNode], parent_name: Option<&str>) -> Result<Vec<SchemaNode>> {
        let mut leaves = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![Frame {
            nodes: schemas.iter().enumerate(),
            prefix: parent_name.map(str::to_owned),
            depth: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some((index, node)) = frame.nodes.next() else {
                stack.pop();
                continue;
            };

            if node.name.is_empty() && self.options.name_policy == NamePolicy::Reject {
                return Err(FlattenError::MissingName {
                    path: location(frame.prefix.as_deref(), index),
                });
            }

            let qualified = self.qualify(frame.prefix.as_deref(), &node.name);

            if node.is_group() {
                let depth = frame.depth + 1;
                if let Some(max_depth) = self.options.max_depth {
                    if depth > max_depth {
                        return Err(FlattenError::DepthExceeded { path: qualified, max_depth });
                    }
                }
                stack.push(Frame {
                    nodes: node.sub_attributes().iter().enumerate(),
                    prefix: Some(qualified),
                    depth,
                });
            } else {
                self.check_duplicate(&qualified, &mut seen)?;
                trace!(attribute = %qualified, "leaf");
                leaves.push(node.renamed(qualified));
            }
        }

        debug!(
            roots = schemas.len(),
            leaves = leaves.len(),
            parent = parent_name.unwrap_or(""),
            "flattened schema forest"
        );
        Ok(leaves)
    }

    fn qualify(&self, prefix: Option<&str>, name: &str) -> String {
        match prefix {
            Some(prefix) => format!("{}{}{}", prefix, self.options.separator, name),
            None => name.to_string(),
        }
    }

    fn check_duplicate(&self, name: &str, seen: &mut HashSet<String>) -> Result<()> {
        if self.options.duplicates == DuplicatePolicy::Allow || seen.insert(name.to_string()) {
            return Ok(());
        }
        match self.options.duplicates {
            DuplicatePolicy::Reject => Err(FlattenError::DuplicateName { name: name.to_string() }),
            _ => {
                warn!(attribute = name, "duplicate qualified attribute name");
                Ok(())
            }
        }
    }
}

fn location(prefix: Option<&str>, index: usize) -> String {
    format!("{}[{}]", prefix.unwrap_or("<root>"), index)
}

/// Flatten with default options
pub fn flatten(schemas: &[SchemaNode], parent_name: Option<&str>) -> Result<Vec<SchemaNode>> {
    Flattener::default().flatten(schemas, parent_name)
}

/// Qualified names that occur more than once, in first-seen order
pub fn find_duplicates(leaves: &[SchemaNode]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for leaf in leaves {
        if !seen.insert(leaf.name.as_str()) && reported.insert(leaf.name.as_str()) {
            duplicates.push(leaf.name.clone());
        }
    }
    duplicates
}
