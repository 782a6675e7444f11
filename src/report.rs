//! Flattening reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::error::Result;
use crate::flatten::{find_duplicates, Flattener};
use crate::loader::SchemaResource;
use crate::node::count_leaves;

/// Summary of one flattened resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceReport {
    pub id: String,
    pub leaf_count: usize,
    pub duplicates: Vec<String>,
    pub checksum: Checksum,
}

/// Summary of a batch of flattened resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlattenReport {
    pub generated_at: DateTime<Utc>,
    pub total_leaves: usize,
    pub resources: Vec<ResourceReport>,
}

impl FlattenReport {
    /// Flatten every resource and summarize the result
    pub fn build(resources: &[SchemaResource], flattener: &Flattener, qualify_with_id: bool) -> Result<Self> {
        let mut reports = Vec::with_capacity(resources.len());
        for resource in resources {
            let leaves = resource.flatten(flattener, qualify_with_id)?;
            debug_assert_eq!(leaves.len(), count_leaves(&resource.attributes));
            reports.push(ResourceReport {
                id: resource.id.clone(),
                leaf_count: leaves.len(),
                duplicates: find_duplicates(&leaves),
                checksum: Checksum::of_leaves(&leaves),
            });
        }

        Ok(Self {
            generated_at: Utc::now(),
            total_leaves: reports.iter().map(|r| r.leaf_count).sum(),
            resources: reports,
        })
    }

    pub fn has_duplicates(&self) -> bool {
        self.resources.iter().any(|r| !r.duplicates.is_empty())
    }
}
