//! Attribute Schemas
//!
//! Flattens hierarchical profile-attribute schemas into an ordered,
//! display-ready sequence of leaf attributes whose names carry their dotted
//! ancestor path.
//!
//! ## Example
//!
//! ```text
//! [                                        [
//!   { name: "userName" },                    { name: "userName" },
//!   { name: "addresses",             ->      { name: "addresses.street" },
//!     subAttributes: [                       { name: "addresses.country" }
//!       { name: "street" },                ]
//!       { name: "country" } ] }
//! ]
//! ```
//!
//! ```
//! use attribute_schemas::{flatten, SchemaNode};
//!
//! let schema = vec![
//!     SchemaNode::leaf("userName"),
//!     SchemaNode::group("addresses", vec![SchemaNode::leaf("street"), SchemaNode::leaf("country")]),
//! ];
//! let leaves = flatten(&schema, None).unwrap();
//! let names: Vec<_> = leaves.iter().map(|l| l.name.as_str()).collect();
//! assert_eq!(names, ["userName", "addresses.street", "addresses.country"]);
//! ```

pub mod checksum;
pub mod config;
pub mod error;
pub mod flatten;
pub mod loader;
pub mod node;
pub mod report;

pub use checksum::Checksum;
pub use config::{FlattenConfig, OutputFormat};
pub use error::{FlattenError, Result};
pub use flatten::{find_duplicates, flatten, DuplicatePolicy, FlattenOptions, Flattener, NamePolicy};
pub use loader::{load_file, load_from_directory, load_path, parse_document, SchemaResource};
pub use node::{count_leaves, SchemaNode};
pub use report::{FlattenReport, ResourceReport};
