//! Flattening Tests
//!
//! Exercises the flattener against SCIM-style schema documents and checks the
//! structural properties of its output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use attribute_schemas::{
    count_leaves, find_duplicates, flatten, load_file, load_from_directory, parse_document,
    Checksum, DuplicatePolicy, FlattenError, FlattenOptions, FlattenReport, Flattener, SchemaNode,
    SchemaResource,
};
use serde_json::json;

fn fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn user_schema() -> SchemaResource {
    let value: serde_json::Value = serde_json::from_str(include_str!("fixtures/scim_user.json")).unwrap();
    parse_document(value, "scim_user").unwrap().remove(0)
}

fn names(leaves: &[SchemaNode]) -> Vec<&str> {
    leaves.iter().map(|l| l.name.as_str()).collect()
}

/// Leaf paths collected by a plain recursive walk, for comparison
fn expected_paths(nodes: &[SchemaNode], prefix: Option<&str>, out: &mut Vec<String>) {
    for node in nodes {
        let path = match prefix {
            Some(p) => format!("{}.{}", p, node.name),
            None => node.name.clone(),
        };
        if node.is_leaf() {
            out.push(path);
        } else {
            expected_paths(node.sub_attributes(), Some(&path), out);
        }
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_scim_user_schema() {
    let schema = user_schema();
    let leaves = flatten(&schema.attributes, None).unwrap();

    assert_eq!(
        names(&leaves),
        vec![
            "userName",
            "name.familyName",
            "name.givenName",
            "addresses.street",
            "addresses.geo.lat",
            "addresses.geo.lon",
            "addresses.country",
            "emails",
            "active",
        ]
    );
}

#[test]
fn test_bare_attribute_fixture() {
    let resources = load_file(&fixtures_path().join("bare_attributes.json")).unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].id, "bare_attributes");

    let leaves = flatten(&resources[0].attributes, None).unwrap();
    assert_eq!(names(&leaves), vec!["x", "y.z"]);
}

#[test]
fn test_parent_name_on_external_call() {
    let schema = user_schema();
    let leaves = flatten(&schema.attributes, Some("user")).unwrap();
    assert_eq!(leaves[0].name, "user.userName");
    assert_eq!(leaves[4].name, "user.addresses.geo.lat");
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_flat_input_is_unchanged() {
    let input: Vec<SchemaNode> = serde_json::from_value(json!([
        { "name": "email", "type": "string" },
        { "name": "phone", "type": "string" },
        { "name": "active", "type": "boolean" }
    ]))
    .unwrap();

    let leaves = flatten(&input, None).unwrap();
    assert_eq!(leaves, input);
}

#[test]
fn test_completeness_and_order() {
    let schema = user_schema();
    let leaves = flatten(&schema.attributes, None).unwrap();

    assert_eq!(leaves.len(), count_leaves(&schema.attributes));

    let mut expected = Vec::new();
    expected_paths(&schema.attributes, None, &mut expected);
    assert_eq!(names(&leaves), expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn test_opaque_fields_preserved() {
    let schema = user_schema();
    let leaves = flatten(&schema.attributes, None).unwrap();

    let country = leaves.iter().find(|l| l.name == "addresses.country").unwrap();
    assert_eq!(country.property("type"), Some(&json!("string")));
    assert_eq!(country.property("canonicalValues"), Some(&json!(["LK", "US"])));

    let user_name = &leaves[0];
    assert_eq!(user_name.property("required"), Some(&json!(true)));
    assert_eq!(user_name.property("uniqueness"), Some(&json!("server")));
}

#[test]
fn test_input_not_mutated() {
    let schema = user_schema();
    let before = schema.clone();
    let leaves = flatten(&schema.attributes, Some("user")).unwrap();

    assert_eq!(schema, before);

    let street_source = &schema.attributes[2].sub_attributes()[0];
    let street = leaves.iter().find(|l| l.name == "user.addresses.street").unwrap();
    assert_eq!(street_source.name, "street");
    assert!(!std::ptr::eq(street_source, street));
    assert!(Arc::ptr_eq(&street_source.properties, &street.properties));
}

#[test]
fn test_repeated_flatten_is_deterministic() {
    let schema = user_schema();
    let first = flatten(&schema.attributes, None).unwrap();
    let second = flatten(&schema.attributes, None).unwrap();
    assert_eq!(first, second);
    assert_eq!(Checksum::of_leaves(&first), Checksum::of_leaves(&second));
}

#[test]
fn test_flattener_is_shareable_across_threads() {
    let schema = Arc::new(user_schema());
    let flattener = Arc::new(Flattener::default());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let schema = Arc::clone(&schema);
            let flattener = Arc::clone(&flattener);
            std::thread::spawn(move || flattener.flatten(&schema.attributes, None).unwrap())
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

// =============================================================================
// Duplicates and loading
// =============================================================================

#[test]
fn test_duplicate_fixture() {
    let resources = load_file(&fixtures_path().join("duplicate_names.json")).unwrap();
    let leaves = flatten(&resources[0].attributes, None).unwrap();
    assert_eq!(names(&leaves), vec!["members.value", "members.value"]);
    assert_eq!(find_duplicates(&leaves), vec!["members.value".to_string()]);

    let strict = Flattener::new(FlattenOptions {
        duplicates: DuplicatePolicy::Reject,
        ..FlattenOptions::default()
    });
    assert!(matches!(
        strict.flatten(&resources[0].attributes, None),
        Err(FlattenError::DuplicateName { .. })
    ));
}

#[test]
fn test_load_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::copy(fixtures_path().join("scim_user.json"), dir.path().join("b_user.json")).unwrap();
    std::fs::copy(
        fixtures_path().join("bare_attributes.json"),
        dir.path().join("nested/a_bare.json"),
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a schema").unwrap();

    let resources = load_from_directory(dir.path()).unwrap();
    let ids: Vec<_> = resources.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["urn:ietf:params:scim:schemas:core:2.0:User", "a_bare"]);

    let report = FlattenReport::build(&resources, &Flattener::default(), false).unwrap();
    assert_eq!(report.total_leaves, 11);
    assert!(!report.has_duplicates());
}

#[test]
fn test_unnamed_attribute_in_document() {
    let resources = parse_document(
        json!([{ "name": "name", "subAttributes": [{ "type": "string" }] }]),
        "broken",
    )
    .unwrap();
    match flatten(&resources[0].attributes, None).unwrap_err() {
        FlattenError::MissingName { path } => assert_eq!(path, "name[0]"),
        other => panic!("Expected MissingName, got {:?}", other),
    }
}
