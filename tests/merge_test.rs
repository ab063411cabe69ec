use apidog_test::commands::execute_merge;
use apidog_test::loader;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

const COLLECTION: &str = r#"{
    "apiCollection": [{
        "name": "Root",
        "items": [{"id": 1, "name": "Ping", "method": "GET", "path": "/ping"}]
    }],
    "testCaseCollection": [{
        "name": "Root",
        "items": [{"id": 2, "name": "Existing case", "ordering": 20}]
    }]
}"#;

fn write_case(dir: &std::path::Path, file: &str, json: &str) {
    fs::write(dir.join(file), json).unwrap();
}

fn setup() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let collection = dir.path().join("apidog.json");
    fs::write(&collection, COLLECTION).unwrap();
    let input = dir.path().join("cases");
    fs::create_dir(&input).unwrap();
    (dir, collection, input)
}

#[test]
fn merged_collection_has_unique_ids() {
    let (_dir, collection, input) = setup();

    // Both incoming ids collide with the existing document
    write_case(
        &input,
        "a.json",
        r#"{"id": 1, "name": "Incoming A", "steps": [
            {"type": "wait", "id": 2, "number": 1, "ms": 10}
        ]}"#,
    );
    write_case(&input, "b.json", r#"{"id": 2, "name": "Incoming B"}"#);

    execute_merge(&input, &collection, None).unwrap();

    let merged = loader::load_collection(&collection).unwrap();
    let ids = merged.used_ids();
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len());
}

#[test]
fn merge_is_idempotent_by_name() {
    let (_dir, collection, input) = setup();
    write_case(&input, "a.json", r#"{"id": 10, "name": "Incoming"}"#);

    execute_merge(&input, &collection, None).unwrap();
    execute_merge(&input, &collection, None).unwrap();

    let merged = loader::load_collection(&collection).unwrap();
    let root = &merged.test_case_collection[0];
    assert_eq!(root.items.len(), 2);
    let names: HashSet<_> = root.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, HashSet::from(["Existing case", "Incoming"]));
}

#[test]
fn items_end_up_sorted_by_ordering() {
    let (_dir, collection, input) = setup();
    write_case(&input, "a.json", r#"{"id": 10, "name": "A", "ordering": 30}"#);
    write_case(&input, "b.json", r#"{"id": 11, "name": "B", "ordering": 10}"#);

    execute_merge(&input, &collection, None).unwrap();

    let merged = loader::load_collection(&collection).unwrap();
    let orderings: Vec<i64> = merged.test_case_collection[0]
        .items
        .iter()
        .map(|c| c.ordering)
        .collect();
    // Existing case carries ordering 20
    assert_eq!(orderings, vec![10, 20, 30]);
}

#[test]
fn folder_tag_places_case_in_named_folder() {
    let (_dir, collection, input) = setup();
    write_case(
        &input,
        "a.json",
        r#"{"id": 10, "name": "Smoke case", "folder": "Smoke"}"#,
    );

    execute_merge(&input, &collection, None).unwrap();
    execute_merge(&input, &collection, None).unwrap();

    let merged = loader::load_collection(&collection).unwrap();
    let root = &merged.test_case_collection[0];
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].name, "Smoke");
    assert_eq!(root.children[0].items.len(), 1);
}

#[test]
fn explicit_output_leaves_source_collection_untouched() {
    let (dir, collection, input) = setup();
    write_case(&input, "a.json", r#"{"id": 10, "name": "Incoming"}"#);

    let output = dir.path().join("merged.json");
    execute_merge(&input, &collection, Some(&output)).unwrap();

    let source = loader::load_collection(&collection).unwrap();
    assert_eq!(source.test_case_collection[0].items.len(), 1);

    let merged = loader::load_collection(&output).unwrap();
    assert_eq!(merged.test_case_collection[0].items.len(), 2);
}

#[test]
fn merge_with_empty_input_dir_is_an_error() {
    let (_dir, collection, input) = setup();
    let result = execute_merge(&input, &collection, None);
    assert!(result.is_err());
}
