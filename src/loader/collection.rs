use crate::error::{ApidogError, Result};
use crate::models::{ApidogCollection, TestCase};
use std::fs;
use std::path::Path;

/// Load an Apidog collection (endpoint tree + test-case tree) from JSON
pub fn load_collection<P: AsRef<Path>>(path: P) -> Result<ApidogCollection> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        ApidogError::CollectionLoadError(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    let collection: ApidogCollection = serde_json::from_str(&content).map_err(|e| {
        ApidogError::CollectionLoadError(format!("Failed to parse collection JSON: {}", e))
    })?;

    Ok(collection)
}

/// Save an Apidog collection to a JSON file
pub fn save_collection<P: AsRef<Path>>(path: P, collection: &ApidogCollection) -> Result<()> {
    let path = path.as_ref();

    let json = serde_json::to_string_pretty(collection)?;

    fs::write(path, json).map_err(|e| {
        ApidogError::CollectionLoadError(format!("Failed to write file {}: {}", path.display(), e))
    })?;

    Ok(())
}

/// Load a single converted test case from JSON
pub fn load_test_case<P: AsRef<Path>>(path: P) -> Result<TestCase> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        ApidogError::TestCaseLoadError(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    let case: TestCase = serde_json::from_str(&content).map_err(|e| {
        ApidogError::TestCaseLoadError(format!("Failed to parse test case JSON: {}", e))
    })?;

    Ok(case)
}

/// Save a single converted test case to a JSON file
pub fn save_test_case<P: AsRef<Path>>(path: P, case: &TestCase) -> Result<()> {
    let path = path.as_ref();

    let json = serde_json::to_string_pretty(case)?;

    fs::write(path, json).map_err(|e| {
        ApidogError::TestCaseLoadError(format!("Failed to write file {}: {}", path.display(), e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_collection_with_both_trees() {
        let json = r#"{
            "apiCollection": [{
                "name": "APIs",
                "items": [{
                    "id": 1,
                    "name": "List Users",
                    "method": "GET",
                    "path": "/users"
                }]
            }],
            "testCaseCollection": [{
                "name": "Cases",
                "items": [{"id": 5, "name": "Smoke"}]
            }]
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let collection = load_collection(file.path()).unwrap();
        assert_eq!(collection.api_collection[0].items[0].path, "/users");
        assert_eq!(collection.test_case_collection[0].items[0].name, "Smoke");
    }

    #[test]
    fn test_load_collection_rejects_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();

        let result = load_collection(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_reload_collection() {
        let collection = ApidogCollection::default();
        let file = NamedTempFile::new().unwrap();

        save_collection(file.path(), &collection).unwrap();
        let reloaded = load_collection(file.path()).unwrap();
        assert!(reloaded.test_case_collection.is_empty());
    }

    #[test]
    fn test_load_nonexistent_test_case() {
        let result = load_test_case("/nonexistent/case.json");
        assert!(result.is_err());
    }
}
