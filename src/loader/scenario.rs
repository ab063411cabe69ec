use crate::error::{ApidogError, Result};
use crate::models::ScenarioDoc;
use std::fs;
use std::path::Path;

/// Load a scenario document from a YAML file
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioDoc> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        ApidogError::ScenarioLoadError(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    let doc: ScenarioDoc = serde_yaml::from_str(&content).map_err(|e| {
        ApidogError::ScenarioLoadError(format!("Failed to parse scenario YAML: {}", e))
    })?;

    doc.validate()?;

    Ok(doc)
}

/// Save a scenario document to a YAML file
pub fn save_scenario<P: AsRef<Path>>(path: P, doc: &ScenarioDoc) -> Result<()> {
    let path = path.as_ref();

    doc.validate()?;

    let yaml = serde_yaml::to_string(doc).map_err(|e| {
        ApidogError::ScenarioLoadError(format!("Failed to serialize scenario to YAML: {}", e))
    })?;

    fs::write(path, yaml).map_err(|e| {
        ApidogError::ScenarioLoadError(format!("Failed to write file {}: {}", path.display(), e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_scenario() {
        let yaml = r#"
name: Create order
priority: 1
tags: [orders]
steps:
  - type: http
    number: 1
    api: Create Order
    body: '{"sku": "A-1"}'
  - type: delay
    number: 2
    ms: 250
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let result = load_scenario(file.path());
        assert!(result.is_ok());

        let doc = result.unwrap();
        assert_eq!(doc.name, "Create order");
        assert_eq!(doc.steps.len(), 2);
    }

    #[test]
    fn test_load_invalid_priority() {
        let yaml = r#"
name: Broken
priority: 7
steps: []
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let result = load_scenario(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_scenario("/nonexistent/scenario.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let yaml = r#"
name: Saved
steps:
  - type: delay
    number: 1
    ms: 10
"#;
        let mut input = NamedTempFile::new().unwrap();
        input.write_all(yaml.as_bytes()).unwrap();
        let doc = load_scenario(input.path()).unwrap();

        let output = NamedTempFile::new().unwrap();
        save_scenario(output.path(), &doc).unwrap();

        let reloaded = load_scenario(output.path()).unwrap();
        assert_eq!(reloaded.name, "Saved");
        assert_eq!(reloaded.steps.len(), 1);
    }
}
