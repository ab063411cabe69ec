use crate::error::{ApidogError, Result};
use oas3::OpenApiV3Spec;
use std::fs;
use std::path::Path;

/// Load an OpenAPI specification from a JSON or YAML file
pub fn load_openapi<P: AsRef<Path>>(path: P) -> Result<OpenApiV3Spec> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        ApidogError::OpenApiLoadError(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    // YAML parser accepts JSON input too
    let spec: OpenApiV3Spec = serde_yaml::from_str(&content).map_err(|e| {
        ApidogError::OpenApiLoadError(format!("Failed to parse OpenAPI document: {}", e))
    })?;

    validate_openapi(&spec)?;

    Ok(spec)
}

fn validate_openapi(spec: &OpenApiV3Spec) -> Result<()> {
    if !spec.openapi.starts_with("3.0") && !spec.openapi.starts_with("3.1") {
        return Err(ApidogError::ValidationError(format!(
            "Unsupported OpenAPI version: {}. Only 3.0.x and 3.1.x are supported.",
            spec.openapi
        )));
    }

    if spec.paths.as_ref().is_none_or(|p| p.is_empty()) {
        return Err(ApidogError::ValidationError(
            "OpenAPI spec must have at least one path".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_openapi_yaml() {
        let yaml = r#"
openapi: 3.0.0
info:
  title: Test API
  version: 1.0.0
paths:
  /users:
    get:
      operationId: listUsers
      responses:
        '200':
          description: OK
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let spec = load_openapi(file.path()).unwrap();
        assert_eq!(spec.info.title, "Test API");
    }

    #[test]
    fn test_load_valid_openapi_json() {
        let json = r#"{
            "openapi": "3.0.0",
            "info": {"title": "Test API", "version": "1.0.0"},
            "paths": {
                "/users": {
                    "get": {
                        "operationId": "listUsers",
                        "responses": {"200": {"description": "OK"}}
                    }
                }
            }
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let result = load_openapi(file.path());
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_unsupported_version() {
        let yaml = r#"
openapi: 2.0.0
info:
  title: Test API
  version: 1.0.0
paths:
  /users:
    get:
      responses:
        '200':
          description: OK
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let result = load_openapi(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_no_paths() {
        let yaml = r#"
openapi: 3.0.0
info:
  title: Test API
  version: 1.0.0
paths: {}
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let result = load_openapi(file.path());
        assert!(result.is_err());
    }
}
