//! Coverage comparison between an OpenAPI specification and a set of
//! scenario documents: which declared endpoints no scenario exercises.
//!
//! A set-difference over two flat collections, keyed by normalized
//! method+path pairs. Endpoint references inside scenarios are taken from
//! literal http steps (recursing into if/else children) and, when an
//! endpoint index is supplied, from named endpoint references too.

use crate::index::ApiIndex;
use crate::models::{ScenarioDoc, Step};
use oas3::OpenApiV3Spec;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// One declared API operation from the specification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRef {
    pub method: String,
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Untested endpoints grouped under one tag.
#[derive(Debug, Serialize)]
pub struct TagGroup {
    pub tag: String,
    pub endpoints: Vec<EndpointRef>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub total: usize,
    pub tested: usize,
    pub coverage_percent: f64,
    pub untested: Vec<TagGroup>,
}

/// Compare declared endpoints against the paths the scenarios exercise
pub fn compare(
    spec: &OpenApiV3Spec,
    scenarios: &[ScenarioDoc],
    apis: Option<&ApiIndex>,
) -> CoverageReport {
    let endpoints = list_endpoints(spec);
    let tested = tested_paths(scenarios, apis);

    let total = endpoints.len();
    let mut tested_count = 0usize;
    let mut groups: BTreeMap<String, Vec<EndpointRef>> = BTreeMap::new();

    for endpoint in endpoints {
        let key = normalize_key(&endpoint.method, &endpoint.path);
        if tested.contains(&key) {
            tested_count += 1;
        } else {
            let tag = endpoint
                .tags
                .first()
                .cloned()
                .unwrap_or_else(|| "untagged".to_string());
            groups.entry(tag).or_default().push(endpoint);
        }
    }

    let coverage_percent = if total == 0 {
        100.0
    } else {
        tested_count as f64 / total as f64 * 100.0
    };

    CoverageReport {
        total,
        tested: tested_count,
        coverage_percent,
        untested: groups
            .into_iter()
            .map(|(tag, endpoints)| TagGroup { tag, endpoints })
            .collect(),
    }
}

/// Every operation declared in the specification, in path order
pub fn list_endpoints(spec: &OpenApiV3Spec) -> Vec<EndpointRef> {
    let mut endpoints = Vec::new();

    let Some(paths) = &spec.paths else {
        return endpoints;
    };

    for (path, item) in paths.iter() {
        let operations = [
            ("GET", &item.get),
            ("POST", &item.post),
            ("PUT", &item.put),
            ("DELETE", &item.delete),
            ("PATCH", &item.patch),
            ("OPTIONS", &item.options),
            ("HEAD", &item.head),
            ("TRACE", &item.trace),
        ];

        for (method, operation) in operations {
            if let Some(op) = operation {
                endpoints.push(EndpointRef {
                    method: method.to_string(),
                    path: path.clone(),
                    operation_id: op.operation_id.clone(),
                    tags: op.tags.clone(),
                });
            }
        }
    }

    endpoints
}

/// The set of normalized method+path keys the scenarios reference
pub fn tested_paths(
    scenarios: &[ScenarioDoc],
    apis: Option<&ApiIndex>,
) -> HashSet<(String, String)> {
    let mut tested = HashSet::new();
    for scenario in scenarios {
        collect_steps(&scenario.steps, apis, &mut tested);
    }
    tested
}

fn collect_steps(
    steps: &[Step],
    apis: Option<&ApiIndex>,
    tested: &mut HashSet<(String, String)>,
) {
    for step in steps {
        match step {
            Step::Http(s) => {
                if let Some(path) = &s.path {
                    let method = s.method.as_deref().unwrap_or("GET");
                    tested.insert(normalize_key(method, path));
                } else if let Some(name) = &s.api
                    && let Some(index) = apis
                    && let Some(api) = index
                        .find_by_name_and_path(name, None, s.method.as_deref(), None)
                        .resolved()
                {
                    tested.insert(normalize_key(&api.method, &api.path));
                }
            }
            Step::If(s) => collect_steps(&s.steps, apis, tested),
            Step::Else(s) => collect_steps(&s.steps, apis, tested),
            _ => {}
        }
    }
}

/// Normalize a method+path pair so spec and scenario spellings compare
/// equal: method uppercased, leading slash enforced, trailing slash
/// stripped, `:param` segments rewritten to `{param}`.
pub fn normalize_key(method: &str, path: &str) -> (String, String) {
    let mut path = path.trim().to_string();
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    let path = path
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) if !name.is_empty() => format!("{{{}}}", name),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/");

    (method.to_uppercase(), path)
}
