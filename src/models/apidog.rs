use super::scenario::{AuthConfig, Condition, RunSettings};
use serde::{Deserialize, Serialize};

/// An exported Apidog collection: a folder tree of endpoint definitions and
/// a parallel folder tree of test cases. The test-case tree is the merge
/// target; the endpoint tree is consumed read-only by the indexes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApidogCollection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_collection: Vec<Folder<ApiDefinition>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_case_collection: Vec<Folder<TestCase>>,
}

/// A named grouping holding its own ordered items and sub-folders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder<T> {
    pub name: String,

    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Folder<T>>,

    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<T>,
}

impl<T> Folder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            items: Vec::new(),
        }
    }
}

/// One API operation sourced from the endpoint tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDefinition {
    pub id: i64,
    pub name: String,
    pub method: String,
    pub path: String,

    #[serde(default)]
    pub parameters: ParameterSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<ApiResponse>,
}

/// Declared parameters grouped by location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cookie: Vec<Parameter>,
}

impl ParameterSet {
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.path.is_empty()
            && self.header.is_empty()
            && self.cookie.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            required: false,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RequestBody {
    /// Raw payload, typically JSON text
    Raw { data: String },
    /// Multipart form fields
    Form { fields: Vec<Parameter> },
}

/// A declared response; its id is the "response id" used for schema checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub id: i64,
    pub code: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<serde_json::Value>,
}

/// The JSON Test Case consumed by Apidog: output of forward conversion,
/// input of reverse conversion and merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: i64,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default = "default_priority")]
    pub priority: u8,

    /// Sort key within the containing folder, ascending
    #[serde(default)]
    pub ordering: i64,

    /// Target folder inside the merged collection (root level when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub settings: RunSettings,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<CaseStep>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<Dataset>,
}

/// A converted step in the target schema, dispatched on the `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CaseStep {
    Http(HttpCaseStep),
    TestCase(RefCaseStep),
    Wait(WaitCaseStep),
    Script(ScriptCaseStep),
    If(IfCaseStep),
}

impl CaseStep {
    pub fn id(&self) -> i64 {
        match self {
            CaseStep::Http(s) => s.id,
            CaseStep::TestCase(s) => s.id,
            CaseStep::Wait(s) => s.id,
            CaseStep::Script(s) => s.id,
            CaseStep::If(s) => s.id,
        }
    }

    pub fn number(&self) -> i64 {
        match self {
            CaseStep::Http(s) => s.number,
            CaseStep::TestCase(s) => s.number,
            CaseStep::Wait(s) => s.number,
            CaseStep::Script(s) => s.number,
            CaseStep::If(s) => s.number,
        }
    }

    pub fn set_number(&mut self, number: i64) {
        match self {
            CaseStep::Http(s) => s.number = number,
            CaseStep::TestCase(s) => s.number = number,
            CaseStep::Wait(s) => s.number = number,
            CaseStep::Script(s) => s.number = number,
            CaseStep::If(s) => s.number = number,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpCaseStep {
    pub id: i64,
    pub number: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,

    pub method: String,
    pub path: String,

    #[serde(default, skip_serializing_if = "ParameterSet::is_empty")]
    pub parameters: ParameterSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_processors: Vec<Processor>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_processors: Vec<Processor>,

    /// Id of the declared response used for schema validation; 0 disables it
    #[serde(default)]
    pub response_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefCaseStep {
    pub id: i64,
    pub number: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,

    /// Resolved numeric id of the referenced test case
    pub target_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitCaseStep {
    pub id: i64,
    pub number: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,

    pub ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptCaseStep {
    pub id: i64,
    pub number: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,

    /// Script body with CRLF line endings (target tool convention)
    pub code: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub default_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfCaseStep {
    pub id: i64,
    pub number: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,

    pub condition: Condition,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CaseStep>,
}

/// A pre- or post-request hook attached to an HTTP step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Processor {
    pub id: i64,

    #[serde(flatten)]
    pub data: ProcessorData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProcessorData {
    Assertion(super::scenario::Assertion),
    CustomScript { script: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: i64,
    pub name: String,
    pub test_case_id: i64,
    pub rows: Vec<DatasetRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRow {
    pub id: i64,
    /// Raw data payload with a trailing newline
    pub data: String,
}

// --- Id visitor ---------------------------------------------------------
//
// The merger needs every numeric `id` in a document, and id reassignment
// must touch exactly those fields. Walking the declared schema keeps the
// visitor away from unrelated numeric fields (`number`, `targetId`,
// `responseId` are references or ordinals, not identifiers owned by the
// document).

impl ApidogCollection {
    /// Every id currently present anywhere in the collection
    pub fn used_ids(&self) -> Vec<i64> {
        let mut ids = Vec::new();
        for folder in &self.api_collection {
            visit_api_folder(folder, &mut |id| ids.push(id));
        }
        for folder in &self.test_case_collection {
            visit_case_folder(folder, &mut |id| ids.push(id));
        }
        ids
    }
}

fn visit_api_folder(folder: &Folder<ApiDefinition>, f: &mut impl FnMut(i64)) {
    for api in &folder.items {
        f(api.id);
        for response in &api.responses {
            f(response.id);
        }
    }
    for child in &folder.children {
        visit_api_folder(child, f);
    }
}

fn visit_case_folder(folder: &Folder<TestCase>, f: &mut impl FnMut(i64)) {
    for case in &folder.items {
        case.visit_ids(f);
    }
    for child in &folder.children {
        visit_case_folder(child, f);
    }
}

impl TestCase {
    pub fn visit_ids(&self, f: &mut impl FnMut(i64)) {
        f(self.id);
        for step in &self.steps {
            step.visit_ids(f);
        }
        for dataset in &self.datasets {
            f(dataset.id);
            for row in &dataset.rows {
                f(row.id);
            }
        }
    }

    pub fn remap_ids(&mut self, f: &mut impl FnMut(i64) -> i64) {
        self.id = f(self.id);
        for step in &mut self.steps {
            step.remap_ids(f);
        }
        for dataset in &mut self.datasets {
            dataset.id = f(dataset.id);
            dataset.test_case_id = f(dataset.test_case_id);
            for row in &mut dataset.rows {
                row.id = f(row.id);
            }
        }
    }
}

impl CaseStep {
    pub fn visit_ids(&self, f: &mut impl FnMut(i64)) {
        f(self.id());
        match self {
            CaseStep::Http(s) => {
                for processor in s.pre_processors.iter().chain(&s.post_processors) {
                    f(processor.id);
                }
            }
            CaseStep::If(s) => {
                for child in &s.children {
                    child.visit_ids(f);
                }
            }
            _ => {}
        }
    }

    pub fn remap_ids(&mut self, f: &mut impl FnMut(i64) -> i64) {
        match self {
            CaseStep::Http(s) => {
                s.id = f(s.id);
                for processor in s.pre_processors.iter_mut().chain(&mut s.post_processors) {
                    processor.id = f(processor.id);
                }
            }
            CaseStep::TestCase(s) => s.id = f(s.id),
            CaseStep::Wait(s) => s.id = f(s.id),
            CaseStep::Script(s) => s.id = f(s.id),
            CaseStep::If(s) => {
                s.id = f(s.id);
                for child in &mut s.children {
                    child.remap_ids(f);
                }
            }
        }
    }
}

fn default_priority() -> u8 {
    2
}

fn default_true() -> bool {
    true
}
