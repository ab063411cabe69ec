use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A human-authored test scenario, the YAML-facing input of forward
/// conversion and the output of reverse conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDoc {
    /// Scenario name, used as the test case name in the target collection
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Priority in the range 1 (highest) to 4 (lowest)
    #[serde(default = "default_priority")]
    pub priority: u8,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Path to the Apidog collection the scenario converts against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_collection: Option<String>,

    /// Target folder inside the merged collection (root level when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    /// Position within the target folder, ascending
    #[serde(default)]
    pub ordering: i64,

    #[serde(default)]
    pub options: RunSettings,

    /// Named rows of interchangeable input data, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub datasets: IndexMap<String, String>,

    pub steps: Vec<Step>,
}

/// Execution settings shared by scenarios and converted test cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSettings {
    #[serde(default = "default_one")]
    pub iterations: u32,

    #[serde(default = "default_one")]
    pub threads: u32,

    #[serde(default)]
    pub on_error: OnError,

    /// Delay between steps in milliseconds
    #[serde(default)]
    pub delay: u64,

    #[serde(default)]
    pub report_detail: ReportDetail,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<i64>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            iterations: 1,
            threads: 1,
            on_error: OnError::default(),
            delay: 0,
            report_detail: ReportDetail::default(),
            environment_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnError {
    #[default]
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportDetail {
    #[default]
    All,
    Failed,
}

/// A single scenario step, dispatched on the `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Step {
    Http(HttpStep),
    TestCaseRef(TestCaseRefStep),
    Delay(DelayStep),
    Script(ScriptStep),
    If(IfStep),
    Else(ElseStep),
    Link(LinkStep),
}

impl Step {
    /// Caller-assigned ordinal, unique within the containing sequence
    pub fn number(&self) -> i64 {
        match self {
            Step::Http(s) => s.number,
            Step::TestCaseRef(s) => s.number,
            Step::Delay(s) => s.number,
            Step::Script(s) => s.number,
            Step::If(s) => s.number,
            Step::Else(s) => s.number,
            Step::Link(s) => s.number,
        }
    }
}

/// An HTTP request step referencing an endpoint by name and/or method+path,
/// with optional overrides on top of the declared endpoint definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpStep {
    pub number: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable: bool,

    /// Endpoint name, optionally folder-qualified as "Folder/Name"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Parameter overrides by location; a null value deletes the parameter
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub query: IndexMap<String, Option<String>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub path_params: IndexMap<String, Option<String>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Option<String>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub cookies: IndexMap<String, Option<String>>,

    /// Raw request body override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Multipart form field overrides
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub form: IndexMap<String, Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    /// Pre-request script snippets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre: Vec<String>,

    /// Post-request script snippets, appended after assertions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertions: Vec<Assertion>,

    /// When false, the converted step skips response schema validation
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub validate_response: bool,
}

/// A step that invokes another test case by name or id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseRefStep {
    pub number: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable: bool,

    /// Target test case name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Target test case id, preferred over the name when both are given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayStep {
    pub number: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable: bool,

    /// Wait duration in milliseconds
    pub ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStep {
    pub number: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable: bool,

    pub code: String,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub enabled: bool,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub default_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfStep {
    pub number: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable: bool,

    pub condition: Condition,

    pub steps: Vec<Step>,
}

/// The "otherwise" branch of the nearest preceding `if` at the same level.
/// Converted as a second `if` guarded by the inverted condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElseStep {
    pub number: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable: bool,

    pub steps: Vec<Step>,
}

/// A step that splices another test case's steps inline at conversion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStep {
    pub number: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable: bool,

    /// Target test case name
    pub target: String,

    /// Splice a single step located by number instead of the whole sequence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_number: Option<i64>,

    /// Query overrides applied to the spliced copy only
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub query: IndexMap<String, Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub variable: String,
    pub operator: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    /// What to check, e.g. "$.status" or "responseTime"
    pub target: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    #[serde(rename = "type")]
    pub auth_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ScenarioDoc {
    /// Validate the scenario document
    pub fn validate(&self) -> Result<(), crate::error::ApidogError> {
        if self.name.trim().is_empty() {
            return Err(crate::error::ApidogError::ValidationError(
                "Scenario name must not be empty".to_string(),
            ));
        }

        if !(1..=4).contains(&self.priority) {
            return Err(crate::error::ApidogError::ValidationError(format!(
                "Priority must be between 1 and 4, got {}",
                self.priority
            )));
        }

        validate_step_numbers(&self.steps)?;

        Ok(())
    }
}

/// Check that step numbers are unique within each sequence, recursing into
/// nested if/else children. Numbers need not be contiguous.
fn validate_step_numbers(steps: &[Step]) -> Result<(), crate::error::ApidogError> {
    let mut seen = HashSet::new();
    for step in steps {
        if !seen.insert(step.number()) {
            return Err(crate::error::ApidogError::ValidationError(format!(
                "Duplicate step number {} in sequence",
                step.number()
            )));
        }
        match step {
            Step::If(s) => validate_step_numbers(&s.steps)?,
            Step::Else(s) => validate_step_numbers(&s.steps)?,
            _ => {}
        }
    }
    Ok(())
}

fn default_priority() -> u8 {
    2
}

fn default_one() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_true(v: &bool) -> bool {
    *v
}
