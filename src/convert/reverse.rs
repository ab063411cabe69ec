//! Reverse conversion: Apidog test case back to a scenario document.
//!
//! The structural inverse of the forward pass, for round-tripping edits
//! made directly in the external tool. Overrides are recovered by diffing
//! step parameters against the original endpoint definition when an index
//! is available; without one, every parameter is kept as an override.
//! Output is not byte-identical to the forward input (generated ids and
//! defaults differ) but preserves every step, override and processor.

use crate::convert::Diagnostic;
use crate::index::{ApiIndex, CaseIndex};
use crate::models::{
    Assertion, CaseStep, DelayStep, HttpCaseStep, HttpStep, IfStep, Parameter, ProcessorData,
    RequestBody, ScenarioDoc, ScriptStep, Step, TestCase, TestCaseRefStep,
};
use indexmap::IndexMap;
use tracing::debug;

pub struct ReverseConverter<'a> {
    apis: Option<&'a ApiIndex>,
    cases: Option<&'a CaseIndex>,
}

/// A recovered scenario document together with the soft diagnostics
/// collected on the way.
#[derive(Debug)]
pub struct ReverseOutcome {
    pub scenario: ScenarioDoc,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> ReverseConverter<'a> {
    pub fn new(apis: Option<&'a ApiIndex>, cases: Option<&'a CaseIndex>) -> Self {
        Self { apis, cases }
    }

    /// Convert a test case back into the scenario document shape
    pub fn convert(&self, case: &TestCase) -> ReverseOutcome {
        let mut diagnostics = Vec::new();
        let steps = self.convert_steps(&case.steps, &mut diagnostics);

        let datasets = case
            .datasets
            .iter()
            .map(|dataset| {
                let data = dataset
                    .rows
                    .first()
                    .map(|row| row.data.strip_suffix('\n').unwrap_or(&row.data).to_string())
                    .unwrap_or_default();
                (dataset.name.clone(), data)
            })
            .collect();

        debug!(case = %case.name, steps = case.steps.len(), "reversed test case");

        ReverseOutcome {
            scenario: ScenarioDoc {
                name: case.name.clone(),
                description: case.description.clone(),
                priority: case.priority,
                tags: case.tags.clone(),
                api_collection: None,
                folder: case.folder.clone(),
                ordering: case.ordering,
                options: case.settings.clone(),
                datasets,
                steps,
            },
            diagnostics,
        }
    }

    fn convert_steps(&self, steps: &[CaseStep], diagnostics: &mut Vec<Diagnostic>) -> Vec<Step> {
        steps
            .iter()
            .map(|step| match step {
                CaseStep::Http(s) => Step::Http(self.convert_http(s)),

                CaseStep::TestCase(s) => {
                    let resolved = self
                        .cases
                        .and_then(|index| index.find_by_id(s.target_id))
                        .map(|case| case.name.clone());
                    // Unresolvable ids are kept as raw targetId references
                    let (target, target_id) = match resolved {
                        Some(name) => (Some(name), None),
                        None => {
                            if self.cases.is_some() {
                                diagnostics.push(
                                    Diagnostic::new(format!(
                                        "Test case id {} not found, keeping raw id",
                                        s.target_id
                                    ))
                                    .with_step(s.number),
                                );
                            }
                            (None, Some(s.target_id))
                        }
                    };
                    Step::TestCaseRef(TestCaseRefStep {
                        number: s.number,
                        name: s.name.clone(),
                        disable: s.disabled,
                        target,
                        target_id,
                    })
                }

                CaseStep::Wait(s) => Step::Delay(DelayStep {
                    number: s.number,
                    name: s.name.clone(),
                    disable: s.disabled,
                    ms: s.ms,
                }),

                CaseStep::Script(s) => Step::Script(ScriptStep {
                    number: s.number,
                    name: s.name.clone(),
                    disable: s.disabled,
                    code: to_lf(&s.code),
                    enabled: s.enabled,
                    default_enabled: s.default_enabled,
                }),

                // Inverted else branches come back as plain if steps; the
                // original if/else pairing is not reconstructed.
                CaseStep::If(s) => Step::If(IfStep {
                    number: s.number,
                    name: s.name.clone(),
                    disable: s.disabled,
                    condition: s.condition.clone(),
                    steps: self.convert_steps(&s.children, diagnostics),
                }),
            })
            .collect()
    }

    fn convert_http(&self, step: &HttpCaseStep) -> HttpStep {
        let api = self
            .apis
            .and_then(|index| index.find_by_method_and_path(Some(&step.method), &step.path));

        let (query, path_params, headers, cookies) = match api {
            Some(api) => (
                diff_params(&api.parameters.query, &step.parameters.query, false),
                diff_params(&api.parameters.path, &step.parameters.path, false),
                diff_params(&api.parameters.header, &step.parameters.header, true),
                diff_params(&api.parameters.cookie, &step.parameters.cookie, false),
            ),
            None => (
                keep_all(&step.parameters.query),
                keep_all(&step.parameters.path),
                keep_all(&step.parameters.header),
                keep_all(&step.parameters.cookie),
            ),
        };

        let (body, form) = match &step.request_body {
            Some(RequestBody::Raw { data }) => {
                let declared = matches!(
                    api.and_then(|a| a.request_body.as_ref()),
                    Some(RequestBody::Raw { data: d }) if d == data
                );
                (if declared { None } else { Some(data.clone()) }, IndexMap::new())
            }
            Some(RequestBody::Form { fields }) => {
                let declared_fields = match api.and_then(|a| a.request_body.as_ref()) {
                    Some(RequestBody::Form { fields }) => fields.as_slice(),
                    _ => &[],
                };
                (None, diff_params(declared_fields, fields, false))
            }
            None => (None, IndexMap::new()),
        };

        let auth = match (api.and_then(|a| a.auth.as_ref()), &step.auth) {
            (Some(declared), Some(actual)) if declared == actual => None,
            _ => step.auth.clone(),
        };

        let mut pre = Vec::new();
        for processor in &step.pre_processors {
            if let ProcessorData::CustomScript { script } = &processor.data {
                pre.push(script.clone());
            }
        }

        // Assertion processors return to the dedicated field, the rest stay
        // generic post scripts
        let mut post = Vec::new();
        let mut assertions: Vec<Assertion> = Vec::new();
        for processor in &step.post_processors {
            match &processor.data {
                ProcessorData::Assertion(assertion) => assertions.push(assertion.clone()),
                ProcessorData::CustomScript { script } => post.push(script.clone()),
            }
        }

        // responseId 0 on an endpoint that declares responses means the
        // author disabled validation; without declared responses 0 is just
        // the "nothing to check" sentinel.
        let validate_response = step.response_id != 0
            || api.is_none_or(|a| a.responses.is_empty());

        HttpStep {
            number: step.number,
            name: step.name.clone(),
            disable: step.disabled,
            api: api.map(|a| a.name.clone()),
            method: Some(step.method.clone()),
            path: Some(step.path.clone()),
            query,
            path_params,
            headers,
            cookies,
            body,
            form,
            auth,
            pre,
            post,
            assertions,
            validate_response,
        }
    }
}

/// Record an override only where the step differs from the declaration: a
/// changed or added parameter becomes a value override, a declared parameter
/// missing from the step becomes a null deletion directive.
fn diff_params(
    declared: &[Parameter],
    actual: &[Parameter],
    ignore_case: bool,
) -> IndexMap<String, Option<String>> {
    let name_eq = |a: &str, b: &str| {
        if ignore_case {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    };

    let mut out = IndexMap::new();
    for param in actual {
        match declared.iter().find(|d| name_eq(&d.name, &param.name)) {
            Some(d) if d.value == param.value => {}
            _ => {
                out.insert(
                    param.name.clone(),
                    Some(param.value.clone().unwrap_or_default()),
                );
            }
        }
    }
    for d in declared {
        if !actual.iter().any(|p| name_eq(&p.name, &d.name)) {
            out.insert(d.name.clone(), None);
        }
    }
    out
}

/// No definition to diff against: every parameter is a custom addition
fn keep_all(params: &[Parameter]) -> IndexMap<String, Option<String>> {
    params
        .iter()
        .map(|p| (p.name.clone(), Some(p.value.clone().unwrap_or_default())))
        .collect()
}

fn to_lf(code: &str) -> String {
    code.replace("\r\n", "\n")
}
