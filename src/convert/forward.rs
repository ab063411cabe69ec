//! Forward conversion: scenario document to Apidog test case.
//!
//! Resolves step types, parameter overrides, processor chains and
//! inter-scenario references against the endpoint and test-case indexes.
//! Unresolvable lookups are soft: the converter records a diagnostic and
//! falls back (literal step, placeholder id, skipped link) instead of
//! aborting the whole document.

use crate::convert::{Diagnostic, IdAllocator, invert_operator};
use crate::error::{ApidogError, Result};
use crate::index::{ApiIndex, CaseIndex, NameLookup};
use crate::models::{
    ApiDefinition, CaseStep, Condition, Dataset, DatasetRow, HttpCaseStep, HttpStep, IfCaseStep,
    Parameter, ProcessorData, Processor, RefCaseStep, RequestBody, ScenarioDoc, ScriptCaseStep,
    Step, TestCase, WaitCaseStep,
};
use indexmap::IndexMap;
use tracing::debug;

pub struct ForwardConverter<'a> {
    apis: &'a ApiIndex,
    cases: &'a CaseIndex,
}

/// A converted test case together with the soft diagnostics collected on
/// the way.
#[derive(Debug)]
pub struct ConvertOutcome {
    pub test_case: TestCase,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> ForwardConverter<'a> {
    pub fn new(apis: &'a ApiIndex, cases: &'a CaseIndex) -> Self {
        Self { apis, cases }
    }

    /// Convert a scenario document into the target test-case shape
    pub fn convert(&self, doc: &ScenarioDoc, ids: &mut IdAllocator) -> Result<ConvertOutcome> {
        doc.validate()?;

        let mut diagnostics = Vec::new();
        let case_id = ids.mint();

        let steps = self.convert_steps(&doc.steps, ids, &mut diagnostics)?;

        let datasets = doc
            .datasets
            .iter()
            .map(|(name, data)| Dataset {
                id: ids.mint(),
                name: name.clone(),
                test_case_id: case_id,
                rows: vec![DatasetRow {
                    id: ids.mint(),
                    data: ensure_trailing_newline(data),
                }],
            })
            .collect();

        debug!(scenario = %doc.name, steps = doc.steps.len(), "converted scenario");

        Ok(ConvertOutcome {
            test_case: TestCase {
                id: case_id,
                name: doc.name.clone(),
                description: doc.description.clone(),
                priority: doc.priority,
                ordering: doc.ordering,
                folder: doc.folder.clone(),
                tags: doc.tags.clone(),
                settings: doc.options.clone(),
                steps,
                datasets,
            },
            diagnostics,
        })
    }

    fn convert_steps(
        &self,
        steps: &[Step],
        ids: &mut IdAllocator,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<CaseStep>> {
        let mut out = Vec::with_capacity(steps.len());
        // Condition of the nearest preceding `if` at this level, for `else`
        let mut last_condition: Option<Condition> = None;

        for step in steps {
            match step {
                Step::Http(h) => out.push(self.convert_http(h, ids, diagnostics)),

                Step::TestCaseRef(r) => {
                    let resolved = r
                        .target_id
                        .and_then(|id| self.cases.find_by_id(id))
                        .or_else(|| {
                            r.target.as_deref().and_then(|n| self.cases.find_by_name(n))
                        });

                    let target_id = match resolved {
                        Some(case) => case.id,
                        None => {
                            let placeholder = ids.mint();
                            let target = r
                                .target
                                .clone()
                                .or(r.target_id.map(|id| id.to_string()))
                                .unwrap_or_else(|| "<unspecified>".to_string());
                            diagnostics.push(
                                Diagnostic::new(format!(
                                    "Test case '{}' not found, emitting placeholder id {}",
                                    target, placeholder
                                ))
                                .with_step(r.number),
                            );
                            placeholder
                        }
                    };

                    out.push(CaseStep::TestCase(RefCaseStep {
                        id: ids.mint(),
                        number: r.number,
                        name: r.name.clone(),
                        disabled: r.disable,
                        target_id,
                    }));
                }

                Step::Delay(d) => out.push(CaseStep::Wait(WaitCaseStep {
                    id: ids.mint(),
                    number: d.number,
                    name: d.name.clone(),
                    disabled: d.disable,
                    ms: d.ms,
                })),

                Step::Script(s) => out.push(CaseStep::Script(ScriptCaseStep {
                    id: ids.mint(),
                    number: s.number,
                    name: s.name.clone(),
                    disabled: s.disable,
                    code: to_crlf(&s.code),
                    enabled: s.enabled,
                    default_enabled: s.default_enabled,
                })),

                Step::If(i) => {
                    let children = self.convert_steps(&i.steps, ids, diagnostics)?;
                    last_condition = Some(i.condition.clone());
                    out.push(CaseStep::If(IfCaseStep {
                        id: ids.mint(),
                        number: i.number,
                        name: i.name.clone(),
                        disabled: i.disable,
                        condition: i.condition.clone(),
                        children,
                    }));
                }

                Step::Else(e) => {
                    let Some(condition) = &last_condition else {
                        diagnostics.push(
                            Diagnostic::new("else step has no preceding if, step skipped")
                                .with_step(e.number),
                        );
                        continue;
                    };

                    let operator = match invert_operator(&condition.operator) {
                        Some(op) => op.to_string(),
                        None => {
                            diagnostics.push(
                                Diagnostic::new(format!(
                                    "Unknown operator '{}' on if condition, else falls back to notEqual",
                                    condition.operator
                                ))
                                .with_step(e.number),
                            );
                            "notEqual".to_string()
                        }
                    };

                    let children = self.convert_steps(&e.steps, ids, diagnostics)?;
                    out.push(CaseStep::If(IfCaseStep {
                        id: ids.mint(),
                        number: e.number,
                        name: e.name.clone(),
                        disabled: e.disable,
                        condition: Condition {
                            variable: condition.variable.clone(),
                            operator,
                            value: condition.value.clone(),
                        },
                        children,
                    }));
                }

                Step::Link(l) => {
                    let Some(case) = self.cases.find_by_name(&l.target) else {
                        diagnostics.push(
                            Diagnostic::new(format!(
                                "Link target '{}' not found, step skipped",
                                l.target
                            ))
                            .with_step(l.number),
                        );
                        continue;
                    };

                    if let Some(wanted) = l.step_number {
                        // A resolved target with a missing step number is a
                        // hard lookup failure, unlike the unresolved target
                        // above.
                        let Some(found) = find_step_by_number(&case.steps, wanted) else {
                            return Err(ApidogError::StepLookupError(format!(
                                "Step {} not found in test case '{}'",
                                wanted, l.target
                            )));
                        };
                        let mut copy = found.clone();
                        copy.set_number(l.number);
                        copy.remap_ids(&mut |_| ids.mint());
                        apply_link_query(&mut copy, &l.query);
                        out.push(copy);
                    } else {
                        for source in &case.steps {
                            let mut copy = source.clone();
                            copy.remap_ids(&mut |_| ids.mint());
                            apply_link_query(&mut copy, &l.query);
                            out.push(copy);
                        }
                    }
                }
            }
        }

        Ok(out)
    }

    fn convert_http(
        &self,
        h: &HttpStep,
        ids: &mut IdAllocator,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> CaseStep {
        let api = self.resolve_endpoint(h, diagnostics);

        let pre_processors: Vec<Processor> = h
            .pre
            .iter()
            .map(|script| Processor {
                id: ids.mint(),
                data: ProcessorData::CustomScript {
                    script: script.clone(),
                },
            })
            .collect();

        // Assertions sort before custom post scripts
        let mut post_processors: Vec<Processor> = h
            .assertions
            .iter()
            .map(|assertion| Processor {
                id: ids.mint(),
                data: ProcessorData::Assertion(assertion.clone()),
            })
            .collect();
        post_processors.extend(h.post.iter().map(|script| Processor {
            id: ids.mint(),
            data: ProcessorData::CustomScript {
                script: script.clone(),
            },
        }));

        let (method, path, parameters, request_body, auth, response_id) = match api {
            Some(api) => {
                let mut parameters = api.parameters.clone();
                apply_overrides(&mut parameters.query, &h.query, false);
                apply_overrides(&mut parameters.path, &h.path_params, false);
                apply_overrides(&mut parameters.header, &h.headers, true);
                apply_overrides(&mut parameters.cookie, &h.cookies, false);

                let request_body = if let Some(body) = &h.body {
                    Some(RequestBody::Raw { data: body.clone() })
                } else if !h.form.is_empty() {
                    let mut fields = match &api.request_body {
                        Some(RequestBody::Form { fields }) => fields.clone(),
                        _ => Vec::new(),
                    };
                    apply_overrides(&mut fields, &h.form, false);
                    Some(RequestBody::Form { fields })
                } else {
                    api.request_body.clone()
                };

                let auth = h.auth.clone().or_else(|| api.auth.clone());

                let response_id = if !h.validate_response {
                    0
                } else {
                    api.responses.first().map(|r| r.id).unwrap_or(0)
                };

                (
                    api.method.to_uppercase(),
                    api.path.clone(),
                    parameters,
                    request_body,
                    auth,
                    response_id,
                )
            }
            None => {
                // "API not found" fallback: a minimal step carrying only the
                // literal method/path/overrides from the document.
                let mut parameters = crate::models::ParameterSet::default();
                parameters.query = overrides_to_params(&h.query);
                parameters.path = overrides_to_params(&h.path_params);
                parameters.header = overrides_to_params(&h.headers);
                parameters.cookie = overrides_to_params(&h.cookies);

                let request_body = if let Some(body) = &h.body {
                    Some(RequestBody::Raw { data: body.clone() })
                } else if !h.form.is_empty() {
                    Some(RequestBody::Form {
                        fields: overrides_to_params(&h.form),
                    })
                } else {
                    None
                };

                (
                    h.method.clone().unwrap_or_else(|| "GET".to_string()).to_uppercase(),
                    h.path.clone().unwrap_or_default(),
                    parameters,
                    request_body,
                    h.auth.clone(),
                    0,
                )
            }
        };

        CaseStep::Http(HttpCaseStep {
            id: ids.mint(),
            number: h.number,
            name: h.name.clone(),
            disabled: h.disable,
            method,
            path,
            parameters,
            request_body,
            auth,
            pre_processors,
            post_processors,
            response_id,
        })
    }

    /// Endpoint resolution order: explicit path (+method) first, then name
    /// with path/method disambiguation.
    fn resolve_endpoint(
        &self,
        h: &HttpStep,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<&'a ApiDefinition> {
        if let Some(path) = h.path.as_deref()
            && let Some(api) = self.apis.find_by_method_and_path(h.method.as_deref(), path)
        {
            return Some(api);
        }

        let name = h.api.as_deref()?;
        let (folder, bare_name) = split_folder_qualified(name);

        match self.apis.find_by_name_and_path(
            bare_name,
            h.path.as_deref(),
            h.method.as_deref(),
            folder,
        ) {
            NameLookup::Unique(api) => Some(api),
            NameLookup::Ambiguous(api) => {
                diagnostics.push(
                    Diagnostic::new(format!(
                        "Endpoint name '{}' is ambiguous, using first candidate {} {}",
                        name, api.method, api.path
                    ))
                    .with_step(h.number),
                );
                Some(api)
            }
            NameLookup::NotFound => {
                diagnostics.push(
                    Diagnostic::new(format!(
                        "API '{}' not found, emitting literal step",
                        name
                    ))
                    .with_step(h.number),
                );
                None
            }
        }
    }
}

/// Split an optionally folder-qualified endpoint name ("Folder/Sub/Name")
/// into folder path and bare name.
fn split_folder_qualified(name: &str) -> (Option<&str>, &str) {
    match name.rsplit_once('/') {
        Some((folder, bare)) => (Some(folder), bare),
        None => (None, name),
    }
}

/// Apply caller overrides to a declared parameter list: update matching
/// parameters in place, append new ones, remove when the override is null.
fn apply_overrides(
    params: &mut Vec<Parameter>,
    overrides: &IndexMap<String, Option<String>>,
    ignore_case: bool,
) {
    for (name, value) in overrides {
        let matches = |p: &Parameter| {
            if ignore_case {
                p.name.eq_ignore_ascii_case(name)
            } else {
                p.name == *name
            }
        };

        match value {
            None => params.retain(|p| !matches(p)),
            Some(v) => {
                if let Some(existing) = params.iter_mut().find(|p| matches(p)) {
                    existing.value = Some(v.clone());
                } else {
                    params.push(Parameter::new(name.clone(), v.clone()));
                }
            }
        }
    }
}

/// Build a parameter list purely from overrides (the unresolved-endpoint
/// fallback); null overrides delete nothing and are dropped.
fn overrides_to_params(overrides: &IndexMap<String, Option<String>>) -> Vec<Parameter> {
    overrides
        .iter()
        .filter_map(|(name, value)| {
            value
                .as_ref()
                .map(|v| Parameter::new(name.clone(), v.clone()))
        })
        .collect()
}

/// Locate a step by number, descending into every nested child sequence
pub fn find_step_by_number(steps: &[CaseStep], number: i64) -> Option<&CaseStep> {
    for step in steps {
        if step.number() == number {
            return Some(step);
        }
        if let CaseStep::If(s) = step
            && let Some(found) = find_step_by_number(&s.children, number)
        {
            return Some(found);
        }
    }
    None
}

/// Apply link query overrides to a spliced copy, never the source
fn apply_link_query(step: &mut CaseStep, overrides: &IndexMap<String, Option<String>>) {
    if overrides.is_empty() {
        return;
    }
    match step {
        CaseStep::Http(s) => apply_overrides(&mut s.parameters.query, overrides, false),
        CaseStep::If(s) => {
            for child in &mut s.children {
                apply_link_query(child, overrides);
            }
        }
        _ => {}
    }
}

/// Append a trailing newline for downstream tool compatibility
fn ensure_trailing_newline(data: &str) -> String {
    if data.ends_with('\n') {
        data.to_string()
    } else {
        format!("{}\n", data)
    }
}

/// Normalize line endings to the target format's CRLF convention
fn to_crlf(code: &str) -> String {
    code.replace("\r\n", "\n").replace('\n', "\r\n")
}
