pub mod apidog;
pub mod scenario;

pub use apidog::{
    ApiDefinition, ApiResponse, ApidogCollection, CaseStep, Dataset, DatasetRow, Folder,
    HttpCaseStep, IfCaseStep, Parameter, ParameterSet, Processor, ProcessorData, RefCaseStep,
    RequestBody, ScriptCaseStep, TestCase, WaitCaseStep,
};
pub use scenario::{
    Assertion, AuthConfig, Condition, DelayStep, ElseStep, HttpStep, IfStep, LinkStep, OnError,
    ReportDetail, RunSettings, ScenarioDoc, ScriptStep, Step, TestCaseRefStep,
};
