use crate::convert::ReverseConverter;
use crate::error::Result;
use crate::index::{ApiIndex, CaseIndex};
use crate::loader;
use colored::*;
use std::path::Path;

pub fn execute_reverse(case: &Path, collection: Option<&Path>, output: Option<&Path>) -> Result<()> {
    println!("{}", format!("Reversing {}...", case.display()).bright_blue());

    let test_case = loader::load_test_case(case)?;

    let (apis, cases) = match collection {
        Some(path) => {
            let apidog = loader::load_collection(path)?;
            (
                Some(ApiIndex::build(&apidog.api_collection)),
                Some(CaseIndex::build(&apidog.test_case_collection)),
            )
        }
        None => (None, None),
    };

    let converter = ReverseConverter::new(apis.as_ref(), cases.as_ref());
    let outcome = converter.convert(&test_case);

    for diagnostic in &outcome.diagnostics {
        println!("  {}", diagnostic.format().yellow());
    }

    match output {
        Some(path) => {
            loader::save_scenario(path, &outcome.scenario)?;
            println!(
                "{}",
                format!("✓ Scenario written to {}", path.display())
                    .green()
                    .bold()
            );
        }
        None => {
            let yaml = serde_yaml::to_string(&outcome.scenario)?;
            print!("{}", yaml);
        }
    }

    Ok(())
}
