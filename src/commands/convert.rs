use crate::convert::{ForwardConverter, IdAllocator};
use crate::error::{ApidogError, Result};
use crate::index::{ApiIndex, CaseIndex};
use crate::loader;
use crate::models::ApidogCollection;
use colored::*;
use std::path::{Path, PathBuf};

pub fn execute_convert(
    scenario: &Path,
    collection: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let inputs = if scenario.is_dir() {
        super::collect_files(scenario, &["yaml", "yml"])?
    } else {
        vec![scenario.to_path_buf()]
    };

    if inputs.is_empty() {
        return Err(ApidogError::ValidationError(format!(
            "No scenario files found in {}",
            scenario.display()
        )));
    }

    if let Some(out) = output
        && inputs.len() > 1
    {
        std::fs::create_dir_all(out)?;
    }

    for path in &inputs {
        println!("{}", format!("Converting {}...", path.display()).bright_blue());

        let doc = loader::load_scenario(path)?;

        let apidog = load_referenced_collection(path, &doc.api_collection, collection)?;
        let apis = ApiIndex::build(&apidog.api_collection);
        let cases = CaseIndex::build(&apidog.test_case_collection);

        let converter = ForwardConverter::new(&apis, &cases);
        let mut ids = IdAllocator::with_used(apidog.used_ids());
        let outcome = converter.convert(&doc, &mut ids)?;

        for diagnostic in &outcome.diagnostics {
            println!("  {}", diagnostic.format().yellow());
        }

        let out_path = output_path(path, output, inputs.len() > 1);
        loader::save_test_case(&out_path, &outcome.test_case)?;
        println!("{} {}", "✓".green(), out_path.display());
    }

    println!(
        "{}",
        format!("✓ Converted {} scenario(s)", inputs.len())
            .green()
            .bold()
    );
    Ok(())
}

/// The resolution source is the explicit --collection flag, else the
/// scenario's own apiCollection reference resolved relative to the scenario
/// file. With neither, conversion runs against empty indexes.
fn load_referenced_collection(
    scenario_path: &Path,
    referenced: &Option<String>,
    explicit: Option<&Path>,
) -> Result<ApidogCollection> {
    if let Some(path) = explicit {
        return loader::load_collection(path);
    }
    if let Some(relative) = referenced {
        let base = scenario_path.parent().unwrap_or(Path::new("."));
        return loader::load_collection(base.join(relative));
    }
    Ok(ApidogCollection::default())
}

fn output_path(input: &Path, output: Option<&Path>, many: bool) -> PathBuf {
    match output {
        Some(out) if many || out.is_dir() => {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("scenario");
            out.join(format!("{}.json", stem))
        }
        Some(out) => out.to_path_buf(),
        None => input.with_extension("json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_variants() {
        let input = Path::new("/work/login.yaml");

        assert_eq!(
            output_path(input, None, false),
            PathBuf::from("/work/login.json")
        );
        assert_eq!(
            output_path(input, Some(Path::new("/out/case.json")), false),
            PathBuf::from("/out/case.json")
        );
        assert_eq!(
            output_path(input, Some(Path::new("/out")), true),
            PathBuf::from("/out/login.json")
        );
    }

    #[test]
    fn test_missing_collection_reference_yields_empty_collection() {
        let collection =
            load_referenced_collection(Path::new("/work/login.yaml"), &None, None).unwrap();
        assert!(collection.api_collection.is_empty());
        assert!(collection.test_case_collection.is_empty());
    }
}
