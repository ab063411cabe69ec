use crate::coverage;
use crate::error::Result;
use crate::index::ApiIndex;
use crate::loader;
use colored::*;
use std::fs;
use std::path::Path;

pub fn execute_compare(
    openapi: &Path,
    scenarios: &Path,
    collection: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let spec = loader::load_openapi(openapi)?;

    let files = super::collect_files(scenarios, &["yaml", "yml"])?;
    let mut docs = Vec::with_capacity(files.len());
    for file in &files {
        docs.push(loader::load_scenario(file)?);
    }

    let apis = match collection {
        Some(path) => Some(ApiIndex::build(
            &loader::load_collection(path)?.api_collection,
        )),
        None => None,
    };

    let report = coverage::compare(&spec, &docs, apis.as_ref());

    println!("{}", "Coverage report".bright_blue());
    println!("  Endpoints: {}", report.total);
    println!("  Tested: {}", report.tested);
    println!("  Coverage: {:.1}%", report.coverage_percent);

    if report.untested.is_empty() {
        println!("{}", "✓ Every endpoint is exercised".green().bold());
    } else {
        println!();
        println!("{}", "Untested endpoints:".red().bold());
        for group in &report.untested {
            println!("  {}", group.tag.cyan());
            for endpoint in &group.endpoints {
                println!("    - {} {}", endpoint.method, endpoint.path);
            }
        }
    }

    if let Some(path) = output {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!(
            "{}",
            format!("✓ Report written to {}", path.display())
                .green()
                .bold()
        );
    }

    Ok(())
}
