use crate::error::{ApidogError, Result};
use crate::loader;
use crate::merge::merge_test_cases;
use colored::*;
use std::path::Path;

pub fn execute_merge(input: &Path, collection: &Path, output: Option<&Path>) -> Result<()> {
    let files = super::collect_files(input, &["json"])?;
    if files.is_empty() {
        return Err(ApidogError::ValidationError(format!(
            "No test case files found in {}",
            input.display()
        )));
    }

    println!(
        "{}",
        format!(
            "Merging {} test case(s) into {}...",
            files.len(),
            collection.display()
        )
        .bright_blue()
    );

    let mut apidog = loader::load_collection(collection)?;

    let mut incoming = Vec::with_capacity(files.len());
    for file in &files {
        incoming.push(loader::load_test_case(file)?);
    }

    let report = merge_test_cases(&mut apidog, incoming);

    let target = output.unwrap_or(collection);
    loader::save_collection(target, &apidog)?;

    for name in &report.inserted {
        println!("  {} {}", "+".green(), name);
    }
    for name in &report.updated {
        println!("  {} {}", "~".yellow(), name);
    }
    if report.remapped_ids > 0 {
        println!("  Remapped {} colliding id(s)", report.remapped_ids);
    }

    println!(
        "{}",
        format!(
            "✓ Merged {} test case(s) into {}",
            report.total(),
            target.display()
        )
        .green()
        .bold()
    );
    Ok(())
}
