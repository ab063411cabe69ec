use apidog_test::{
    Result,
    cli::{Cli, Commands},
    commands,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            scenario,
            collection,
            output,
        } => {
            commands::execute_convert(&scenario, collection.as_deref(), output.as_deref())?;
        }
        Commands::Reverse {
            case,
            collection,
            output,
        } => {
            commands::execute_reverse(&case, collection.as_deref(), output.as_deref())?;
        }
        Commands::Merge {
            input,
            collection,
            output,
        } => {
            commands::execute_merge(&input, &collection, output.as_deref())?;
        }
        Commands::Compare {
            openapi,
            scenarios,
            collection,
            output,
        } => {
            commands::execute_compare(
                &openapi,
                &scenarios,
                collection.as_deref(),
                output.as_deref(),
            )?;
        }
    }

    Ok(())
}
