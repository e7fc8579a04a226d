use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder as LogBuilder;
use log::LevelFilter;
use tmsh_conf_core::{parse_files, render_tree, to_json};

mod cli;
mod convert;
mod path_guard;

use cli::{Cli, Command, InspectArgs, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    LogBuilder::from_default_env()
        .filter_level(LevelFilter::from(cli.log_level))
        .init();

    match cli.command {
        Command::Convert(args) => convert::run_convert(args),
        Command::Inspect(args) => run_inspect(args),
    }
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let mut parsed = parse_files(&args.files).with_context(|| {
        format!(
            "failed to parse {}",
            args.files
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    if let Some(prefix) = &args.keyword {
        parsed.nodes.retain(|node| node.keyword.starts_with(prefix.as_str()));
    }

    match args.format {
        OutputFormat::Text => {
            print!("{}", render_tree(&parsed.nodes, args.depth));
            for warning in &parsed.warnings {
                eprintln!("warning: {warning}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&to_json(&parsed))?),
    }
    Ok(())
}
