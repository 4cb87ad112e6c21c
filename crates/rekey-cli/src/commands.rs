use std::io::{BufRead, IsTerminal};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use dialoguer::Input;
use rekey_batch::{BatchConfig, FileOutcome, LookupTable, Pipeline};
use rekey_diff::diff_nodes;
use rekey_types::Node;
use rekey_yaml::YamlCodec;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => cmd_run(args, &cli.format),
        Command::Diff(args) => cmd_diff(args, &cli.format),
        Command::Keys(args) => cmd_keys(args, &cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BatchConfig> {
    match path {
        Some(path) => BatchConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(BatchConfig::default()),
    }
}

fn prompt_prefix() -> anyhow::Result<String> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return read_prefix(stdin.lock());
    }
    let prefix: String = Input::new()
        .with_prompt("Enter prefix to prepend (e.g., dev_)")
        .allow_empty(true)
        .interact_text()?;
    Ok(prefix)
}

/// First line of piped input, without its line break.
fn read_prefix(mut input: impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line).context("reading prefix from stdin")? == 0 {
        anyhow::bail!("no prefix given: pass --prefix or pipe one on stdin");
    }
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

fn cmd_run(args: RunArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(dir) = args.dir {
        config.directory = dir;
    }
    if let Some(policy) = args.policy {
        config.policy = policy.into();
    }
    config.write &= !args.dry_run;
    config.repair_block_scalars &= !args.no_repair;
    config.verify_round_trip &= !args.no_verify;

    let prefix = match args.prefix {
        Some(prefix) => prefix,
        None => prompt_prefix()?,
    };
    let prefix = prefix.trim();
    tracing::debug!(%prefix, dir = %config.directory.display(), "starting run");

    let pipeline = Pipeline::new(config);
    match format {
        OutputFormat::Text => {
            let report = pipeline.run(prefix, |outcome| {
                for line in outcome_lines(outcome) {
                    println!("{line}");
                }
            })?;
            println!();
            for line in lookup_lines(&report.lookup) {
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            let report = pipeline.run(prefix, |_| {})?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn cmd_diff(args: DiffArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let codec = YamlCodec::default().with_repair(!args.no_repair);
    let old = read_document(&codec, &args.old)?;
    let new = read_document(&codec, &args.new)?;
    let diff = diff_nodes(&old, &new);

    match format {
        OutputFormat::Text if diff.is_empty() => println!("No changes detected."),
        OutputFormat::Text => {
            for change in diff.iter() {
                println!("  {change}");
            }
            println!(
                "{} added, {} removed, {} modified",
                diff.additions().to_string().green(),
                diff.removals().to_string().red(),
                diff.modifications().to_string().yellow(),
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diff)?),
    }
    Ok(())
}

fn cmd_keys(args: KeysArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    match format {
        OutputFormat::Text => {
            println!("Directory: {}", config.directory.display().to_string().bold());
            for class in &config.documents {
                println!("  {}: {}", class.file.cyan(), class.keys.join(", "));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config.documents)?),
    }
    Ok(())
}

fn read_document(codec: &YamlCodec, path: &Path) -> anyhow::Result<Node> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    codec
        .decode(&text)
        .with_context(|| format!("parsing {}", path.display()))
}

fn outcome_lines(outcome: &FileOutcome) -> Vec<String> {
    match outcome {
        FileOutcome::Processed { file, changes } => {
            let mut lines = vec![format!("{} Processed: {}", "✓".green().bold(), file.bold())];
            if changes.is_empty() {
                lines.push("No changes detected.".to_string());
            } else {
                lines.push("Changes made:".to_string());
                lines.extend(changes.iter().map(|c| format!("  {c}")));
            }
            lines
        }
        FileOutcome::Skipped { file } => {
            vec![format!("{} Skipping {} (not found)", "⚠".yellow(), file)]
        }
        FileOutcome::Failed { file, error } => {
            vec![format!("{} Failed to process {}: {}", "✗".red().bold(), file, error)]
        }
    }
}

fn lookup_lines(lookup: &LookupTable) -> Vec<String> {
    let mut lines = vec!["Lookup table (old -> new values):".to_string()];
    lines.extend(lookup.iter().map(|(old, new)| format!("  {old} -> {}", new.green())));
    lines
}
