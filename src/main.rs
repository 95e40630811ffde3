use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use mediatag::{
    config::{Config, OutputMode},
    pipeline::{scanner, OverwritePrompt, Pass, TagEngine},
    TagError,
};
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mediatag")]
#[command(about = "Tag PDFs, text files and videos from their content and keep OS tags in sync")]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Settings file (overrides the default search locations)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tag untagged files and copy their tags to the OS tags
    Run {
        /// Folder to process (prompted for when omitted)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Number of tags per file (overrides config)
        #[arg(long)]
        top_n: Option<usize>,
        /// Where PDF and video tags are written (overrides config)
        #[arg(long, value_enum)]
        output: Option<OutputMode>,
        /// Overwrite existing tagged copies without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Copy OS tags into the content metadata of tagged files
    Sync {
        /// Folder to process (prompted for when omitted)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Show the content tags and OS tags of every supported file
    List {
        /// Folder to process (prompted for when omitted)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Overwrite confirmation on the terminal, drawn above the progress bar
struct TerminalPrompt {
    progress: ProgressBar,
}

impl OverwritePrompt for TerminalPrompt {
    fn confirm_overwrite(&self, path: &Path) -> Result<bool> {
        if !std::io::stdin().is_terminal() {
            return Ok(false);
        }
        self.progress.suspend(|| {
            Confirm::new()
                .with_prompt(format!(
                    "The file '{}' already exists. Do you want to overwrite it?",
                    path.display()
                ))
                .default(false)
                .interact()
                .context("Failed to read user input")
        })
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mediatag={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Folder from the command line, or asked for when a terminal is attached
fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir);
    }
    if !std::io::stdin().is_terminal() {
        return Err(TagError::MissingInput.into());
    }

    let answer: String = Input::new()
        .with_prompt("Folder to process")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read user input")?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(TagError::MissingInput.into());
    }

    let dir = PathBuf::from(shellexpand::tilde(answer).into_owned());
    if !dir.is_dir() {
        return Err(TagError::MissingInput.into());
    }
    Ok(dir)
}

async fn run_pass(config: &Config, pass: Pass, dir: &Path) -> Result<()> {
    let files = scanner::discover(dir)?;
    if files.is_empty() {
        println!("No supported files found in {}", dir.display());
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} files ({msg})")?
            .progress_chars("#>-"),
    );

    let engine = TagEngine::from_config(config)?.with_prompt(Arc::new(TerminalPrompt {
        progress: pb.clone(),
    }));
    let report = engine
        .run_pass(pass, &files, |file, _| {
            pb.set_message(file.display_name());
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    println!("{}", report);
    if report.malformed() > 0 {
        println!("{} malformed PDF file(s) could not be read", report.malformed());
    }
    Ok(())
}

async fn list(config: &Config, dir: &Path, json: bool) -> Result<()> {
    let engine = TagEngine::from_config(config)?;
    let entries = engine.run_list(dir).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        let marker = if entry.in_sync { " " } else { "*" };
        println!("{} {} ({})", marker, entry.path.display(), entry.kind);
        println!("    content: {}", entry.content_tags);
        println!("    os:      {}", entry.os_tags);
    }
    let diverged = entries.iter().filter(|e| !e.in_sync).count();
    println!("\n{} files, {} with diverging tags", entries.len(), diverged);
    Ok(())
}

async fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            dir,
            top_n,
            output,
            yes,
        } => {
            if let Some(top_n) = top_n {
                config.tagging.top_n = top_n;
            }
            if let Some(output) = output {
                config.tagging.output = output;
            }
            if yes {
                config.tagging.assume_yes = true;
            }
            let dir = resolve_dir(dir)?;
            run_pass(&config, Pass::Tag, &dir).await
        }
        Commands::Sync { dir } => {
            let dir = resolve_dir(dir)?;
            run_pass(&config, Pass::Sync, &dir).await
        }
        Commands::List { dir, json } => {
            let dir = resolve_dir(dir)?;
            list(&config, &dir, json).await
        }
    }
}

/// Usage errors exit with 1, help and version with 0
fn parse_cli<I, T>(args: I) -> std::result::Result<Cli, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| {
        let _ = e.print();
        if e.use_stderr() {
            1
        } else {
            0
        }
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match parse_cli(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return ExitCode::from(code),
    };
    init_tracing(cli.verbose, cli.quiet);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(TagError::MissingInput) = e.downcast_ref::<TagError>() {
                eprintln!("No folder path provided.");
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(1)
        }
    }
}
