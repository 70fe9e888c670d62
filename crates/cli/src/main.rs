//! Layout CLI - inspect, check and normalize tracker layout files.

mod logger;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use editor::{entry_label, EditorConfig, LayoutEditor};
use interchange::{dangling_element_refs, normalize_layout, ElementCatalog, LayoutDocument};
use schemars::schema_for;
use std::path::{Path, PathBuf};

/// Layout CLI - work with tracker layout files
#[derive(Parser)]
#[command(name = "layout-cli")]
#[command(about = "Command-line tools for tracker layout files")]
struct Cli {
    /// Editor configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, normalize and write a layout
    Normalize {
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// List the components and paths of a layout
    Inspect { input: PathBuf },

    /// Report element references that point nowhere
    Check { input: PathBuf },

    /// Print the file name a layout exports under
    Filename { input: PathBuf },

    /// Print the JSON schema of the layout format
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::CliLogger::init(logger::level_for(cli.verbose), cli.log_file.as_deref())?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Normalize {
            input,
            output,
            pretty,
        } => normalize(config, &input, output.as_deref(), pretty),
        Commands::Inspect { input } => inspect(config, &input),
        Commands::Check { input } => check(&input),
        Commands::Filename { input } => filename(config, &input),
        Commands::Schema => schema(),
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

fn open(config: EditorConfig, input: &Path) -> Result<LayoutEditor> {
    let mut editor = LayoutEditor::new(config);
    let reset = editor
        .open_file(input)
        .with_context(|| format!("Failed to open layout {}", input.display()))?;
    if reset > 0 {
        log::warn!("reset {} dangling element references", reset);
    }
    Ok(editor)
}

fn normalize(config: EditorConfig, input: &Path, output: Option<&Path>, pretty: bool) -> Result<()> {
    let editor = open(config, input)?;

    let text = if pretty {
        editor.document().to_json_pretty()?
    } else {
        editor.save_to_string()?
    };

    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn inspect(config: EditorConfig, input: &Path) -> Result<()> {
    let editor = open(config, input)?;
    let doc = editor.document();

    println!("Layout: {}", doc.name().unwrap_or("(unnamed)"));
    println!("Id: {}", doc.id.as_deref().unwrap_or("(none)"));

    println!("\nComponents ({}):", doc.components.len());
    for component in &doc.components {
        println!("  {}", entry_label(component));
    }

    println!("\nPaths ({}):", doc.paths.len());
    for path in &doc.paths {
        println!("  {}", entry_label(path));
    }

    println!("\nCustom elements: {}", doc.custom_elements().len());
    Ok(())
}

fn check(input: &Path) -> Result<()> {
    let raw = LayoutDocument::load(input)
        .with_context(|| format!("Failed to load layout {}", input.display()))?;
    let doc = normalize_layout(raw);
    let catalog = ElementCatalog::for_layout(&doc);

    let dangling = dangling_element_refs(&doc, &catalog);
    if dangling.is_empty() {
        println!("All element references resolve.");
        return Ok(());
    }

    for reference in &dangling {
        println!(
            "{} {}: missing element {}",
            reference.list,
            reference.entry_id.as_deref().unwrap_or("(no id)"),
            reference.element_id
        );
    }
    anyhow::bail!("{} dangling element references", dangling.len())
}

fn filename(config: EditorConfig, input: &Path) -> Result<()> {
    let editor = open(config, input)?;
    println!("{}", editor.export_file_name());
    Ok(())
}

fn schema() -> Result<()> {
    let schema = schema_for!(LayoutDocument);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
