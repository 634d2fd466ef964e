//! crd2jsonschema CLI - extract JSON validation schemas from CRD manifests

use clap::Parser;
use console::style;
use crd2jsonschema_core::extract_schemas;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "crd2jsonschema")]
#[command(version)]
#[command(about = "Extract JSON validation schemas from Kubernetes CRD manifests", long_about = None)]
struct Cli {
    /// Output directory for the generated JSON schema files
    #[arg(short = 'o', long)]
    output_dir: PathBuf,

    /// CRD manifest files or directories to process
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

fn main() -> Result<()> {
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        // SAFETY: We're the only thread at this point (start of main)
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    for input in &cli.inputs {
        if input.is_dir() {
            for file in manifest_files(input) {
                process_file(&file, &cli.output_dir)?;
            }
        } else {
            process_file(input, &cli.output_dir)?;
        }
    }

    Ok(())
}

/// Collect `.yaml`/`.yml` files under a directory, in sorted order.
fn manifest_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("yaml" | "yml")
            )
        })
        .collect()
}

/// Process one manifest file: extract, transform, write.
///
/// A file that yields no schemas is not an error; the first write or
/// serialization failure aborts the whole invocation.
fn process_file(path: &Path, output_dir: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

    let units = extract_schemas(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to extract schemas from {}", path.display()))?;

    if units.is_empty() {
        return Ok(());
    }

    std::fs::create_dir_all(output_dir)
        .into_diagnostic()
        .wrap_err_with(|| {
            format!("Failed to create output directory {}", output_dir.display())
        })?;

    for unit in &units {
        let out_path = output_dir.join(unit.filename());
        let json = unit
            .to_json_pretty()
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to serialize schema for {}", unit.filename()))?;
        std::fs::write(&out_path, json)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write {}", out_path.display()))?;
        println!(
            "{} {}",
            style("✓").green().bold(),
            out_path.display()
        );
    }

    Ok(())
}
