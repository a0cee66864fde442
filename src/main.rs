use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use pdf_darkmode::config;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: pdf_darkmode <input.pdf> [output.pdf]");
        eprintln!("  Convert a PDF to dark mode. Output defaults to <input>_darkmode.pdf.");
        eprintln!("  Parameters are read from settings.yaml next to the input, if present.");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("pdf_darkmode {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if args.len() > 2 {
        eprintln!("ERROR: expected one input file and an optional output file");
        return ExitCode::FAILURE;
    }

    let input_path = Path::new(&args[0]);
    let output_path = match args.get(1) {
        Some(p) => PathBuf::from(p),
        None => default_output_path(input_path),
    };

    // Load settings from the same directory as the input file.
    let params = match config::load_params_for_input(input_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("ERROR: Failed to load settings for {}: {e}", input_path.display());
            return ExitCode::FAILURE;
        }
    };

    let input_bytes = match std::fs::read(input_path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("ERROR: Failed to read {}: {e}", input_path.display());
            return ExitCode::FAILURE;
        }
    };

    let output_bytes = match pdf_darkmode::convert(&input_bytes, &params) {
        Ok(b) => b,
        Err(e) => {
            eprintln!(
                "ERROR: {} -> {}: {e}",
                input_path.display(),
                output_path.display()
            );
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::write(&output_path, output_bytes) {
        eprintln!("ERROR: Failed to write {}: {e}", output_path.display());
        return ExitCode::FAILURE;
    }

    eprintln!("OK: {} -> {}", input_path.display(), output_path.display());
    ExitCode::SUCCESS
}

/// `<dir>/<stem>.pdf` -> `<dir>/<stem>_darkmode.pdf`
fn default_output_path(input_path: &Path) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input_path.with_file_name(format!("{stem}_darkmode.pdf"))
}
