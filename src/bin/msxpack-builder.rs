//! msxpack builder binary
//!
//! Walks one or more config directories for JSON hardware descriptions and
//! compiles each into a pack file under the output directory, mirroring the
//! source directory layout. A failed pack is reported and skipped; its
//! output file is never created.

use clap::Parser;
use msxpack::{PackError, RomIndex, build_pack, exit_codes::*};
use std::{fs, panic, path::Path, path::PathBuf, process};
use walkdir::WalkDir;

const VERSION: &str = msxpack::version::VERSION;

#[derive(Parser, Debug)]
#[command(version = VERSION, about = "Compile MSX hardware descriptions into pack files")]
struct Args {
    /// Directory of ROM images, indexed by content digest
    #[arg(short, long)]
    rom_dir: PathBuf,

    /// Directory of JSON configs; may be given multiple times
    #[arg(short, long = "config-dir", required = true)]
    config_dir: Vec<PathBuf>,

    /// Directory pack files are written under
    #[arg(short, long, default_value = "MSX")]
    output_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    // Set up panic handler to return specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {panic_info}");
        process::exit(EXIT_PANIC);
    }));

    let result = panic::catch_unwind(run);

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in builder");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    let args = Args::parse();

    if let Some(ref level) = args.log_level {
        msxpack::logger::init_with_level(level);
    } else {
        msxpack::logger::init();
    }

    let index = match RomIndex::build(&args.rom_dir) {
        Ok(index) => index,
        Err(e) => {
            log::error!("Failed to index ROM directory: {e}");
            return EXIT_IO_ERROR;
        }
    };
    log::info!(
        "{} ROM image(s) indexed under {}",
        index.len(),
        args.rom_dir.display()
    );

    let mut exit_code = EXIT_SUCCESS;
    for config_dir in &args.config_dir {
        let code = build_dir(config_dir, &args.output_dir, &index);
        if exit_code == EXIT_SUCCESS {
            exit_code = code;
        }
    }
    exit_code
}

/// Build every manifest under one config directory; returns the first
/// failure's exit code, or success
fn build_dir(config_dir: &Path, output_dir: &Path, index: &RomIndex) -> i32 {
    let mut exit_code = EXIT_SUCCESS;

    for entry in WalkDir::new(config_dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "json") {
            continue;
        }

        match build_one(path, config_dir, output_dir, index) {
            Ok(output) => log::info!("{} -> {}", path.display(), output.display()),
            Err(e) => {
                log::error!("{}: {e}", path.display());
                if exit_code == EXIT_SUCCESS {
                    exit_code = error_code(&e);
                }
            }
        }
    }
    exit_code
}

/// Compile one manifest; the output file is created only after the whole
/// pack has assembled cleanly
fn build_one(
    manifest_path: &Path,
    config_dir: &Path,
    output_dir: &Path,
    index: &RomIndex,
) -> Result<PathBuf, PackError> {
    let pack = build_pack(manifest_path, index)?;

    let relative = manifest_path.strip_prefix(config_dir).unwrap_or(manifest_path);
    let output = output_dir.join(relative).with_extension("MSX");
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, &pack)?;
    Ok(output)
}

fn error_code(error: &PackError) -> i32 {
    match error {
        PackError::UnresolvedContent(_) => EXIT_CONTENT_ERROR,
        PackError::UnresolvedReference(_)
        | PackError::UnsupportedMachine(_)
        | PackError::UnknownBlockKind(_)
        | PackError::UnknownExtension(_)
        | PackError::JsonError(_) => EXIT_CONFIG_ERROR,
        PackError::IoError(_) => EXIT_IO_ERROR,
        PackError::Generic(_) => EXIT_ERROR,
    }
}
