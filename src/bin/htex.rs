//! htex - texture file inspection tool
//!
//! Opens an htex file, decodes its pre-header and version-specific header and
//! prints what it finds.
//!
//! # Usage
//!
//! ```text
//! htex --info <file.htex>
//! htex --mip <level> <file.htex>
//! ```

use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use binary_io::config::IoConfig;
use binary_io::tex::{load_texture_header, TextureHeader};
use binary_io::utils::logging::init_logging;
use binary_io::utils::metrics::Timer;
use binary_io::{IoError, Reader, Result, StreamSource};
use tracing::error;

/// Version of this tool
const VERSION: &str = env!("CARGO_PKG_VERSION");

enum Command {
    Info(String),
    Mip(usize, String),
    Help,
}

fn parse_args(args: &[String]) -> Option<Command> {
    match args {
        [flag] if flag == "--help" || flag == "-h" => Some(Command::Help),
        [flag, path] if flag == "--info" || flag == "-i" => Some(Command::Info(path.clone())),
        [flag, level, path] if flag == "--mip" || flag == "-m" => {
            level.parse().ok().map(|level| Command::Mip(level, path.clone()))
        }
        _ => None,
    }
}

fn print_usage() {
    eprintln!("Texture Tool {VERSION}, available options");
    eprintln!("  -h, --help                 produce help message");
    eprintln!("  -i, --info <file>          describe the htex file");
    eprintln!("  -m, --mip <level> <file>   report the size of one mip level payload");
}

fn open(path: &str) -> Result<StreamSource<BufReader<File>>> {
    let file = File::open(path)?;
    StreamSource::new(BufReader::new(file))
}

fn describe(path: &str) -> Result<()> {
    let _timer = Timer::start("describe");
    let mut source = open(path)?;
    let mut reader = Reader::new(&mut source);

    match load_texture_header(&mut reader)? {
        TextureHeader::V1_0(header) => print!("{header}"),
    }
    Ok(())
}

fn mip_size(path: &str, level: usize) -> Result<()> {
    let _timer = Timer::start("mip_size");
    let mut source = open(path)?;
    let mut reader = Reader::new(&mut source);

    match load_texture_header(&mut reader)? {
        TextureHeader::V1_0(header) => {
            let range = header.mip_range(level).ok_or_else(|| {
                IoError::InvalidHeader(format!("mip level {level} is empty"))
            })?;
            println!("Mip #{level}: {} bytes at offset {}", range.len(), range.start);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let config = IoConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Ignoring environment configuration: {e}");
        IoConfig::default()
    });
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{e}");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match parse_args(&args) {
        Some(Command::Info(path)) => describe(&path),
        Some(Command::Mip(level, path)) => mip_size(&path, level),
        Some(Command::Help) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        None => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Failed to read htex file");
            eprintln!("Failed to read htex file: {e}");
            ExitCode::FAILURE
        }
    }
}
