//! tsr-assemble - build a customized TSR from a base .COM file
//!
//! Exit codes: 0 on success, 1 on I/O failure, 2 when an input is rejected.
//! The output file is replaced atomically; a failed run leaves it untouched.

use clap::{ArgAction, Parser};
use flexi_logger::Logger;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;

use tsr_assembler::{assemble, AssembleError, AssemblyRequest, Tag};

#[derive(Parser)]
#[command(name = "tsr-assemble", version)]
#[command(about = "A tool for creating customized TSRs")]
struct Cli {
    /// An existing .COM file to copy program code from
    #[arg(value_name = "BASE-FILE")]
    base_file: PathBuf,

    /// Palette file to include
    #[arg(short, long)]
    palette: Option<PathBuf>,

    /// Font file to include
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Secondary font file to include
    #[arg(short = 'g', long)]
    font2: Option<PathBuf>,

    /// Enable blinking (disable high-intensity backgrounds)
    #[arg(long, overrides_with = "no_blink")]
    blink: bool,

    /// Disable blinking (enable high-intensity backgrounds)
    #[arg(long, overrides_with = "blink")]
    no_blink: bool,

    /// Destination of customized .COM file
    #[arg(short, long)]
    output: PathBuf,

    /// Print a JSON manifest of the written image
    #[arg(long)]
    manifest: bool,

    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// The later of `--blink` / `--no-blink` clears the other.
    fn blink(&self) -> Option<bool> {
        match (self.blink, self.no_blink) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    fn log_spec(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("cannot write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Assemble(AssembleError),

    #[error("cannot encode manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Rejected(_) => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logger = Logger::try_with_env_or_str(cli.log_spec())
        .and_then(|l| l.log_to_stderr().start());
    let _logger = match logger {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Failed to start logger: {}", e);
            None
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            e.exit_code()
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let request = AssemblyRequest {
        base: read_file(&cli.base_file)?,
        palette: cli.palette.as_deref().map(read_file).transpose()?,
        font: cli.font.as_deref().map(read_file).transpose()?,
        font2: cli.font2.as_deref().map(read_file).transpose()?,
        blink: cli.blink(),
    };

    let image = assemble(&request).map_err(|e| reject(cli, e))?;
    write_output(&cli.output, &image.bytes)?;
    log::info!("wrote {} ({} bytes)", cli.output.display(), image.bytes.len());

    if cli.manifest {
        println!("{}", serde_json::to_string_pretty(&image.manifest)?);
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    log::debug!("reading {}", path.display());
    fs::read(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Attach the offending file name to a rejected input.
fn reject(cli: &Cli, err: AssembleError) -> CliError {
    if !err.is_validation() {
        return CliError::Assemble(err);
    }

    let name = |path: &Option<PathBuf>| {
        path.as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    };

    let message = match &err {
        AssembleError::InvalidBaseImage => {
            format!("{} is not a valid base .COM file", cli.base_file.display())
        }
        AssembleError::InvalidPalette(len) => {
            let path = name(&cli.palette);
            format!("{} is not a valid palette ({} bytes, expected 48)", path, len)
        }
        AssembleError::InvalidFont { tag, len } => {
            let path = if *tag == Tag::Font2 { &cli.font2 } else { &cli.font };
            format!("{} is not a valid font ({} bytes)", name(path), len)
        }
        _ => err.to_string(),
    };
    CliError::Rejected(message)
}

/// Write through a temporary file in the destination directory, then rename
/// it over `path`. An existing destination keeps its permissions; a new one
/// gets the usual umask-filtered mode instead of the temp file's 0600.
fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    let write_err = |source: io::Error| CliError::Write {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = temp_output(dir).map_err(write_err)?;
    if let Ok(existing) = fs::metadata(path) {
        file.as_file().set_permissions(existing.permissions()).map_err(write_err)?;
    }
    file.write_all(bytes).map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn temp_output(dir: &Path) -> io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}
