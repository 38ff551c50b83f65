//! Logging init: append to a file under the XDG state dir, falling back to
//! stderr. Never writes to stdout, which `httpwait serve` reserves for the
//! plugin protocol.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,httpwait=debug,httpwait_core=debug";

/// Where log records ended up after [`init_logging`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Each record gets its own handle to the shared log file; if cloning the
/// handle fails the record goes to stderr instead of being lost.
struct SharedFile(fs::File);

enum RecordWriter {
    File(fs::File),
    Stderr(io::Stderr),
}

impl io::Write for RecordWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            RecordWriter::File(f) => f.write(buf),
            RecordWriter::Stderr(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            RecordWriter::File(f) => f.flush(),
            RecordWriter::Stderr(e) => e.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for SharedFile {
    type Writer = RecordWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(RecordWriter::File)
            .unwrap_or_else(|_| RecordWriter::Stderr(io::stderr()))
    }
}

/// `$XDG_STATE_HOME/httpwait/httpwait.log`.
pub fn default_log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("httpwait")?;
    Ok(xdg_dirs
        .get_state_home()
        .join("httpwait")
        .join("httpwait.log"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))
}

/// Install the global subscriber writing to `path`.
pub fn init_file_logging(path: &Path) -> Result<()> {
    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(SharedFile(file)))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {}", e))?;
    tracing::info!("httpwait logging initialized at {}", path.display());
    Ok(())
}

/// Install the global subscriber writing to stderr only.
pub fn init_stderr_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {}", e))
}

/// Log to the default file, or to stderr when the state dir is unusable.
pub fn init_logging() -> Result<LogTarget> {
    let file_attempt = default_log_path().and_then(|path| {
        open_log_file(&path)?;
        Ok(path)
    });
    match file_attempt {
        Ok(path) => {
            init_file_logging(&path)?;
            Ok(LogTarget::File(path))
        }
        Err(e) => {
            init_stderr_logging()?;
            tracing::warn!("log file unavailable ({:#}); logging to stderr", e);
            Ok(LogTarget::Stderr)
        }
    }
}
