//! CLI command handlers, one file per subcommand.

mod config;
mod create;
mod read;
mod serve;

pub use config::run_config;
pub use create::run_create;
pub use read::run_read;
pub use serve::run_serve;

use anyhow::Result;
use httpwait_core::provider::{Diagnostics, Severity};

/// Print warnings to stderr; turn the first error into an `Err`.
pub(crate) fn report(diagnostics: &Diagnostics) -> Result<()> {
    for d in diagnostics.warnings() {
        eprintln!("warning: {}: {}", d.summary, d.detail);
    }
    match diagnostics.iter().find(|d| d.severity == Severity::Error) {
        Some(d) => anyhow::bail!("{}: {}", d.summary, d.detail),
        None => Ok(()),
    }
}
