//! CLI command implementations.

pub(crate) mod demo;
pub(crate) mod fmt;

use std::io::Write;
use std::path::Path;

pub(crate) use demo::DemoArgs;
pub(crate) use fmt::FmtArgs;

use crate::error::CliError;
use crate::output::Output;

/// Write rendered HTML to `path`, or to stdout when no path is given.
pub(crate) fn write_html(html: &str, path: Option<&Path>, output: &Output) -> Result<(), CliError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, format!("{html}\n"))?;
            output.success(&format!("Wrote {} ({} bytes)", path.display(), html.len() + 1));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
