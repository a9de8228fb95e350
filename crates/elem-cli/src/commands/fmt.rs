//! `elem fmt` command implementation.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use elem::indent_html;
use elem_config::Config;

use super::write_html;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fmt command.
#[derive(Args)]
pub(crate) struct FmtArgs {
    /// HTML file to re-indent (default: stdin).
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover elem.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl FmtArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        let source = match &self.input {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buf = String::new();
                std::io::stdin().lock().read_to_string(&mut buf)?;
                buf
            }
        };
        if source.trim().is_empty() {
            output.warning("Input is empty");
        }

        tracing::info!(bytes = source.len(), "Re-indenting HTML");
        let html = indent_html(&source, &config.render.layout);
        write_html(&html, self.output.as_deref(), &output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_reindents_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("elem.toml");
        std::fs::write(&config_path, "[render]\nindent = \"    \"\n").unwrap();
        let input = dir.path().join("in.html");
        std::fs::write(&input, "<ul><li>a</li><li>b</li></ul>").unwrap();
        let out = dir.path().join("out.html");

        FmtArgs {
            input: Some(input),
            output: Some(out.clone()),
            config: Some(config_path),
        }
        .execute()
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(out).unwrap(),
            "<ul>\n    <li>a</li>\n    <li>b</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_execute_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("elem.toml");
        std::fs::write(&config_path, "").unwrap();

        let err = FmtArgs {
            input: Some(dir.path().join("missing.html")),
            output: None,
            config: Some(config_path),
        }
        .execute()
        .unwrap_err();

        assert!(matches!(err, CliError::Io(_)));
    }
}
