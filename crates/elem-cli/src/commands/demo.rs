//! `elem demo` command implementation.

use std::path::PathBuf;

use clap::Args;
use elem::with_isolated_scope;
use elem_config::{CliSettings, Config};

use super::write_html;
use crate::error::CliError;
use crate::output::Output;
use crate::pages::Page;

/// Arguments for the demo command.
#[derive(Args)]
pub(crate) struct DemoArgs {
    /// Page to render: basic, form, list or raw (overrides config).
    #[arg(long)]
    page: Option<String>,

    /// Pretty-print the output (overrides config).
    #[arg(long, conflicts_with = "flat")]
    pretty: bool,

    /// Write compact output (overrides config).
    #[arg(long)]
    flat: bool,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover elem.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl DemoArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            pretty: self.pretty_override(),
            page: self.page,
            output: self.output,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let page: Page = config.demo.page.parse()?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        tracing::info!(%page, pretty = config.render.pretty, "Rendering demo page");

        let html = render(page, &config)?;
        write_html(&html, config.demo.output.as_deref(), &output)
    }

    fn pretty_override(&self) -> Option<bool> {
        if self.pretty {
            Some(true)
        } else if self.flat {
            Some(false)
        } else {
            None
        }
    }
}

/// Render `page` in its own scope so repeated runs share no state.
fn render(page: Page, config: &Config) -> Result<String, CliError> {
    with_isolated_scope(|_| {
        let root = page.build(&config.demo)?;
        Ok(root.to_html_with(config.render.pretty, &config.render.layout))
    })
}
