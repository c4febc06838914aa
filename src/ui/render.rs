//! Showing assistant replies.

use std::io::Write;
use std::process::Command;

use crossterm::style::Stylize;
use tempfile::Builder;
use tracing::debug;

pub trait Renderer {
    fn render_markdown(&mut self, markdown: &str);
}

/// Renders through `glow`, falling back to plain text when glow is missing.
#[derive(Default)]
pub struct GlowRenderer;

impl GlowRenderer {
    fn try_glow(markdown: &str) -> std::io::Result<()> {
        let mut staged = Builder::new().prefix("halp-").suffix(".md").tempfile()?;
        staged.write_all(markdown.as_bytes())?;
        staged.flush()?;

        let status = Command::new("glow").arg(staged.path()).status()?;
        debug!(status = %status, "glow finished");
        Ok(())
    }
}

impl Renderer for GlowRenderer {
    fn render_markdown(&mut self, markdown: &str) {
        if let Err(err) = Self::try_glow(markdown) {
            debug!(error = %err, "glow unavailable");
            eprintln!(
                "{}",
                "Failed to run glow. Please install it (e.g. `brew install glow`) for rendered output.\n"
                    .yellow()
            );
            println!("{markdown}\n");
        }
    }
}
