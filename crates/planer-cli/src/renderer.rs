//! Terminal rendering for run summaries and listings.

use std::io::{self, Write};

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Renders Markdown to the terminal, either styled or verbatim.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render `markdown` to stdout.
    pub fn render(&self, markdown: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_to(&mut out, markdown)?;
        out.flush()?;
        Ok(())
    }

    /// Render `markdown` to `out`.
    ///
    /// Header lines keep their `#` markers so the structure of the summary
    /// survives in the styled output.
    pub fn render_to<W: Write>(&self, out: &mut W, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            out.write_all(markdown.as_bytes())?;
            return Ok(());
        }

        for line in markdown.lines() {
            if line.starts_with('#') {
                writeln!(out, "\x1b[34m{line}\x1b[0m")?;
            } else {
                writeln!(out, "{}", self.skin.inline(line))?;
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer_is_verbatim() {
        let renderer = TerminalRenderer::new(false);
        let mut out = Vec::new();
        renderer
            .render_to(&mut out, "# Title\n\n**Model**: x\n")
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "# Title\n\n**Model**: x\n");
    }

    #[test]
    fn test_rich_renderer_colors_headers() {
        let renderer = TerminalRenderer::new(true);
        let mut out = Vec::new();
        renderer.render_to(&mut out, "## Daily plans").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\x1b[34m## Daily plans\x1b[0m\n"
        );
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }
}
