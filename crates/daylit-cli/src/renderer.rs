//! Terminal rendering of the core's markdown output.
//!
//! Rich mode styles inline markdown with termimad and colors headings,
//! keeping the `#` markers visible. Plain mode writes the markdown as is.

use std::io::{self, Write};

use termimad::{
    MadSkin,
    crossterm::style::{Color, Stylize},
};

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown to stdout.
    pub fn render(&self, markdown: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_to(&mut out, markdown)?;
        out.flush()
    }

    pub fn render_to<W: Write>(&self, out: &mut W, markdown: &str) -> io::Result<()> {
        if !self.rich_enabled {
            return out.write_all(markdown.as_bytes());
        }
        for line in markdown.lines() {
            if line.starts_with('#') {
                writeln!(out, "{}", line.with(Color::Cyan).bold())?;
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

    fn rendered(renderer: &TerminalRenderer, markdown: &str) -> String {
        let mut out = Vec::new();
        renderer.render_to(&mut out, markdown).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_output_is_unchanged() {
        let renderer = TerminalRenderer::new(false);
        let markdown = "# Plan for 2024-03-01\n\n- **09:00–09:30** Read\n";
        assert_eq!(rendered(&renderer, markdown), markdown);
    }

    #[test]
    fn test_rich_output_keeps_heading_text() {
        let renderer = TerminalRenderer::new(true);
        let out = rendered(&renderer, "# Settings\nplain line\n");
        assert!(out.contains("# Settings"));
        assert!(out.contains("plain line"));
    }

    #[test]
    fn test_default_is_rich() {
        assert!(TerminalRenderer::default().rich_enabled);
    }
}
