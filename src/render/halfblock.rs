use crate::render::{draw_overlay_popup, Frame, Renderer};
use std::io::Write;

const HALF_BLOCK: char = '\u{2580}';

/// Two image rows per terminal cell: foreground paints the upper half,
/// background the lower.
#[derive(Debug, Default)]
pub struct HalfBlockRenderer {
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical pixel grid this renderer fills for a terminal area.
    pub fn pixel_size(cols: u16, visual_rows: u16) -> (u32, u32) {
        (cols.max(1) as u32, visual_rows.max(1) as u32 * 2)
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let cols = frame.term_cols as usize;
        let visual_rows = frame.visual_rows as usize;
        if cols == 0 || visual_rows == 0 {
            return Ok(());
        }

        if frame.sync_updates {
            out.write_all(b"\x1b[?2026h")?;
        }
        // Home, reset, autowrap off while painting full-width rows.
        out.write_all(b"\x1b[H\x1b[0m\x1b[?7l")?;
        self.last_fg = None;
        self.last_bg = None;

        for row in 0..visual_rows {
            for x in 0..cols {
                let top = frame.sample(x, row * 2);
                let bottom = frame.sample(x, row * 2 + 1);
                if self.last_fg != Some(top) {
                    write!(out, "\x1b[38;2;{};{};{}m", top.0, top.1, top.2)?;
                    self.last_fg = Some(top);
                }
                if self.last_bg != Some(bottom) {
                    write!(out, "\x1b[48;2;{};{};{}m", bottom.0, bottom.1, bottom.2)?;
                    self.last_bg = Some(bottom);
                }
                write!(out, "{HALF_BLOCK}")?;
            }
            out.write_all(b"\r\n")?;
        }

        let mut hud_lines = frame.hud.lines();
        for i in 0..frame.hud_rows as usize {
            write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", visual_rows + i + 1)?;
            if let Some(line) = hud_lines.next() {
                let clipped: String = line.chars().take(cols).collect();
                write!(out, "{clipped}")?;
            }
        }

        if let Some(text) = frame.overlay {
            draw_overlay_popup(out, frame.term_cols, frame.term_rows, text)?;
        }

        out.write_all(b"\x1b[?7h")?;
        if frame.sync_updates {
            out.write_all(b"\x1b[?2026l")?;
        }
        out.flush()?;
        Ok(())
    }
}
