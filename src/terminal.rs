use crate::engine::Viewport;
use crate::render::HalfBlockRenderer;
use anyhow::Context;
use crossterm::{
    cursor,
    terminal::{self, ClearType},
    ExecutableCommand,
};
use std::io::{stdout, Stdout, Write};

/// Most status lines the HUD takes from the bottom of the screen.
pub const MAX_HUD_ROWS: u16 = 2;

/// Split of the terminal between the effect image and the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub cols: u16,
    pub rows: u16,
    pub hud_rows: u16,
    pub visual_rows: u16,
}

impl Layout {
    /// The HUD never takes the last image row.
    pub fn measure(size: (u16, u16), show_hud: bool) -> Self {
        let (cols, rows) = size;
        let hud_rows = if show_hud && rows > 1 {
            (rows - 1).min(MAX_HUD_ROWS)
        } else {
            0
        };
        Self {
            cols,
            rows,
            hud_rows,
            visual_rows: rows.saturating_sub(hud_rows).max(1),
        }
    }

    /// Pixels the engine renders for the image area.
    pub fn viewport(&self) -> Viewport {
        let (w, h) = HalfBlockRenderer::pixel_size(self.cols, self.visual_rows);
        Viewport::new(w, h, 1.0)
    }
}

/// Raw mode, alternate screen and hidden cursor for the lifetime of the
/// guard. Drop restores whatever the renderer may have switched on.
pub struct TerminalGuard {
    sync_updates: bool,
}

impl TerminalGuard {
    pub fn new(sync_updates: bool) -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        // Constructed first: a failed step below still leaves raw mode.
        let guard = Self { sync_updates };
        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)
            .context("enter alternate screen")?;
        out.execute(terminal::Clear(ClearType::All))
            .context("clear screen")?;
        out.execute(cursor::Hide).context("hide cursor")?;
        Ok(guard)
    }

    pub fn stdout(&self) -> Stdout {
        stdout()
    }

    pub fn size(&self) -> anyhow::Result<(u16, u16)> {
        terminal::size().context("query terminal size")
    }

    pub fn layout(&self, show_hud: bool) -> anyhow::Result<Layout> {
        Ok(Layout::measure(self.size()?, show_hud))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let mut out = stdout();
        if self.sync_updates {
            let _ = out.write_all(b"\x1b[?2026l");
        }
        let _ = out.write_all(b"\x1b[?7h\x1b[0m");
        let _ = out.flush();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
    }
}
