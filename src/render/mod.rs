mod halfblock;

pub use halfblock::HalfBlockRenderer;

use crate::engine::FrameBuffer;
use std::io::Write;

/// One terminal repaint: the latest completed image plus the status area.
pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub image: &'a FrameBuffer,
    pub hud: &'a str,
    pub hud_rows: u16,
    pub overlay: Option<&'a str>,
    pub sync_updates: bool,
}

impl Frame<'_> {
    /// Image pixel shown at cell-space pixel `(x, y)`, where the cell grid
    /// is `term_cols` by `visual_rows * 2`. The image is stretched to fit,
    /// so a frame rendered before a resize still fills the screen.
    pub fn sample(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let cols = (self.term_cols as usize).max(1);
        let rows = (self.visual_rows as usize * 2).max(1);
        let iw = self.image.width as usize;
        let ih = self.image.height as usize;
        if iw == 0 || ih == 0 {
            return (0, 0, 0);
        }
        let sx = (x * iw / cols).min(iw - 1);
        let sy = (y * ih / rows).min(ih - 1);
        let i = (sy * iw + sx) * 4;
        match self.image.pixels.get(i..i + 3) {
            Some(px) => (px[0], px[1], px[2]),
            None => (0, 0, 0),
        }
    }
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Centered boxed text over a dark backdrop. First line is drawn as a title.
pub fn draw_overlay_popup(
    out: &mut dyn Write,
    term_cols: u16,
    term_rows: u16,
    text: &str,
) -> anyhow::Result<()> {
    let cols = term_cols as usize;
    let rows = term_rows as usize;
    if text.trim().is_empty() || cols < 8 || rows < 4 {
        return Ok(());
    }

    let inner_max = cols.saturating_sub(6).max(1);
    let lines: Vec<String> = text
        .lines()
        .map(|l| l.chars().take(inner_max).collect())
        .collect();
    let inner_w = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(1, inner_max);
    let body_h = lines.len().min(rows.saturating_sub(3).max(1));
    let box_w = inner_w + 4;
    let box_h = body_h + 2;
    let left = cols.saturating_sub(box_w) / 2 + 1;
    let top = rows.saturating_sub(box_h) / 2 + 1;
    let border = "-".repeat(box_w - 2);

    out.write_all(b"\x1b[0m\x1b[38;2;230;236;250m\x1b[48;2;8;10;18m")?;
    write!(out, "\x1b[{top};{left}H+{border}+")?;
    for (i, line) in lines.iter().take(body_h).enumerate() {
        let row = top + 1 + i;
        let pad = inner_w.saturating_sub(line.chars().count());
        if i == 0 {
            write!(
                out,
                "\x1b[{row};{left}H| \x1b[1m{line}\x1b[22m{:pad$} |",
                ""
            )?;
        } else {
            write!(out, "\x1b[{row};{left}H| {line}{:pad$} |", "")?;
        }
    }
    write!(out, "\x1b[{};{left}H+{border}+", top + box_h - 1)?;
    out.write_all(b"\x1b[0m")?;
    Ok(())
}
