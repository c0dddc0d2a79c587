use fieldfx::engine::FrameBuffer;
use fieldfx::render::{draw_overlay_popup, Frame, HalfBlockRenderer, Renderer};
use fieldfx::terminal::Layout;

/// Image filled with one color.
fn solid_image(w: u32, h: u32, rgb: (u8, u8, u8)) -> FrameBuffer {
    let mut pixels = vec![0u8; (w * h * 4) as usize];
    for px in pixels.chunks_exact_mut(4) {
        px.copy_from_slice(&[rgb.0, rgb.1, rgb.2, 255]);
    }
    FrameBuffer {
        width: w,
        height: h,
        frame_index: 1,
        time: 0.0,
        effect_id: "test",
        pixels,
    }
}

/// Top half one color, bottom half another.
fn split_image(w: u32, h: u32) -> FrameBuffer {
    let mut img = solid_image(w, h, (10, 20, 30));
    for y in h / 2..h {
        for x in 0..w {
            let i = ((y * w + x) * 4) as usize;
            img.pixels[i..i + 3].copy_from_slice(&[200, 100, 50]);
        }
    }
    img
}

fn make_frame<'a>(cols: u16, visual_rows: u16, image: &'a FrameBuffer, hud: &'a str, sync: bool) -> Frame<'a> {
    Frame {
        term_cols: cols,
        term_rows: visual_rows + 1,
        visual_rows,
        image,
        hud,
        hud_rows: 1,
        overlay: None,
        sync_updates: sync,
    }
}

fn render(frame: &Frame<'_>) -> String {
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(frame, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn halfblock_paints_every_cell_and_the_hud() {
    let img = solid_image(8, 8, (200, 200, 200));
    let frame = make_frame(8, 4, &img, "Effect: Voronoi | FPS 60", true);
    let s = render(&frame);
    assert!(s.contains("\x1b[?2026h") && s.contains("\x1b[?2026l"));
    assert!(s.contains("\x1b[?7l") && s.contains("\x1b[?7h"));
    assert_eq!(s.matches('\u{2580}').count(), 8 * 4);
    assert!(s.contains("38;2;200;200;200"));
    assert!(s.contains("48;2;200;200;200"));
    assert!(s.contains("Effect: Voronoi"));
}

#[test]
fn halfblock_reuses_colors_between_cells() {
    let img = solid_image(4, 4, (1, 2, 3));
    let s = render(&make_frame(4, 2, &img, "", false));
    assert_eq!(s.matches("38;2;1;2;3").count(), 1);
    assert!(!s.contains("\x1b[?2026h"));
}

#[test]
fn halfblock_maps_top_and_bottom_pixels_to_fg_and_bg() {
    let img = split_image(2, 2);
    let s = render(&make_frame(2, 1, &img, "", false));
    assert!(s.contains("38;2;10;20;30"));
    assert!(s.contains("48;2;200;100;50"));
}

#[test]
fn mismatched_image_is_stretched_to_the_terminal() {
    // Frame rendered before a resize: smaller than the cell grid.
    let img = split_image(3, 2);
    let s = render(&make_frame(12, 6, &img, "", false));
    assert_eq!(s.matches('\u{2580}').count(), 12 * 6);
    assert!(s.contains("38;2;10;20;30"));
    assert!(s.contains("200;100;50"));
}

#[test]
fn zero_sized_terminal_writes_nothing() {
    let img = solid_image(1, 1, (0, 0, 0));
    let mut frame = make_frame(0, 0, &img, "", false);
    frame.hud_rows = 0;
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn hud_lines_are_clipped_to_the_width() {
    let img = solid_image(4, 2, (5, 5, 5));
    let s = render(&make_frame(4, 1, &img, "ABCDEFGH", false));
    assert!(s.contains("ABCD"));
    assert!(!s.contains("ABCDE"));
}

#[test]
fn frame_sampling_handles_empty_images() {
    let img = FrameBuffer {
        width: 0,
        height: 0,
        frame_index: 0,
        time: 0.0,
        effect_id: "empty",
        pixels: Vec::new(),
    };
    let frame = make_frame(4, 2, &img, "", false);
    assert_eq!(frame.sample(3, 3), (0, 0, 0));
}

#[test]
fn overlay_popup_draws_a_titled_box() {
    let mut out = Vec::new();
    draw_overlay_popup(&mut out, 40, 12, "Keys\nq quit").unwrap();
    let s = String::from_utf8(out).unwrap();
    assert!(s.contains("+"));
    assert!(s.contains("\x1b[1mKeys"));
    assert!(s.contains("q quit"));

    let mut tiny = Vec::new();
    draw_overlay_popup(&mut tiny, 4, 2, "Keys").unwrap();
    assert!(tiny.is_empty());
}

#[test]
fn halfblock_pixel_grid_is_two_rows_per_cell() {
    assert_eq!(HalfBlockRenderer::pixel_size(80, 22), (80, 44));
    assert_eq!(HalfBlockRenderer::pixel_size(0, 0), (1, 2));
    assert_eq!(HalfBlockRenderer::new().name(), "halfblock");
}

#[test]
fn layout_reserves_hud_rows_below_the_image() {
    let full = Layout::measure((80, 24), true);
    assert_eq!((full.hud_rows, full.visual_rows), (2, 22));
    assert_eq!(full.viewport().physical(), (80, 44));

    let bare = Layout::measure((80, 24), false);
    assert_eq!((bare.hud_rows, bare.visual_rows), (0, 24));

    let short = Layout::measure((80, 2), true);
    assert_eq!((short.hud_rows, short.visual_rows), (1, 1));
    let single = Layout::measure((80, 1), true);
    assert_eq!((single.hud_rows, single.visual_rows), (0, 1));

    let empty = Layout::measure((0, 0), true);
    assert_eq!(empty.visual_rows, 1);
    assert_eq!(empty.viewport().physical(), (1, 2));
}
