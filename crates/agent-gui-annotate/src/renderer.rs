use image::Rgba;
use image::RgbaImage;
use thiserror::Error;
use tracing::debug;

use agent_gui_core::Rect;
use agent_gui_core::UiMap;
use agent_gui_session::SessionError;
use agent_gui_session::SessionStore;

use crate::glyphs::{GLYPH_HEIGHT, GLYPH_WIDTH, glyph};

const FILL_ALPHA: u8 = 64;
const BADGE_PADDING: u32 = 2;

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Session has no screenshot to annotate")]
    MissingScreenshot,
    #[error("Session has never been captured")]
    MissingSession,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Highlight color per ID prefix, so element kinds are tellable apart at a
/// glance.
fn prefix_color(prefix: char) -> Rgba<u8> {
    match prefix {
        'B' => Rgba([255, 59, 48, 255]),
        'T' => Rgba([0, 122, 255, 255]),
        'C' => Rgba([52, 199, 89, 255]),
        'L' => Rgba([175, 82, 222, 255]),
        'S' => Rgba([255, 149, 0, 255]),
        'R' => Rgba([90, 200, 250, 255]),
        'M' => Rgba([88, 86, 214, 255]),
        _ => Rgba([142, 142, 147, 255]),
    }
}

/// Render the overlay: for every actionable element, a translucent fill,
/// a solid border, and an ID badge anchored at the rectangle's top-left.
///
/// Non-actionable elements are never drawn. Output dimensions equal input
/// dimensions exactly; frames falling outside the image are clamped away.
pub fn render(base: &RgbaImage, ui_map: &UiMap, window_bounds: Option<&Rect>) -> RgbaImage {
    let mut out = base.clone();
    let image_height = base.height() as f64;

    let mut drawn = 0usize;
    for element in ui_map.values() {
        if !element.is_actionable {
            continue;
        }

        let mut frame = element.frame;
        if let Some(window) = window_bounds {
            frame = frame.window_relative(window);
        }
        let local = frame.image_local(image_height);

        let Some((x0, y0, x1, y1)) = clamp_rect(&local, out.width(), out.height()) else {
            continue;
        };

        let color = prefix_color(element.id.chars().next().unwrap_or('G'));
        fill_translucent(&mut out, x0, y0, x1, y1, color);
        stroke_border(&mut out, x0, y0, x1, y1, color);
        draw_badge(&mut out, x0, y0, &element.id, color);
        drawn += 1;
    }

    debug!(drawn, total = ui_map.len(), "Rendered annotation overlay");
    out
}

/// Load the session's raw screenshot, render the overlay, and persist it as
/// `annotated.png`, recording the path in the snapshot.
pub fn annotate_session(store: &SessionStore) -> Result<std::path::PathBuf, AnnotateError> {
    let mut data = store.load()?.ok_or(AnnotateError::MissingSession)?;
    let paths = store.paths();
    if !paths.raw.exists() {
        return Err(AnnotateError::MissingScreenshot);
    }

    let base = image::open(&paths.raw)?.to_rgba8();
    let annotated = render(&base, &data.ui_map, data.window_bounds.as_ref());
    annotated.save(&paths.annotated)?;

    data.annotated_path = Some(paths.annotated.display().to_string());
    data.touch();
    store.save(&data)?;
    Ok(paths.annotated)
}

/// Clamp a rectangle to image bounds, returning inclusive-exclusive pixel
/// ranges, or `None` when nothing of it is visible.
fn clamp_rect(rect: &Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let x0 = rect.x.max(0.0) as u32;
    let y0 = rect.y.max(0.0) as u32;
    let x1 = ((rect.x + rect.width).min(width as f64)).max(0.0) as u32;
    let y1 = ((rect.y + rect.height).min(height as f64)).max(0.0) as u32;
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

fn blend(pixel: &mut Rgba<u8>, color: Rgba<u8>, alpha: u8) {
    let a = alpha as u32;
    for channel in 0..3 {
        let src = color.0[channel] as u32;
        let dst = pixel.0[channel] as u32;
        pixel.0[channel] = ((src * a + dst * (255 - a)) / 255) as u8;
    }
    pixel.0[3] = 255;
}

fn fill_translucent(image: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    for y in y0..y1 {
        for x in x0..x1 {
            blend(image.get_pixel_mut(x, y), color, FILL_ALPHA);
        }
    }
}

fn stroke_border(image: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    for x in x0..x1 {
        *image.get_pixel_mut(x, y0) = color;
        *image.get_pixel_mut(x, y1 - 1) = color;
    }
    for y in y0..y1 {
        *image.get_pixel_mut(x0, y) = color;
        *image.get_pixel_mut(x1 - 1, y) = color;
    }
}

/// Stamp the ID badge: solid background in the element color, white glyphs.
fn draw_badge(image: &mut RgbaImage, x0: u32, y0: u32, id: &str, color: Rgba<u8>) {
    let glyph_count = id.chars().filter(|c| glyph(*c).is_some()).count() as u32;
    if glyph_count == 0 {
        return;
    }
    let badge_width = glyph_count * (GLYPH_WIDTH + 1) + 2 * BADGE_PADDING;
    let badge_height = GLYPH_HEIGHT + 2 * BADGE_PADDING;

    let x1 = (x0 + badge_width).min(image.width());
    let y1 = (y0 + badge_height).min(image.height());
    for y in y0..y1 {
        for x in x0..x1 {
            *image.get_pixel_mut(x, y) = color;
        }
    }

    let white = Rgba([255, 255, 255, 255]);
    let mut pen_x = x0 + BADGE_PADDING;
    let pen_y = y0 + BADGE_PADDING;
    for c in id.chars() {
        let Some(bitmap) = glyph(c) else {
            continue;
        };
        for (row, bits) in bitmap.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let x = pen_x + col;
                let y = pen_y + row as u32;
                if x < image.width() && y < image.height() {
                    *image.get_pixel_mut(x, y) = white;
                }
            }
        }
        pen_x += GLYPH_WIDTH + 1;
    }
}
