//! Retained-mode drawing onto an RGBA8 frame.
//!
//! Widgets describe a frame as a [`Scene`] of [`DrawCommand`]s; the scene is
//! then rasterized onto a [`Canvas`] wrapping the frame buffer.

use std::path::Path;
use std::sync::Once;

use rusttype::{point, Font, PositionedGlyph, Scale};
use tracing::{debug, warn};

use crate::color::Color;
use crate::config::StrokeCap;
use crate::error::{GaugeError, Result};
use crate::scale::ArcSpan;

// ============================================================================
// GEOMETRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }
}

// ============================================================================
// PAINT & COMMANDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Linear gradient between two points, clamped past either end.
    LinearGradient {
        from: (f32, f32),
        to: (f32, f32),
        from_color: Color,
        to_color: Color,
    },
}

impl Paint {
    fn color_at(&self, x: f32, y: f32) -> Color {
        match *self {
            Paint::Solid(color) => color,
            Paint::LinearGradient {
                from,
                to,
                from_color,
                to_color,
            } => {
                let (dx, dy) = (to.0 - from.0, to.1 - from.1);
                let len_sq = dx * dx + dy * dy;
                if len_sq <= f32::EPSILON {
                    return from_color;
                }
                let t = ((x - from.0) * dx + (y - from.1) * dy) / len_sq;
                from_color.mix(to_color, t)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    /// Arc stroked along the circle inscribed in `rect`.
    Arc {
        rect: Rect,
        span: ArcSpan,
        stroke_width: f32,
        cap: StrokeCap,
        paint: Paint,
    },
    /// Text centered on `(x, y)`.
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        color: Color,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
}

#[derive(Debug, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = DrawCommand>) {
        self.commands.extend(commands);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn render(&self, canvas: &mut Canvas, font: Option<&LabelFont>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Arc {
                    rect,
                    span,
                    stroke_width,
                    cap,
                    paint,
                } => draw_arc(canvas, rect, *span, *stroke_width, *cap, paint),
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    size,
                    color,
                } => match font {
                    Some(font) => draw_text(canvas, *x, *y, text, font, *size, *color),
                    None => {
                        static MISSING_FONT: Once = Once::new();
                        MISSING_FONT.call_once(|| warn!("no label font loaded, skipping text"));
                    }
                },
                DrawCommand::FillRect { rect, color } => fill_rect(canvas, rect, *color),
            }
        }
    }
}

// ============================================================================
// CANVAS
// ============================================================================

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// Wraps an RGBA8 frame of `width * height * 4` bytes. A frame shorter
    /// than that limits the canvas to the rows it actually holds.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        let rows = if width == 0 { 0 } else { frame.len() / (width * 4) };
        if rows < height {
            warn!(width, height, len = frame.len(), "frame smaller than canvas size");
        }
        let height = height.min(rows);
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some(Color::new(
            self.frame[idx],
            self.frame[idx + 1],
            self.frame[idx + 2],
        ))
    }

    /// Source-over blend of `color` at coverage `alpha`; out of bounds is a no-op.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let idx = (y as usize * self.width + x as usize) * 4;
        let dst = &mut self.frame[idx..idx + 4];
        let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        dst[0] = blend(color.r, dst[0]);
        dst[1] = blend(color.g, dst[1]);
        dst[2] = blend(color.b, dst[2]);
        dst[3] = 0xff;
    }
}

// ============================================================================
// FONTS
// ============================================================================

pub struct LabelFont {
    font: Font<'static>,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl LabelFont {
    const SYSTEM_CANDIDATES: [&'static str; 5] = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(data)
            .ok_or_else(|| GaugeError::Font("data is not a TrueType/OpenType font".to_string()))?;
        Ok(Self { font })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let font = Self::from_bytes(data)
            .map_err(|e| GaugeError::Font(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded label font");
        Ok(font)
    }

    /// First loadable font from a few well-known system locations.
    pub fn find_system() -> Option<Self> {
        Self::SYSTEM_CANDIDATES
            .iter()
            .find_map(|path| Self::from_file(path).ok())
    }
}

// ============================================================================
// RASTERIZATION
// ============================================================================

fn normalize_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

fn span_contains(span: ArcSpan, angle: f64) -> bool {
    if span.sweep.abs() >= 360.0 {
        return true;
    }
    let (start, sweep) = if span.sweep < 0.0 {
        (span.start + span.sweep, -span.sweep)
    } else {
        (span.start, span.sweep)
    };
    normalize_degrees(angle - start) <= sweep
}

fn draw_arc(
    canvas: &mut Canvas,
    rect: &Rect,
    span: ArcSpan,
    stroke_width: f32,
    cap: StrokeCap,
    paint: &Paint,
) {
    let (cx, cy) = rect.center();
    let (cx, cy) = (cx as f64, cy as f64);
    let r = (rect.width().min(rect.height()) / 2.0) as f64;
    let half = stroke_width as f64 / 2.0;
    if r <= 0.0 || half <= 0.0 {
        return;
    }

    let caps = if cap == StrokeCap::Round && span.sweep.abs() < 360.0 {
        let end = |deg: f64| {
            let a = deg.to_radians();
            (cx + a.cos() * r, cy + a.sin() * r)
        };
        Some([end(span.start), end(span.start + span.sweep)])
    } else {
        None
    };

    let reach = r + half + 1.0;
    let min_x = (cx - reach).floor().max(0.0) as i32;
    let max_x = (cx + reach).ceil().min(canvas.width as f64) as i32;
    let min_y = (cy - reach).floor().max(0.0) as i32;
    let max_y = (cy + reach).ceil().min(canvas.height as f64) as i32;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let px = x as f64 + 0.5;
            let py = y as f64 + 0.5;
            let dx = px - cx;
            let dy = py - cy;
            let dist = (dx * dx + dy * dy).sqrt();

            let mut coverage = 0.0;
            if span_contains(span, dy.atan2(dx).to_degrees()) {
                coverage = (half + 0.5 - (dist - r).abs()).clamp(0.0, 1.0);
            }
            if let Some(ends) = caps {
                for (ex, ey) in ends {
                    let d = ((px - ex).powi(2) + (py - ey).powi(2)).sqrt();
                    coverage = f64::max(coverage, (half + 0.5 - d).clamp(0.0, 1.0));
                }
            }

            if coverage > 0.01 {
                let color = paint.color_at(px as f32, py as f32);
                canvas.blend_pixel(x, y, color, coverage as f32);
            }
        }
    }
}

fn fill_rect(canvas: &mut Canvas, rect: &Rect, color: Color) {
    let min_x = rect.left.round().max(0.0) as i32;
    let max_x = rect.right.round().min(canvas.width as f32) as i32;
    let min_y = rect.top.round().max(0.0) as i32;
    let max_y = rect.bottom.round().min(canvas.height as f32) as i32;
    for y in min_y..max_y {
        for x in min_x..max_x {
            canvas.blend_pixel(x, y, color, 1.0);
        }
    }
}

fn draw_text(
    canvas: &mut Canvas,
    x: f32,
    y: f32,
    text: &str,
    font: &LabelFont,
    size: f32,
    color: Color,
) {
    let scale = Scale::uniform(size);
    let v_metrics = font.font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    // Bounding box of the whole string
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x.round() as i32 - width_px / 2;
    let offset_y = y.round() as i32 - height_px / 2;
    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                if v > 0.01 {
                    canvas.blend_pixel(px, py, color, v);
                }
            });
        }
    }
}
