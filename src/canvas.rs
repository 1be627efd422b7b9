// ============================================================================
// PIXEL CANVAS
// ============================================================================

use std::path::Path;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::error::CompassError;
use crate::projector::ScreenPoint;
use crate::render::{FontKind, PresentationSurface, Rect, TextAlignment, TextOverflow};
use crate::trig::TRIG_MAX_ANGLE;

pub fn load_font(path: &Path) -> Result<Font<'static>, CompassError> {
    let data = std::fs::read(path).map_err(|source| CompassError::FontIo {
        path: path.to_path_buf(),
        source,
    })?;
    Font::try_from_vec(data).ok_or_else(|| CompassError::FontData(path.to_path_buf()))
}

/// Font and the two sizes the compass uses.
pub struct Typeface {
    pub font: Font<'static>,
    pub large: Scale,
    pub small: Scale,
}

impl Typeface {
    pub fn new(font: Font<'static>, large_size: f32, small_size: f32) -> Self {
        Self {
            font,
            large: Scale::uniform(large_size),
            small: Scale::uniform(small_size),
        }
    }

    fn scale(&self, kind: FontKind) -> Scale {
        match kind {
            FontKind::Large => self.large,
            FontKind::Small => self.small,
        }
    }
}

/// RGBA frame buffer implementing the presentation surface. Text is skipped
/// when no typeface is available.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    fill_color: Color,
    text_color: Color,
    typeface: Option<&'a Typeface>,
}

impl<'a> Canvas<'a> {
    pub fn new(
        frame: &'a mut [u8],
        width: usize,
        height: usize,
        typeface: Option<&'a Typeface>,
    ) -> Self {
        Self {
            frame,
            width,
            height,
            fill_color: Color::WHITE,
            text_color: Color::WHITE,
            typeface,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<(u8, u8, u8)> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            Some((self.frame[idx], self.frame[idx + 1], self.frame[idx + 2]))
        } else {
            None
        }
    }

    fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x >= 0 && y >= 0 {
            set_pixel(self.frame, self.width, x as usize, y as usize, color, alpha);
        }
    }
}

impl PresentationSurface for Canvas<'_> {
    fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: i32) {
        let color = self.fill_color;
        for y in -radius - 1..=radius + 1 {
            for x in -radius - 1..=radius + 1 {
                let dist = ((x * x + y * y) as f64).sqrt();
                let aa = if dist > radius as f64 {
                    1.0 - (dist - radius as f64).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.0 {
                    self.blend(center.x + x, center.y + y, color, aa as f32);
                }
            }
        }
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], offset: ScreenPoint, rotation: i32) {
        if points.len() < 3 {
            return;
        }
        let radians = rotation as f64 * std::f64::consts::TAU / TRIG_MAX_ANGLE as f64;
        let (sin, cos) = radians.sin_cos();
        // Clockwise rotation in y-down screen space.
        let corners: Vec<(f64, f64)> = points
            .iter()
            .map(|p| {
                let (x, y) = (p.x as f64, p.y as f64);
                (
                    offset.x as f64 + x * cos - y * sin,
                    offset.y as f64 + x * sin + y * cos,
                )
            })
            .collect();

        let (min_x, max_x, min_y, max_y) = corners.iter().fold(
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
            |(min_x, max_x, min_y, max_y), &(x, y)| {
                (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y))
            },
        );

        let color = self.fill_color;
        for y in min_y.floor() as i32..=max_y.ceil() as i32 {
            for x in min_x.floor() as i32..=max_x.ceil() as i32 {
                if inside_convex(&corners, x as f64 + 0.5, y as f64 + 0.5) {
                    self.blend(x, y, color, 1.0);
                }
            }
        }
    }

    fn draw_text(
        &mut self,
        text: &str,
        font: FontKind,
        rect: Rect,
        overflow: TextOverflow,
        alignment: TextAlignment,
    ) {
        let Some(typeface) = self.typeface else {
            return;
        };
        let scale = typeface.scale(font);
        let v_metrics = typeface.font.v_metrics(scale);
        let line_height = (v_metrics.ascent - v_metrics.descent + v_metrics.line_gap).ceil() as i32;

        let lines = match overflow {
            TextOverflow::WordWrap => wrap_words(text, &typeface.font, scale, rect.w as f32),
            TextOverflow::Clip => vec![text.to_string()],
        };

        let color = self.text_color;
        for (row, line) in lines.iter().enumerate() {
            let line_width = text_width(line, &typeface.font, scale).ceil() as i32;
            let left = match alignment {
                TextAlignment::Left => rect.x,
                TextAlignment::Center => rect.x + (rect.w - line_width) / 2,
                TextAlignment::Right => rect.x + rect.w - line_width,
            };
            let baseline = rect.y + row as i32 * line_height + v_metrics.ascent.round() as i32;
            let glyphs: Vec<PositionedGlyph> = typeface
                .font
                .layout(line, scale, point(left as f32, baseline as f32))
                .collect();
            for glyph in glyphs {
                if let Some(bb) = glyph.pixel_bounding_box() {
                    glyph.draw(|gx, gy, v| {
                        let px = bb.min.x + gx as i32;
                        let py = bb.min.y + gy as i32;
                        let clipped = overflow == TextOverflow::Clip
                            && (px < rect.x
                                || px >= rect.x + rect.w
                                || py < rect.y
                                || py >= rect.y + rect.h);
                        if !clipped {
                            self.blend(px, py, color, v);
                        }
                    });
                }
            }
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn inside_convex(corners: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut sign = 0.0_f64;
    for (i, &(x0, y0)) in corners.iter().enumerate() {
        let (x1, y1) = corners[(i + 1) % corners.len()];
        let cross = (x1 - x0) * (y - y0) - (y1 - y0) * (x - x0);
        if cross != 0.0 {
            if sign != 0.0 && cross.signum() != sign {
                return false;
            }
            sign = cross.signum();
        }
    }
    true
}

fn text_width(text: &str, font: &Font, scale: Scale) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

fn wrap_words(text: &str, font: &Font, scale: Scale, max_width: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || text_width(&candidate, font, scale) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn set_pixel(frame: &mut [u8], width: usize, x: usize, y: usize, color: Color, alpha: f32) {
    if x < width && y < frame.len() / (width * 4) {
        let idx = (y * width + x) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for (channel, value) in src.iter().enumerate() {
            let dst = frame[idx + channel] as f32;
            frame[idx + channel] = (value * a + dst * (1.0 - a)).round() as u8;
        }
        frame[idx + 3] = 0xff;
    }
}
