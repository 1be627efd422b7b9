use std::path::PathBuf;
use std::time::Duration;

use bon::Builder;

use crate::render::Rect;

/// Color representation for compass elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Builder)]
pub struct CompassConfig {
    #[builder(default = "Compass".to_string())]
    pub title: String,

    // Display configuration, in device pixels
    #[builder(default = 144)]
    pub display_width: u32,
    #[builder(default = 168)]
    pub display_height: u32,
    #[builder(default = 3)]
    pub window_scale: u32,
    // How long the event loop sleeps before checking the update channel
    #[builder(default = Duration::from_millis(50))]
    pub poll_interval: Duration,

    // Bezel configuration
    #[builder(default = 55)]
    pub bezel_radius: i32,
    #[builder(default = 8)]
    pub bezel_width: i32,

    // Direction markers
    #[builder(default = 15)]
    pub marker_half_size: i32,
    #[builder(default = Rect::new(-12, -16, 24, 24))]
    pub marker_label_box: Rect,

    // Heading readout, relative to the display
    #[builder(default = Rect::new(27, 42, 90, 75))]
    pub heading_box: Rect,
    #[builder(default = 45)]
    pub sector_label_height: i32,
    #[builder(default = 40)]
    pub readout_offset: i32,
    #[builder(default = 35)]
    pub readout_height: i32,

    // Font configuration
    pub font_path: Option<PathBuf>,
    #[builder(default = 42.0)]
    pub sector_font_size: f32,
    #[builder(default = 24.0)]
    pub small_font_size: f32,

    // Colors
    #[builder(default = Color::WHITE)]
    pub foreground: Color,
    #[builder(default = Color::BLACK)]
    pub background: Color,
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CompassConfig {
    pub fn sector_label_box(&self) -> Rect {
        Rect::new(
            self.heading_box.x,
            self.heading_box.y,
            self.heading_box.w,
            self.sector_label_height,
        )
    }

    pub fn readout_box(&self) -> Rect {
        Rect::new(
            self.heading_box.x,
            self.heading_box.y + self.readout_offset,
            self.heading_box.w,
            self.readout_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_device_layout() {
        let config = CompassConfig::default();
        assert_eq!((config.display_width, config.display_height), (144, 168));
        assert_eq!(config.bezel_radius, 55);
        assert_eq!(config.sector_label_box(), Rect::new(27, 42, 90, 45));
        assert_eq!(config.readout_box(), Rect::new(27, 82, 90, 35));
        assert!(config.font_path.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = CompassConfig::builder()
            .bezel_radius(40)
            .foreground(Color::new(0xff, 0x80, 0x00))
            .font_path(PathBuf::from("/tmp/font.ttf"))
            .build();
        assert_eq!(config.bezel_radius, 40);
        assert_eq!(config.foreground.as_tuple(), (0xff, 0x80, 0x00));
        assert_eq!(config.background, Color::BLACK);
        assert_eq!(config.font_path, Some(PathBuf::from("/tmp/font.ttf")));
    }
}
