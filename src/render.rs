// ============================================================================
// COMPASS RENDERING
// ============================================================================

use crate::config::{Color, CompassConfig};
use crate::heading::{CompassState, HeadingStatus, Sector};
use crate::projector::{project, ScreenPoint};
use crate::trig::TrigLookup;

const CARDINALS: [(i32, &str); 4] = [(0, "N"), (90, "E"), (180, "S"), (270, "W")];

const WAITING_MESSAGE: &str = "Waiting for Heading";
const PERMISSION_DENIED_MESSAGE: &str = "Permission Denied";
const UNAVAILABLE_MESSAGE: &str = "Heading Unavailable";
const TIMEOUT_MESSAGE: &str = "Heading Timed Out";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub const fn translate(self, by: ScreenPoint) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.w, self.h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontKind {
    Large,
    Small,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextAlignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextOverflow {
    WordWrap,
    Clip,
}

/// Drawing capabilities the renderer needs from whatever shows the compass.
pub trait PresentationSurface {
    fn clear(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_text_color(&mut self, color: Color);
    fn fill_circle(&mut self, center: ScreenPoint, radius: i32);
    /// Fills the convex polygon `points`, rotated by `rotation` angle units
    /// about its origin and then moved to `offset`.
    fn fill_polygon(&mut self, points: &[ScreenPoint], offset: ScreenPoint, rotation: i32);
    fn draw_text(
        &mut self,
        text: &str,
        font: FontKind,
        rect: Rect,
        overflow: TextOverflow,
        alignment: TextAlignment,
    );
}

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCommand {
    Clear(Color),
    SetFillColor(Color),
    SetTextColor(Color),
    FillCircle {
        center: ScreenPoint,
        radius: i32,
    },
    FillPolygon {
        points: Vec<ScreenPoint>,
        offset: ScreenPoint,
        rotation: i32,
    },
    Text {
        text: String,
        font: FontKind,
        rect: Rect,
        overflow: TextOverflow,
        alignment: TextAlignment,
    },
}

/// A surface that records draw calls so they can be compared or replayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Texts drawn, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn replay<S: PresentationSurface + ?Sized>(&self, surface: &mut S) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => surface.clear(*color),
                DrawCommand::SetFillColor(color) => surface.set_fill_color(*color),
                DrawCommand::SetTextColor(color) => surface.set_text_color(*color),
                DrawCommand::FillCircle { center, radius } => surface.fill_circle(*center, *radius),
                DrawCommand::FillPolygon {
                    points,
                    offset,
                    rotation,
                } => surface.fill_polygon(points, *offset, *rotation),
                DrawCommand::Text {
                    text,
                    font,
                    rect,
                    overflow,
                    alignment,
                } => surface.draw_text(text, *font, *rect, *overflow, *alignment),
            }
        }
    }
}

impl PresentationSurface for Scene {
    fn clear(&mut self, color: Color) {
        self.add_command(DrawCommand::Clear(color));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.add_command(DrawCommand::SetFillColor(color));
    }

    fn set_text_color(&mut self, color: Color) {
        self.add_command(DrawCommand::SetTextColor(color));
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: i32) {
        self.add_command(DrawCommand::FillCircle { center, radius });
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], offset: ScreenPoint, rotation: i32) {
        self.add_command(DrawCommand::FillPolygon {
            points: points.to_vec(),
            offset,
            rotation,
        });
    }

    fn draw_text(
        &mut self,
        text: &str,
        font: FontKind,
        rect: Rect,
        overflow: TextOverflow,
        alignment: TextAlignment,
    ) {
        self.add_command(DrawCommand::Text {
            text: text.to_string(),
            font,
            rect,
            overflow,
            alignment,
        });
    }
}

// ============================================================================
// READOUT
// ============================================================================

/// The status-dependent text shown inside the bezel. Exactly one of
/// `message` or the sector/degrees pair is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingReadout {
    pub sector: Option<Sector>,
    pub degrees: Option<String>,
    pub message: Option<&'static str>,
}

impl HeadingReadout {
    pub fn from_state(state: &CompassState) -> Self {
        match state.status() {
            HeadingStatus::Success => Self {
                sector: state.sector(),
                degrees: Some(state.angle().to_string()),
                message: None,
            },
            status => Self {
                sector: None,
                degrees: None,
                message: status_message(status),
            },
        }
    }
}

pub fn status_message(status: HeadingStatus) -> Option<&'static str> {
    match status {
        HeadingStatus::Success => None,
        HeadingStatus::Waiting | HeadingStatus::NotMoving => Some(WAITING_MESSAGE),
        HeadingStatus::PermissionDenied => Some(PERMISSION_DENIED_MESSAGE),
        HeadingStatus::PositionUnavailable => Some(UNAVAILABLE_MESSAGE),
        HeadingStatus::Timeout => Some(TIMEOUT_MESSAGE),
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn marker_square(half_size: i32) -> [ScreenPoint; 4] {
    [
        ScreenPoint::new(-half_size, -half_size),
        ScreenPoint::new(-half_size, half_size),
        ScreenPoint::new(half_size, half_size),
        ScreenPoint::new(half_size, -half_size),
    ]
}

/// Issues the draw calls for one frame of the compass face. Output depends
/// only on the arguments.
pub fn render<S, T>(surface: &mut S, state: &CompassState, config: &CompassConfig, trig: &T)
where
    S: PresentationSurface + ?Sized,
    T: TrigLookup + ?Sized,
{
    let bounds = Rect::new(
        0,
        0,
        config.display_width as i32,
        config.display_height as i32,
    );
    let center = bounds.center();

    surface.clear(config.background);

    // Bezel
    surface.set_fill_color(config.foreground);
    surface.fill_circle(center, config.bezel_radius + config.bezel_width / 2);
    surface.set_fill_color(config.background);
    surface.fill_circle(center, config.bezel_radius - config.bezel_width / 2);

    // The rose turns against the heading so N keeps pointing north.
    let square = marker_square(config.marker_half_size);
    let heading = i32::from(state.angle().degrees());
    surface.set_fill_color(config.background);
    surface.set_text_color(config.foreground);
    for (offset, label) in CARDINALS {
        let projection = project(trig, center, offset - heading, config.bezel_radius);
        surface.fill_polygon(&square, projection.point, projection.rotation);
        surface.draw_text(
            label,
            FontKind::Small,
            config.marker_label_box.translate(projection.point),
            TextOverflow::WordWrap,
            TextAlignment::Center,
        );
    }

    let readout = HeadingReadout::from_state(state);
    if let Some(sector) = readout.sector {
        surface.draw_text(
            sector.label(),
            FontKind::Large,
            config.sector_label_box(),
            TextOverflow::Clip,
            TextAlignment::Center,
        );
    }
    if let Some(degrees) = &readout.degrees {
        surface.draw_text(
            degrees,
            FontKind::Small,
            config.readout_box(),
            TextOverflow::Clip,
            TextAlignment::Center,
        );
    }
    if let Some(message) = readout.message {
        surface.draw_text(
            message,
            FontKind::Small,
            config.heading_box,
            TextOverflow::WordWrap,
            TextAlignment::Center,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heading::{HeadingAngle, HeadingUpdate, MarkDirty};
    use crate::trig::SineTable;

    struct Ignore;

    impl MarkDirty for Ignore {
        fn mark_dirty(&self) {}
    }

    fn state_with(update: HeadingUpdate) -> CompassState {
        let mut state = CompassState::new();
        state.apply_update(update, &Ignore);
        state
    }

    fn heading(degrees: u16) -> HeadingUpdate {
        HeadingUpdate::Heading(HeadingAngle::new(degrees).unwrap())
    }

    fn rendered(state: &CompassState) -> Scene {
        let mut scene = Scene::new();
        render(&mut scene, state, &CompassConfig::default(), &SineTable::new());
        scene
    }

    fn markers(scene: &Scene) -> Vec<(ScreenPoint, i32)> {
        scene
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillPolygon {
                    offset, rotation, ..
                } => Some((*offset, *rotation)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_bezel_is_state_independent() {
        let expected = [
            DrawCommand::Clear(Color::BLACK),
            DrawCommand::SetFillColor(Color::WHITE),
            DrawCommand::FillCircle {
                center: ScreenPoint::new(72, 84),
                radius: 59,
            },
            DrawCommand::SetFillColor(Color::BLACK),
            DrawCommand::FillCircle {
                center: ScreenPoint::new(72, 84),
                radius: 51,
            },
        ];
        for state in [CompassState::new(), state_with(heading(123))] {
            assert_eq!(&rendered(&state).commands()[..5], &expected);
        }
    }

    #[test]
    fn test_markers_at_north_heading() {
        let scene = rendered(&state_with(heading(0)));
        let points: Vec<ScreenPoint> = markers(&scene).into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            points,
            vec![
                ScreenPoint::new(72, 29),
                ScreenPoint::new(127, 84),
                ScreenPoint::new(72, 139),
                ScreenPoint::new(17, 84),
            ]
        );
    }

    #[test]
    fn test_rose_turns_against_heading() {
        // Facing east puts the N marker on the left.
        let scene = rendered(&state_with(heading(90)));
        let (north, rotation) = markers(&scene)[0];
        assert_eq!(north, ScreenPoint::new(17, 84));
        assert_eq!(rotation, -0x4000);
    }

    #[test]
    fn test_marker_labels_centered_on_marker() {
        let scene = rendered(&state_with(heading(0)));
        let label = scene
            .commands()
            .iter()
            .find_map(|command| match command {
                DrawCommand::Text { text, rect, .. } if text == "N" => Some(*rect),
                _ => None,
            })
            .unwrap();
        assert_eq!(label, Rect::new(60, 13, 24, 24));
    }

    #[test]
    fn test_success_readout() {
        let scene = rendered(&state_with(heading(0)));
        let texts: Vec<&str> = scene.texts().collect();
        assert_eq!(texts, vec!["N", "E", "S", "W", "N", "0°"]);
    }

    #[test]
    fn test_status_messages() {
        let cases = [
            (HeadingStatus::Waiting, "Waiting for Heading"),
            (HeadingStatus::NotMoving, "Waiting for Heading"),
            (HeadingStatus::PermissionDenied, "Permission Denied"),
            (HeadingStatus::PositionUnavailable, "Heading Unavailable"),
            (HeadingStatus::Timeout, "Heading Timed Out"),
        ];
        for (status, message) in cases {
            let state = state_with(HeadingUpdate::Status(status));
            let readout = HeadingReadout::from_state(&state);
            assert_eq!(readout.sector, None);
            assert_eq!(readout.degrees, None);
            assert_eq!(readout.message, Some(message));

            let scene = rendered(&state);
            let texts: Vec<&str> = scene.texts().collect();
            assert_eq!(texts, vec!["N", "E", "S", "W", message]);
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        for state in [
            CompassState::new(),
            state_with(heading(17)),
            state_with(heading(338)),
            state_with(HeadingUpdate::Status(HeadingStatus::Timeout)),
        ] {
            assert_eq!(rendered(&state), rendered(&state));
        }
    }

    #[test]
    fn test_replay_reproduces_commands() {
        let original = rendered(&state_with(heading(250)));
        let mut copy = Scene::new();
        original.replay(&mut copy);
        assert_eq!(copy, original);
    }
}
