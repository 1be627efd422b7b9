// ============================================================================
// HEADING STATE MACHINE
// ============================================================================

use std::fmt;

use tracing::{debug, warn};

/// Raw sentinels the companion sends in place of a heading.
pub mod sentinel {
    pub const NOT_MOVING: i16 = -1;
    pub const WAITING: i16 = -2;
    pub const PERMISSION_DENIED: i16 = -3;
    pub const POSITION_UNAVAILABLE: i16 = -4;
    pub const TIMEOUT: i16 = -5;
}

/// Operating status of the heading source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingStatus {
    Success,
    Waiting,
    NotMoving,
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl HeadingStatus {
    /// Maps a negative sentinel to its status. `None` for anything that is
    /// not one of the five known sentinels.
    pub fn from_sentinel(raw: i16) -> Option<Self> {
        match raw {
            sentinel::NOT_MOVING => Some(Self::NotMoving),
            sentinel::WAITING => Some(Self::Waiting),
            sentinel::PERMISSION_DENIED => Some(Self::PermissionDenied),
            sentinel::POSITION_UNAVAILABLE => Some(Self::PositionUnavailable),
            sentinel::TIMEOUT => Some(Self::Timeout),
            _ => None,
        }
    }

    pub fn sentinel(self) -> Option<i16> {
        match self {
            Self::Success => None,
            Self::NotMoving => Some(sentinel::NOT_MOVING),
            Self::Waiting => Some(sentinel::WAITING),
            Self::PermissionDenied => Some(sentinel::PERMISSION_DENIED),
            Self::PositionUnavailable => Some(sentinel::POSITION_UNAVAILABLE),
            Self::Timeout => Some(sentinel::TIMEOUT),
        }
    }
}

/// Whole degrees in `[0, 359]`, 0 being the north reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HeadingAngle(u16);

impl HeadingAngle {
    pub const NORTH: Self = Self(0);

    /// `None` when `degrees` is outside `[0, 359]`.
    pub fn new(degrees: u16) -> Option<Self> {
        (degrees < 360).then_some(Self(degrees))
    }

    /// Wraps any degree count into `[0, 359]`.
    pub fn wrapping(degrees: i32) -> Self {
        Self(degrees.rem_euclid(360) as u16)
    }

    pub const fn degrees(self) -> u16 {
        self.0
    }
}

impl fmt::Display for HeadingAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// One of the eight labelled compass wedges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sector {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

// Upper bounds, exclusive. Not evenly spaced: north spans [338, 360) and [0, 23).
const SECTOR_BOUNDS: [(u16, Sector); 8] = [
    (23, Sector::N),
    (68, Sector::NE),
    (113, Sector::E),
    (158, Sector::SE),
    (203, Sector::S),
    (248, Sector::SW),
    (293, Sector::W),
    (338, Sector::NW),
];

impl Sector {
    pub fn from_angle(angle: HeadingAngle) -> Self {
        SECTOR_BOUNDS
            .iter()
            .find(|(bound, _)| angle.degrees() < *bound)
            .map_or(Sector::N, |(_, sector)| *sector)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Sector::N => "N",
            Sector::NE => "NE",
            Sector::E => "E",
            Sector::SE => "SE",
            Sector::S => "S",
            Sector::SW => "SW",
            Sector::W => "W",
            Sector::NW => "NW",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A decoded inbound value: either a status sentinel or a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingUpdate {
    Status(HeadingStatus),
    Heading(HeadingAngle),
}

impl From<i16> for HeadingUpdate {
    /// Non-negative values are headings, wrapped into `[0, 359]` if the
    /// companion overshoots. Negative values never carry a heading: unknown
    /// sentinels fall back to `Waiting`.
    fn from(raw: i16) -> Self {
        if raw < 0 {
            let status = HeadingStatus::from_sentinel(raw).unwrap_or_else(|| {
                warn!(raw, "unknown status sentinel, treating as waiting");
                HeadingStatus::Waiting
            });
            return HeadingUpdate::Status(status);
        }
        let angle = HeadingAngle::wrapping(i32::from(raw));
        if i32::from(angle.degrees()) != i32::from(raw) {
            warn!(raw, wrapped = angle.degrees(), "heading out of range, wrapped");
        }
        HeadingUpdate::Heading(angle)
    }
}

/// Receives the "state changed, redraw" signal after every applied update.
pub trait MarkDirty {
    fn mark_dirty(&self);
}

/// Current status and heading. `angle` is north whenever `status` is not
/// `Success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompassState {
    status: HeadingStatus,
    angle: HeadingAngle,
}

impl Default for CompassState {
    fn default() -> Self {
        Self {
            status: HeadingStatus::Waiting,
            angle: HeadingAngle::NORTH,
        }
    }
}

impl CompassState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> HeadingStatus {
        self.status
    }

    pub fn angle(&self) -> HeadingAngle {
        self.angle
    }

    /// The sector to display, only while a heading is available.
    pub fn sector(&self) -> Option<Sector> {
        (self.status == HeadingStatus::Success).then(|| Sector::from_angle(self.angle))
    }

    /// Overwrites the state with `update` and marks `surface` dirty.
    pub fn apply_update<D: MarkDirty + ?Sized>(
        &mut self,
        update: HeadingUpdate,
        surface: &D,
    ) -> CompassState {
        match update {
            HeadingUpdate::Heading(angle) => {
                self.status = HeadingStatus::Success;
                self.angle = angle;
            }
            HeadingUpdate::Status(status) => {
                self.status = status;
                self.angle = HeadingAngle::NORTH;
            }
        }
        debug!(status = ?self.status, angle = self.angle.degrees(), "heading state updated");
        surface.mark_dirty();
        *self
    }

    /// Applies a raw channel value.
    pub fn apply_raw<D: MarkDirty + ?Sized>(&mut self, raw: i16, surface: &D) -> CompassState {
        self.apply_update(HeadingUpdate::from(raw), surface)
    }
}
