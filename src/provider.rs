// ============================================================================
// COMPANION PROVIDER
// ============================================================================

use std::sync::mpsc::{SendError, Sender};

use tracing::{debug, info};

use crate::channel::encode_heading;
use crate::heading::{sentinel, HeadingAngle};

/// Location failures reported by the platform geolocation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl LocationError {
    pub const fn sentinel(self) -> i16 {
        match self {
            LocationError::PermissionDenied => sentinel::PERMISSION_DENIED,
            LocationError::PositionUnavailable => sentinel::POSITION_UNAVAILABLE,
            LocationError::Timeout => sentinel::TIMEOUT,
        }
    }
}

/// Sending side of the update bus, as run by the companion process.
///
/// Headings are only sent when they change; errors are always sent and make
/// the next heading go out regardless.
pub struct HeadingSender {
    sender: Sender<Vec<u8>>,
    last_heading: Option<i16>,
}

impl HeadingSender {
    pub fn new(sender: Sender<Vec<u8>>) -> Self {
        Self {
            sender,
            last_heading: None,
        }
    }

    /// Reports a position fix. Returns whether a frame was sent.
    ///
    /// A fix with no finite heading means the device is stationary and is
    /// always sent as the not-moving sentinel.
    pub fn position(&mut self, heading_degrees: f64) -> Result<bool, SendError<Vec<u8>>> {
        if !heading_degrees.is_finite() {
            debug!(heading_degrees, "no heading in fix, not moving");
            self.last_heading = None;
            self.sender.send(encode_heading(sentinel::NOT_MOVING))?;
            return Ok(true);
        }
        let heading = HeadingAngle::wrapping(heading_degrees.round() as i32).degrees() as i16;
        if self.last_heading == Some(heading) {
            return Ok(false);
        }
        debug!(heading, "heading updated");
        self.sender.send(encode_heading(heading))?;
        self.last_heading = Some(heading);
        Ok(true)
    }

    pub fn error(&mut self, error: LocationError) -> Result<(), SendError<Vec<u8>>> {
        info!(?error, "location error");
        self.last_heading = None;
        self.sender.send(encode_heading(error.sentinel()))
    }
}
