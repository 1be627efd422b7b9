// ============================================================================
// UPDATE CHANNEL
// ============================================================================
//
// Frames are short text messages of `key=value` tuples separated by
// whitespace or commas, e.g. `heading=215` or `0x0=-2`.

use std::sync::mpsc::{Receiver, TryRecvError};

use tracing::{debug, warn};

use crate::error::DecodeError;
use crate::heading::{CompassState, HeadingUpdate, MarkDirty};

pub const INBOUND_BUFFER_SIZE: usize = 64;
pub const OUTBOUND_BUFFER_SIZE: usize = 64;

/// Numeric key of the heading tuple.
pub const HEADING_KEY: u32 = 0x0;
const HEADING_KEY_NAME: &str = "heading";

fn is_heading_key(key: &str) -> bool {
    if key.eq_ignore_ascii_case(HEADING_KEY_NAME) {
        return true;
    }
    let numeric = match key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => key.parse::<u32>().ok(),
    };
    numeric == Some(HEADING_KEY)
}

/// Extracts the raw heading value from a frame. `Ok(None)` when the frame
/// carries no heading tuple; the last heading tuple wins otherwise.
pub fn decode_frame(frame: &[u8]) -> Result<Option<i16>, DecodeError> {
    if frame.len() > INBOUND_BUFFER_SIZE {
        return Err(DecodeError::Oversized(frame.len()));
    }
    let text = std::str::from_utf8(frame).map_err(|_| DecodeError::NotUtf8)?;

    let mut heading = None;
    for tuple in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let (key, value) = tuple
            .split_once('=')
            .ok_or_else(|| DecodeError::MalformedTuple(tuple.to_string()))?;
        if is_heading_key(key) {
            let raw = value
                .parse::<i16>()
                .map_err(|_| DecodeError::BadValue(value.to_string()))?;
            heading = Some(raw);
        }
    }
    Ok(heading)
}

/// Builds the frame for one raw heading value.
pub fn encode_heading(raw: i16) -> Vec<u8> {
    format!("{HEADING_KEY_NAME}={raw}").into_bytes()
}

/// Decodes one frame and applies it to `state`. Frames that fail to decode
/// are logged and dropped; frames with no heading are dropped silently.
pub fn deliver<D: MarkDirty + ?Sized>(
    frame: &[u8],
    state: &mut CompassState,
    surface: &D,
) -> Option<CompassState> {
    let decoded = decode_frame(frame).map(|raw| raw.map(HeadingUpdate::from));
    match decoded {
        Ok(Some(update)) => {
            debug!(?update, "heading update received");
            Some(state.apply_update(update, surface))
        }
        Ok(None) => None,
        Err(err) => {
            warn!(%err, "dropping update frame");
            None
        }
    }
}

/// Receiving end of the update bus, drained once per event-loop turn.
pub struct UpdateChannel {
    receiver: Receiver<Vec<u8>>,
    connected: bool,
}

impl UpdateChannel {
    pub fn new(receiver: Receiver<Vec<u8>>) -> Self {
        Self {
            receiver,
            connected: true,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Applies every frame waiting on the channel without blocking. Returns
    /// the number of frames that changed the state.
    pub fn pump<D: MarkDirty + ?Sized>(&mut self, state: &mut CompassState, surface: &D) -> usize {
        let mut applied = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(frame) => {
                    if deliver(&frame, state, surface).is_some() {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.connected {
                        debug!("update channel closed");
                        self.connected = false;
                    }
                    break;
                }
            }
        }
        applied
    }
}
