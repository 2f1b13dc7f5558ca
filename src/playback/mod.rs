pub mod clock;

pub use clock::LocalClock;

use crate::common::types::TrackId;

/// What the media host reports about playback at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSnapshot {
    pub track: Option<TrackId>,
    /// Position within the track, in seconds.
    pub position: f64,
    pub paused: bool,
}

/// Host notifications the haptics loop reacts to between ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    TrackChanged(TrackId),
    Paused,
    Resumed,
    Stopped,
}

/// Source of the current playback position.
pub trait PlaybackSource: Send + Sync {
    fn snapshot(&self) -> PlaybackSnapshot;
}
