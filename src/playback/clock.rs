//! A playback position driven by the local monotonic clock.
//!
//! Stands in for a media host: it reports a position that advances in real
//! time while playing and emits the matching [`PlaybackEvent`]s.

use std::time::Instant;

use parking_lot::Mutex;

use super::{PlaybackEvent, PlaybackSnapshot, PlaybackSource};
use crate::common::types::TrackId;

struct ClockState {
    track: Option<TrackId>,
    /// Position accumulated up to `running_since`, or the frozen position while paused.
    base: f64,
    running_since: Option<Instant>,
}

impl ClockState {
    fn position(&self) -> f64 {
        match self.running_since {
            Some(since) => self.base + since.elapsed().as_secs_f64(),
            None => self.base,
        }
    }
}

pub struct LocalClock {
    state: Mutex<ClockState>,
    events: flume::Sender<PlaybackEvent>,
}

impl LocalClock {
    pub fn new() -> (Self, flume::Receiver<PlaybackEvent>) {
        let (tx, rx) = flume::unbounded();
        let clock = Self {
            state: Mutex::new(ClockState {
                track: None,
                base: 0.0,
                running_since: None,
            }),
            events: tx,
        };
        (clock, rx)
    }

    fn emit(&self, event: PlaybackEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("Playback event dropped; no listener");
        }
    }

    /// Start `track` from the beginning.
    pub fn play(&self, track: TrackId) {
        {
            let mut state = self.state.lock();
            state.track = Some(track.clone());
            state.base = 0.0;
            state.running_since = Some(Instant::now());
        }
        self.emit(PlaybackEvent::TrackChanged(track));
    }

    pub fn pause(&self) {
        {
            let mut state = self.state.lock();
            if state.running_since.is_none() {
                return;
            }
            state.base = state.position();
            state.running_since = None;
        }
        self.emit(PlaybackEvent::Paused);
    }

    pub fn resume(&self) {
        {
            let mut state = self.state.lock();
            if state.track.is_none() || state.running_since.is_some() {
                return;
            }
            state.running_since = Some(Instant::now());
        }
        self.emit(PlaybackEvent::Resumed);
    }

    /// Jump to `seconds`, keeping the play/pause state.
    pub fn seek(&self, seconds: f64) {
        let mut state = self.state.lock();
        state.base = seconds.max(0.0);
        if state.running_since.is_some() {
            state.running_since = Some(Instant::now());
        }
    }

    pub fn stop(&self) {
        {
            let mut state = self.state.lock();
            state.track = None;
            state.base = 0.0;
            state.running_since = None;
        }
        self.emit(PlaybackEvent::Stopped);
    }
}

impl PlaybackSource for LocalClock {
    fn snapshot(&self) -> PlaybackSnapshot {
        let state = self.state.lock();
        PlaybackSnapshot {
            track: state.track.clone(),
            position: state.position(),
            paused: state.running_since.is_none(),
        }
    }
}
