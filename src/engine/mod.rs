//! Turns playback progress into device intensity.
//!
//! One tick reads the playback position, samples the current track's curve
//! with a moving window, scales and clamps the result and forwards it to the
//! devices when it moved by at least the configured threshold.

use std::{sync::Arc, time::Duration};

use parking_lot::{Mutex, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{
    analysis::AnalysisSource,
    common::types::TrackId,
    configs::HapticsConfig,
    curve::Curve,
    device::DeviceManager,
    playback::{PlaybackEvent, PlaybackSource},
};

/// Maps a raw curve sample onto the device range.
pub fn scale_intensity(sample: f64, max_intensity: f64) -> f64 {
    let scaled = sample * max_intensity;
    if scaled.is_nan() {
        return 0.0;
    }
    scaled.clamp(0.0, 1.0)
}

struct Session {
    track: Option<TrackId>,
    /// Last intensity forwarded to the devices.
    last_sent: f64,
    paused: bool,
}

pub struct HapticEngine {
    config: HapticsConfig,
    devices: Arc<DeviceManager>,
    analysis: Arc<dyn AnalysisSource>,
    playback: Arc<dyn PlaybackSource>,
    curve: RwLock<Option<Arc<Curve>>>,
    session: Mutex<Session>,
}

impl HapticEngine {
    pub fn new(
        config: HapticsConfig,
        devices: Arc<DeviceManager>,
        analysis: Arc<dyn AnalysisSource>,
        playback: Arc<dyn PlaybackSource>,
    ) -> Self {
        Self {
            config,
            devices,
            analysis,
            playback,
            curve: RwLock::new(None),
            session: Mutex::new(Session {
                track: None,
                last_sent: 0.0,
                paused: true,
            }),
        }
    }

    pub fn current_curve(&self) -> Option<Arc<Curve>> {
        self.curve.read().clone()
    }

    pub fn last_sent(&self) -> f64 {
        self.session.lock().last_sent
    }

    pub fn current_track(&self) -> Option<TrackId> {
        self.session.lock().track.clone()
    }

    /// Intensity for `position` on `curve`, before threshold filtering.
    pub fn intensity_at(&self, curve: &Curve, position: f64) -> f64 {
        let sample = curve.sample_windowed(position, self.config.window_seconds());
        scale_intensity(sample, self.config.max_intensity)
    }

    /// Fetches the analysis for `track` and swaps in its curve. The devices
    /// are silenced first. On failure the engine stays idle until the next
    /// track change.
    pub async fn load_track(&self, track: TrackId) {
        self.session.lock().track = Some(track.clone());
        *self.curve.write() = None;
        self.silence().await;

        let curve = match self.analysis.fetch(&track).await {
            Ok(analysis) => analysis.build_curve(self.config.mode),
            Err(e) => Err(e),
        };

        match curve {
            Ok(curve) => {
                info!(
                    "Loaded {:?} curve for {} from {} ({} points)",
                    self.config.mode,
                    track,
                    self.analysis.name(),
                    curve.len()
                );
                *self.curve.write() = Some(Arc::new(curve));
            }
            Err(e) => warn!("No haptics for track {}: {}", track, e),
        }
    }

    /// One pass of the actuation loop. Returns the intensity sent, if any.
    pub async fn tick(&self) -> Option<f64> {
        if self.session.lock().paused {
            return None;
        }
        let curve = self.current_curve()?;

        let snapshot = self.playback.snapshot();
        if snapshot.paused {
            return None;
        }
        let intensity = self.intensity_at(&curve, snapshot.position);

        let other_track = {
            let session = self.session.lock();
            snapshot.track.is_some() && snapshot.track != session.track
        };
        if other_track {
            self.silence().await;
            return None;
        }

        {
            let mut session = self.session.lock();
            let delta = (intensity - session.last_sent).abs();
            // Reaching zero is always forwarded so no residue stays on.
            if delta == 0.0 || (delta < self.config.min_change && intensity != 0.0) {
                return None;
            }
            session.last_sent = intensity;
        }

        self.devices.broadcast(intensity).await;
        Some(intensity)
    }

    pub async fn handle_event(&self, event: PlaybackEvent) {
        debug!("Playback event: {:?}", event);
        match event {
            PlaybackEvent::TrackChanged(track) => {
                self.load_track(track).await;
                self.session.lock().paused = false;
            }
            PlaybackEvent::Paused => {
                self.pause().await;
            }
            PlaybackEvent::Resumed => {
                self.session.lock().paused = false;
                self.tick().await;
            }
            PlaybackEvent::Stopped => {
                self.pause().await;
                self.session.lock().track = None;
                *self.curve.write() = None;
            }
        }
    }

    async fn pause(&self) {
        {
            let mut session = self.session.lock();
            session.paused = true;
            session.last_sent = 0.0;
        }
        self.devices.stop_all().await;
    }

    /// Stops the devices unless they are already known to be idle.
    async fn silence(&self) {
        let was_active = std::mem::replace(&mut self.session.lock().last_sent, 0.0) != 0.0;
        if was_active {
            self.devices.stop_all().await;
        }
    }

    /// Runs ticks every `poll_interval_ms` and applies playback events in
    /// between, until the event channel closes.
    pub async fn run(self: Arc<Self>, events: flume::Receiver<PlaybackEvent>) {
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.config.poll_interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Haptics loop started (every {} ms, window {} ms)",
            self.config.poll_interval_ms, self.config.window_ms
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick().await;
                }
                event = events.recv_async() => match event {
                    Ok(event) => {
                        let span = info_span!("event", track = ?self.current_track());
                        self.handle_event(event).instrument(span).await;
                    }
                    Err(_) => break,
                },
            }
        }

        self.pause().await;
        info!("Haptics loop stopped");
    }
}
