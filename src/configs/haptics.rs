use serde::{Deserialize, Serialize};

use crate::common::types::AnyResult;

/// Which part of the track analysis the intensity curve is built from.
#[derive(Debug, Deserialize, Serialize, Clone, Default, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CurveMode {
    /// Segment loudness envelope.
    #[default]
    Loudness,
    /// Beat confidence plateaus.
    Beats,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HapticsConfig {
    /// Scale applied to the sampled amplitude before clamping to `0.0..=1.0`.
    #[serde(default = "default_max_intensity")]
    pub max_intensity: f64,
    /// Intensity changes smaller than this are not sent to devices.
    #[serde(default = "default_min_change")]
    pub min_change: f64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Width of the moving-average window. `0` samples the curve directly.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    #[serde(default)]
    pub mode: CurveMode,
}

impl HapticsConfig {
    pub fn window_seconds(&self) -> f64 {
        self.window_ms as f64 / 1000.0
    }

    pub fn validate(&self) -> AnyResult<()> {
        if !(0.0..=1.0).contains(&self.max_intensity) {
            return Err(format!(
                "haptics.max_intensity must be within 0.0..=1.0, got {}",
                self.max_intensity
            )
            .into());
        }
        if !(0.0..=1.0).contains(&self.min_change) {
            return Err(format!(
                "haptics.min_change must be within 0.0..=1.0, got {}",
                self.min_change
            )
            .into());
        }
        if self.poll_interval_ms == 0 {
            return Err("haptics.poll_interval_ms must be greater than zero".into());
        }
        Ok(())
    }
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            max_intensity: default_max_intensity(),
            min_change: default_min_change(),
            poll_interval_ms: default_poll_interval_ms(),
            window_ms: default_window_ms(),
            mode: CurveMode::default(),
        }
    }
}

fn default_max_intensity() -> f64 {
    1.0
}

fn default_min_change() -> f64 {
    0.01
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_window_ms() -> u64 {
    250
}
