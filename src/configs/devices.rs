use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DevicesConfig {
    /// Names of log-only actuators registered by the binary.
    #[serde(default = "default_dry_run")]
    pub dry_run: Vec<String>,
    /// Short pulse played when a device is registered.
    #[serde(default = "default_connect_pulse_intensity")]
    pub connect_pulse_intensity: f64,
    #[serde(default = "default_connect_pulse_ms")]
    pub connect_pulse_ms: u64,
    #[serde(default = "default_test_intensity")]
    pub test_intensity: f64,
    #[serde(default = "default_test_duration_ms")]
    pub test_duration_ms: u64,
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            dry_run: default_dry_run(),
            connect_pulse_intensity: default_connect_pulse_intensity(),
            connect_pulse_ms: default_connect_pulse_ms(),
            test_intensity: default_test_intensity(),
            test_duration_ms: default_test_duration_ms(),
        }
    }
}

fn default_dry_run() -> Vec<String> {
    vec!["dry-run".to_string()]
}

fn default_connect_pulse_intensity() -> f64 {
    0.1
}

fn default_connect_pulse_ms() -> u64 {
    500
}

fn default_test_intensity() -> f64 {
    0.5
}

fn default_test_duration_ms() -> u64 {
    1000
}
