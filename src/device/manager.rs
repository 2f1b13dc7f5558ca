use std::{
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use dashmap::DashMap;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

use super::Actuator;
use crate::{
    common::{errors::DeviceError, types::DeviceId},
    configs::DevicesConfig,
};

/// Registry of connected actuators.
pub struct DeviceManager {
    devices: DashMap<DeviceId, Arc<dyn Actuator>>,
    next_id: AtomicU32,
    config: DevicesConfig,
}

impl DeviceManager {
    pub fn new(config: DevicesConfig) -> Self {
        Self {
            devices: DashMap::new(),
            next_id: AtomicU32::new(1),
            config,
        }
    }

    /// Hands out a fresh id for a device about to be registered.
    pub fn allocate_id(&self) -> DeviceId {
        DeviceId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Registers `device` and plays the connect pulse on it.
    pub async fn add(&self, device: Arc<dyn Actuator>) {
        let id = device.id();
        let battery = match device.battery_level().await {
            Ok(Some(level)) => format!(" with a battery level of {:.0}%", level * 100.0),
            Ok(None) => String::new(),
            Err(e) => {
                warn!("Could not read battery of device {}: {}", id, e);
                String::new()
            }
        };

        if self.devices.insert(id, device.clone()).is_some() {
            warn!("Device {} was already registered; replaced it", id);
        }
        info!(
            "Device connected: {}{}. Total devices: {}",
            device.name(),
            battery,
            self.devices.len()
        );

        if let Err(e) = pulse(
            device.as_ref(),
            self.config.connect_pulse_intensity,
            self.config.connect_pulse_ms,
        )
        .await
        {
            warn!("Connect pulse failed on device {}: {}", id, e);
        }
    }

    pub fn remove(&self, id: DeviceId) -> Option<Arc<dyn Actuator>> {
        let removed = self.devices.remove(&id).map(|(_, device)| device);
        if let Some(device) = &removed {
            info!("Device removed: {} ({})", device.name(), id);
        }
        removed
    }

    fn snapshot(&self) -> Vec<Arc<dyn Actuator>> {
        self.devices.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Sends `intensity` to every device concurrently. Returns how many accepted it.
    pub async fn broadcast(&self, intensity: f64) -> usize {
        let mut pending: FuturesUnordered<_> = self
            .snapshot()
            .into_iter()
            .map(|device| async move {
                let result = device.vibrate(intensity).await;
                (device, result)
            })
            .collect();

        let mut delivered = 0;
        while let Some((device, result)) = pending.next().await {
            match result {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Failed to drive device {}: {}", device.name(), e),
            }
        }
        debug!("Intensity {:.3} delivered to {} device(s)", intensity, delivered);
        delivered
    }

    pub async fn stop_all(&self) {
        let mut pending: FuturesUnordered<_> = self
            .snapshot()
            .into_iter()
            .map(|device| async move {
                let result = device.stop().await;
                (device, result)
            })
            .collect();

        while let Some((device, result)) = pending.next().await {
            if let Err(e) = result {
                warn!("Failed to stop device {}: {}", device.name(), e);
            }
        }
    }

    /// Plays the configured test pulse on every device at once.
    pub async fn test_all(&self) {
        let intensity = self.config.test_intensity;
        let duration_ms = self.config.test_duration_ms;
        let mut pending: FuturesUnordered<_> = self
            .snapshot()
            .into_iter()
            .map(|device| async move {
                let result = pulse(device.as_ref(), intensity, duration_ms).await;
                (device, result)
            })
            .collect();

        while let Some((device, result)) = pending.next().await {
            if let Err(e) = result {
                warn!("Test vibration failed on device {}: {}", device.name(), e);
            }
        }
    }
}

async fn pulse(device: &dyn Actuator, intensity: f64, duration_ms: u64) -> Result<(), DeviceError> {
    device.vibrate(intensity).await?;
    tokio::time::sleep(Duration::from_millis(duration_ms)).await;
    device.stop().await
}
