//! An actuator that only logs what it would have done.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::Actuator;
use crate::common::{errors::DeviceError, types::DeviceId};

pub struct LogActuator {
    id: DeviceId,
    name: String,
    /// Bit pattern of the last commanded intensity.
    last: AtomicU64,
}

impl LogActuator {
    pub fn new(id: DeviceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            last: AtomicU64::new(0f64.to_bits()),
        }
    }

    pub fn last_intensity(&self) -> f64 {
        f64::from_bits(self.last.load(Ordering::Relaxed))
    }
}

#[async_trait]
impl Actuator for LogActuator {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn vibrate(&self, intensity: f64) -> Result<(), DeviceError> {
        self.last.store(intensity.to_bits(), Ordering::Relaxed);
        tracing::debug!("[{} {}] vibrate {:.3}", self.id, self.name, intensity);
        Ok(())
    }

    async fn stop(&self) -> Result<(), DeviceError> {
        self.last.store(0f64.to_bits(), Ordering::Relaxed);
        tracing::debug!("[{} {}] stop", self.id, self.name);
        Ok(())
    }
}
