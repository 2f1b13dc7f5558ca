pub mod manager;
pub mod log_actuator;

pub use log_actuator::LogActuator;
pub use manager::DeviceManager;

use async_trait::async_trait;

use crate::common::{errors::DeviceError, types::DeviceId};

/// A vibration device accepting a normalized intensity in `0.0..=1.0`.
#[async_trait]
pub trait Actuator: Send + Sync {
    fn id(&self) -> DeviceId;
    fn name(&self) -> &str;
    async fn vibrate(&self, intensity: f64) -> Result<(), DeviceError>;
    async fn stop(&self) -> Result<(), DeviceError>;

    /// Battery charge in `0.0..=1.0`, if the device reports one.
    async fn battery_level(&self) -> Result<Option<f64>, DeviceError> {
        Ok(None)
    }
}
