pub mod analysis;
pub mod common;
pub mod configs;
pub mod curve;
pub mod device;
pub mod engine;
pub mod playback;

pub use analysis::{AnalysisSource, FileAnalysisSource, TrackAnalysis};
pub use curve::{Curve, Point};
pub use device::{Actuator, DeviceManager};
pub use engine::HapticEngine;
