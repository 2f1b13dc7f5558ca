use thiserror::Error;

use super::types::{DeviceId, TrackId};

/// Reasons a list of points cannot form an amplitude curve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("curve needs at least one point")]
    Empty,
    #[error("point {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("point {index} lies before its predecessor")]
    Unordered { index: usize },
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no analysis available for track {0}")]
    NotFound(TrackId),
    #[error("failed to read analysis: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed analysis: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("analysis does not form a usable curve: {0}")]
    Curve(#[from] CurveError),
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device {0} is disconnected")]
    Disconnected(DeviceId),
}
