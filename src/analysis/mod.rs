use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    common::{errors::AnalysisError, types::TrackId},
    configs::CurveMode,
    curve::Curve,
};

/// A short span of audio with roughly uniform timbre, as found in the
/// `segments` array of an audio analysis document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub duration: f64,
    /// Loudness at the segment onset, in dB.
    pub loudness_start: f64,
    /// Offset of the loudness peak from `start`, in seconds.
    pub loudness_max_time: f64,
    /// Peak loudness, in dB.
    pub loudness_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    pub start: f64,
    pub duration: f64,
    pub confidence: f64,
}

/// The parts of an audio analysis document the haptics need. Everything else
/// in the document is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackAnalysis {
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub beats: Vec<Beat>,
}

impl TrackAnalysis {
    pub fn from_json(raw: &str) -> Result<Self, AnalysisError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn build_curve(&self, mode: CurveMode) -> Result<Curve, AnalysisError> {
        let curve = match mode {
            CurveMode::Loudness => Curve::from_segments(&self.segments)?,
            CurveMode::Beats => Curve::from_beats(&self.beats)?,
        };
        Ok(curve)
    }
}

#[async_trait]
pub trait AnalysisSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self, track: &TrackId) -> Result<TrackAnalysis, AnalysisError>;
}

/// Reads `<directory>/<track id>.json`.
pub struct FileAnalysisSource {
    directory: PathBuf,
}

impl FileAnalysisSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, track: &TrackId) -> PathBuf {
        let file_name: String = track
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.directory.join(format!("{}.json", file_name))
    }
}

#[async_trait]
impl AnalysisSource for FileAnalysisSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch(&self, track: &TrackId) -> Result<TrackAnalysis, AnalysisError> {
        let path = self.path_for(track);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AnalysisError::NotFound(track.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!("Read analysis for {} from {}", track, path.display());
        TrackAnalysis::from_json(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "meta": { "analyzer_version": "4.0.0" },
        "track": { "duration": 1.2, "tempo": 120.0 },
        "beats": [
            { "start": 0.0, "duration": 0.5, "confidence": 0.9 },
            { "start": 0.5, "duration": 0.5, "confidence": 0.4 }
        ],
        "segments": [
            {
                "start": 0.0, "duration": 0.6, "confidence": 1.0,
                "loudness_start": -60.0, "loudness_max_time": 0.125,
                "loudness_max": -6.0, "loudness_end": 0.0,
                "pitches": [0.5], "timbre": [42.0]
            },
            {
                "start": 0.6, "duration": 0.6, "confidence": 0.8,
                "loudness_start": -12.0, "loudness_max_time": 0.25,
                "loudness_max": 0.0
            }
        ]
    }"#;

    #[test]
    fn test_parses_analysis_document() {
        let analysis = TrackAnalysis::from_json(SAMPLE).unwrap();
        assert_eq!(analysis.segments.len(), 2);
        assert_eq!(analysis.beats.len(), 2);
        assert_eq!(analysis.segments[0].loudness_max_time, 0.125);
        assert_eq!(analysis.segments[1].loudness_max, 0.0);
    }

    #[test]
    fn test_build_curve_by_mode() {
        let analysis = TrackAnalysis::from_json(SAMPLE).unwrap();
        let loudness = analysis.build_curve(CurveMode::Loudness).unwrap();
        assert_eq!(loudness.len(), 4);
        assert_eq!(loudness.last().x, 0.85);
        assert_eq!(loudness.last().y, 1.0);

        let beats = analysis.build_curve(CurveMode::Beats).unwrap();
        assert_eq!(beats.len(), 4);
        assert_eq!(beats.first().y, 0.9);
    }

    #[test]
    fn test_missing_arrays_give_curve_error() {
        let analysis = TrackAnalysis::from_json("{}").unwrap();
        assert!(matches!(
            analysis.build_curve(CurveMode::Loudness),
            Err(AnalysisError::Curve(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            TrackAnalysis::from_json("{ \"segments\": 3 }"),
            Err(AnalysisError::Parse(_))
        ));
    }

    #[test]
    fn test_bundled_demo_builds_both_curves() {
        let raw = include_str!("../../demos/analysis/demo-track.json");
        let analysis = TrackAnalysis::from_json(raw).unwrap();
        assert!(analysis.build_curve(CurveMode::Loudness).is_ok());
        assert!(analysis.build_curve(CurveMode::Beats).is_ok());
    }

    #[tokio::test]
    async fn test_file_source_reads_and_reports_missing() {
        let dir = std::env::temp_dir().join(format!("rumblelink-analysis-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("track_1.json"), SAMPLE).unwrap();

        let source = FileAnalysisSource::new(&dir);
        let analysis = source.fetch(&TrackId::from("track:1")).await.unwrap();
        assert_eq!(analysis.segments.len(), 2);

        let missing = source.fetch(&TrackId::from("nope")).await;
        assert!(matches!(missing, Err(AnalysisError::NotFound(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
