use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnalysisConfig {
    /// Directory holding one `<track id>.json` audio analysis per track.
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

fn default_directory() -> String {
    "./analysis".to_string()
}
