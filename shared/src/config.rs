use serde::{Deserialize, Serialize};

/// Transport policy for stroke payloads. The defaults keep a submission
/// below a 400 KB backend item limit.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionLimits {
    /// Serialized stroke size above which points are thinned out.
    pub max_payload_bytes: usize,
    /// Bytes per unit of sampling stride once thinning kicks in.
    pub sampling_divisor_bytes: usize,
    pub max_transcription_chars: usize,
}

impl Default for SubmissionLimits {
    fn default() -> Self {
        Self {
            max_payload_bytes: 350_000,
            sampling_divisor_bytes: 300_000,
            max_transcription_chars: 1000,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SurfaceConfig {
    pub compact_height: f64,
    pub expanded_max_height: f64,
    /// Viewport height reserved around the expanded surface.
    pub expanded_margin: f64,
    pub line_width: f64,
    pub stroke_color: String,
    pub background: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            compact_height: 300.0,
            expanded_max_height: 800.0,
            expanded_margin: 200.0,
            line_width: 2.0,
            stroke_color: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl SurfaceConfig {
    pub fn surface_height(&self, expanded: bool, viewport_height: f64) -> f64 {
        if !expanded {
            return self.compact_height;
        }
        self.expanded_max_height
            .min(viewport_height - self.expanded_margin)
            .max(1.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub doctor_id: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Prefix for API routes; empty means same origin.
    pub api_base_url: String,
    pub identity: Option<Identity>,
    pub limits: SubmissionLimits,
    pub surface: SurfaceConfig,
}

impl ClientConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn submit_url(&self) -> String {
        format!("{}/api/submit", self.api_base_url.trim_end_matches('/'))
    }
}
