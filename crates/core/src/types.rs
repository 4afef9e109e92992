use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::guidance::{ContentFormat, Tone};

/// One narrative unit of the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalBeat {
    /// Exact slice of the validated script.
    pub excerpt: String,
    /// Byte offset of `excerpt` inside the script.
    pub offset: usize,
    /// `MM:SS` position hint.
    pub timestamp: String,
    pub tone: Tone,
    /// Short scene idea proposed by the completion service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub beat: EmotionalBeat,
    /// Literal on-screen subject the description is built around.
    pub subject: String,
    pub description: String,
    pub prompt: String,
    pub duration: u32,
    pub aspect_ratio: String,
    pub format: ContentFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendedPath {
    AiGenerate,
    StockSearch,
}

impl RecommendedPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedPath::AiGenerate => "ai-generate",
            RecommendedPath::StockSearch => "stock-search",
        }
    }
}

impl fmt::Display for RecommendedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeasibilityAssessment {
    pub confidence: f64,
    pub path: RecommendedPath,
    /// Present only when `path` is `StockSearch`.
    pub search_instruction: Option<String>,
}

/// Flat export row. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub sequence: usize,
    pub timestamp: String,
    pub insert_after: String,
    pub tone: Tone,
    pub format: ContentFormat,
    pub description: String,
    pub prompt: String,
    pub duration: u32,
    pub aspect_ratio: String,
    pub confidence_score: f64,
    pub recommended_path: RecommendedPath,
    /// Empty when the scene is recommended for AI generation.
    pub search_instruction: String,
}

impl SceneRecord {
    pub const COLUMNS: [&'static str; 12] = [
        "sequence",
        "timestamp",
        "insert_after",
        "tone",
        "format",
        "description",
        "prompt",
        "duration",
        "aspect_ratio",
        "confidence_score",
        "recommended_path",
        "search_instruction",
    ];

    /// Cell values in `COLUMNS` order.
    pub fn cells(&self) -> [String; 12] {
        [
            self.sequence.to_string(),
            self.timestamp.clone(),
            self.insert_after.clone(),
            self.tone.to_string(),
            self.format.to_string(),
            self.description.clone(),
            self.prompt.clone(),
            self.duration.to_string(),
            self.aspect_ratio.clone(),
            self.confidence_score.to_string(),
            self.recommended_path.to_string(),
            self.search_instruction.clone(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub tone: Tone,
    pub format: ContentFormat,
    pub beats_returned: usize,
    pub beats_dropped: usize,
    pub scenes: Vec<SceneRecord>,
}

impl AnalysisReport {
    pub fn ai_generate_count(&self) -> usize {
        self.scenes
            .iter()
            .filter(|s| s.recommended_path == RecommendedPath::AiGenerate)
            .count()
    }
}
