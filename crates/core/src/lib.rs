//! Brollbot Core Library
//!
//! Turns a video script into ordered B-roll scene suggestions: emotional
//! beats, AI video prompts and a feasibility verdict for each scene.

pub mod assembler;
pub mod cache;
pub mod completion;
pub mod composer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod feasibility;
pub mod format;
pub mod guidance;
pub mod pipeline;
pub mod provider;
pub mod script;
pub mod types;

// Re-export commonly used items at crate root
pub use assembler::assemble;
pub use cache::{BeatCache, get_root_cache_dir};
pub use completion::{ChatCompletionClient, CompletionError, CompletionRequest, CompletionService};
pub use composer::compose;
pub use config::{AnalysisConfig, SceneDefaults, ScriptLimits};
pub use error::{AnalysisError, AssemblyError, ConfigError, PipelineError, Result, ValidationError};
pub use extractor::{BeatExtractor, Extraction, ExtractionRequest};
pub use feasibility::{FeasibilityPolicy, FeasibilityScorer, KeywordPolicy};
pub use format::{format_report_readable, format_timestamp, records_to_csv, records_to_json};
pub use guidance::{ContentFormat, KnowledgeBase, Platform, Tone};
pub use pipeline::{AnalysisRequest, Analyzer, build_scenes};
pub use provider::{Provider, ProviderConfig, ProviderError};
pub use script::{Script, validate};
pub use types::{
    AnalysisReport, EmotionalBeat, FeasibilityAssessment, RecommendedPath, Scene, SceneRecord,
};
