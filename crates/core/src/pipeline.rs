use std::{sync::Arc, time::Duration};

use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    assembler::assemble,
    cache::BeatCache,
    completion::CompletionService,
    composer::compose,
    config::{AnalysisConfig, SceneDefaults},
    error::{AnalysisError, Result},
    extractor::{BeatExtractor, Extraction, ExtractionRequest},
    feasibility::FeasibilityScorer,
    guidance::{ContentFormat, KnowledgeBase, Tone},
    script::{Script, validate},
    types::{AnalysisReport, EmotionalBeat, FeasibilityAssessment, Scene},
};

#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest {
    pub tone: Tone,
    pub format: ContentFormat,
    /// Overrides the configured request timeout for this call.
    pub deadline: Option<Duration>,
}

impl AnalysisRequest {
    pub fn new(tone: Tone, format: ContentFormat) -> Self {
        Self {
            tone,
            format,
            deadline: None,
        }
    }
}

/// Script-to-scene pipeline:
/// validate, extract beats, compose and score each beat concurrently,
/// restore narrative order, assemble records.
pub struct Analyzer {
    service: Arc<dyn CompletionService>,
    config: AnalysisConfig,
    scorer: FeasibilityScorer,
    cache: Option<BeatCache>,
}

impl Analyzer {
    pub fn new(service: Arc<dyn CompletionService>, config: AnalysisConfig) -> Self {
        let scorer = FeasibilityScorer::new(config.feasibility_threshold);
        Self {
            service,
            config,
            scorer,
            cache: None,
        }
    }

    pub fn with_scorer(mut self, scorer: FeasibilityScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_cache(mut self, cache: BeatCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub async fn analyze(&self, raw_script: &str, request: &AnalysisRequest) -> Result<AnalysisReport> {
        let script = validate(raw_script, &self.config.limits)?;
        info!(
            characters = script.len(),
            words = script.word_count(),
            tone = %request.tone,
            format = %request.format,
            "script validated"
        );

        let extraction = self.extract(&script, request).await?;
        let (scenes, assessments) = build_scenes(
            extraction.beats,
            request.format,
            Arc::clone(&self.config.knowledge),
            &self.config.scene,
            &self.scorer,
        )
        .await?;
        let scenes = assemble(scenes, assessments)?;

        let report = AnalysisReport {
            analysis_id: Uuid::new_v4(),
            tone: request.tone,
            format: request.format,
            beats_returned: extraction.returned,
            beats_dropped: extraction.dropped,
            scenes,
        };
        info!(
            analysis_id = %report.analysis_id,
            scenes = report.scenes.len(),
            ai_ready = report.ai_generate_count(),
            "analysis complete"
        );
        Ok(report)
    }

    async fn extract(
        &self,
        script: &Script,
        request: &AnalysisRequest,
    ) -> std::result::Result<Extraction, AnalysisError> {
        let cache_key = BeatCache::key(
            script.content(),
            request.tone,
            request.format,
            &self.service.name(),
        );
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.load(&cache_key).await {
                info!(beats = cached.beats.len(), "using cached beats");
                return Ok(cached);
            }
        }

        let extractor = BeatExtractor::new(
            Arc::clone(&self.service),
            Arc::clone(&self.config.knowledge),
        );
        let extraction = extractor
            .extract(
                script,
                &ExtractionRequest {
                    tone: request.tone,
                    format: request.format,
                    timeout: request.deadline.unwrap_or(self.config.request_timeout),
                },
            )
            .await?;

        if let Some(cache) = &self.cache {
            if extraction.beats.is_empty() {
                debug!("no beats found, not caching");
            } else if let Err(e) = cache.store(&cache_key, &extraction).await {
                warn!(dir = %cache.dir().display(), "failed to cache beats: {}", e);
            }
        }
        Ok(extraction)
    }
}

/// Compose and score every beat on its own task, then put the results back
/// in beat order.
pub async fn build_scenes(
    beats: Vec<EmotionalBeat>,
    format: ContentFormat,
    knowledge: Arc<KnowledgeBase>,
    defaults: &SceneDefaults,
    scorer: &FeasibilityScorer,
) -> std::result::Result<(Vec<Scene>, Vec<FeasibilityAssessment>), tokio::task::JoinError> {
    let total = beats.len();
    let mut tasks = JoinSet::new();

    for (index, beat) in beats.into_iter().enumerate() {
        let knowledge = Arc::clone(&knowledge);
        let defaults = defaults.clone();
        let scorer = scorer.clone();
        tasks.spawn(async move {
            let scene = compose(beat, &knowledge, format, &defaults);
            let assessment = scorer.score(&scene);
            (index, scene, assessment)
        });
    }

    let mut done = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        let (index, scene, assessment) = joined?;
        debug!(
            index,
            confidence = assessment.confidence,
            path = %assessment.path,
            "scene scored"
        );
        done.push((index, scene, assessment));
    }
    done.sort_by_key(|(index, _, _)| *index);

    Ok(done
        .into_iter()
        .map(|(_, scene, assessment)| (scene, assessment))
        .unzip())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecommendedPath;

    fn beats(n: usize) -> Vec<EmotionalBeat> {
        (0..n)
            .map(|i| EmotionalBeat {
                excerpt: format!("A dog runs across the park number {}.", i),
                offset: i * 40,
                timestamp: crate::format::format_timestamp(i as f64 * 3.0),
                tone: Tone::Uplifting,
                visual_hint: None,
            })
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn fan_out_keeps_beat_order() {
        let (scenes, assessments) = build_scenes(
            beats(64),
            ContentFormat::Ugc,
            Arc::new(KnowledgeBase::default()),
            &SceneDefaults::default(),
            &FeasibilityScorer::new(0.5),
        )
        .await
        .unwrap();

        assert_eq!(scenes.len(), 64);
        assert_eq!(assessments.len(), 64);
        for (i, scene) in scenes.iter().enumerate() {
            assert_eq!(scene.beat.offset, i * 40);
        }
        assert!(
            assessments
                .iter()
                .all(|a| a.path == RecommendedPath::AiGenerate)
        );
    }

    #[tokio::test]
    async fn no_beats_no_scenes() {
        let (scenes, assessments) = build_scenes(
            Vec::new(),
            ContentFormat::Ugc,
            Arc::new(KnowledgeBase::default()),
            &SceneDefaults::default(),
            &FeasibilityScorer::new(0.5),
        )
        .await
        .unwrap();
        assert!(scenes.is_empty());
        assert!(assessments.is_empty());
    }
}
