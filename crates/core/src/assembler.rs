use crate::{
    error::AssemblyError,
    types::{FeasibilityAssessment, Scene, SceneRecord},
};

/// Zip scenes with their assessments into export rows, keeping input order.
pub fn assemble(
    scenes: Vec<Scene>,
    assessments: Vec<FeasibilityAssessment>,
) -> Result<Vec<SceneRecord>, AssemblyError> {
    if scenes.len() != assessments.len() {
        return Err(AssemblyError::Mismatch {
            scenes: scenes.len(),
            assessments: assessments.len(),
        });
    }

    let records = scenes
        .into_iter()
        .zip(assessments)
        .enumerate()
        .map(|(i, (scene, assessment))| SceneRecord {
            sequence: i + 1,
            timestamp: scene.beat.timestamp,
            insert_after: scene.beat.excerpt,
            tone: scene.beat.tone,
            format: scene.format,
            description: scene.description,
            prompt: scene.prompt,
            duration: scene.duration,
            aspect_ratio: scene.aspect_ratio,
            confidence_score: assessment.confidence,
            recommended_path: assessment.path,
            search_instruction: assessment.search_instruction.unwrap_or_default(),
        })
        .collect();

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        composer::compose,
        config::SceneDefaults,
        feasibility::FeasibilityScorer,
        guidance::{ContentFormat, KnowledgeBase, Tone},
        types::{EmotionalBeat, RecommendedPath},
    };

    fn scenes(excerpts: &[&str]) -> Vec<Scene> {
        let kb = KnowledgeBase::default();
        excerpts
            .iter()
            .enumerate()
            .map(|(i, excerpt)| {
                let beat = EmotionalBeat {
                    excerpt: excerpt.to_string(),
                    offset: i * 100,
                    timestamp: format!("00:{:02}", i * 3),
                    tone: Tone::Calm,
                    visual_hint: None,
                };
                compose(beat, &kb, ContentFormat::Ugc, &SceneDefaults::default())
            })
            .collect()
    }

    #[test]
    fn rows_follow_scene_order() {
        let scenes = scenes(&["A woman pours coffee.", "Quarterly growth statistics chart."]);
        let scorer = FeasibilityScorer::new(0.5);
        let assessments = scenes.iter().map(|s| scorer.score(s)).collect();

        let records = assemble(scenes, assessments).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence, 1);
        assert_eq!(records[0].insert_after, "A woman pours coffee.");
        assert_eq!(records[0].recommended_path, RecommendedPath::AiGenerate);
        assert!(records[0].search_instruction.is_empty());
        assert_eq!(records[1].sequence, 2);
        assert_eq!(records[1].timestamp, "00:03");
        assert_eq!(records[1].recommended_path, RecommendedPath::StockSearch);
        assert!(records[1].search_instruction.starts_with("Search for:"));
    }

    #[test]
    fn mismatch_only_on_unequal_lengths() {
        let scorer = FeasibilityScorer::new(0.5);
        let three = scenes(&["One dog.", "Two cats.", "Three birds."]);
        let two: Vec<_> = three.iter().take(2).map(|s| scorer.score(s)).collect();
        assert_eq!(
            assemble(three, two),
            Err(AssemblyError::Mismatch {
                scenes: 3,
                assessments: 2
            })
        );

        assert_eq!(assemble(Vec::new(), Vec::new()), Ok(Vec::new()));
    }
}
