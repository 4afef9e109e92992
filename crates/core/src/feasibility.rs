//! Decides whether a scene should be generated by an AI video tool or found
//! as stock footage.

use std::{collections::HashSet, sync::Arc};

use crate::types::{FeasibilityAssessment, RecommendedPath, Scene};

/// Confidence when the subject carries no recognisable signal.
pub const LOW_SIGNAL_CONFIDENCE: f64 = 0.3;

const BASE_CONFIDENCE_PCT: i64 = 55;
const LONG_SUBJECT_WORDS: usize = 20;
const MAX_SEARCH_KEYWORDS: usize = 6;

const CONCRETE_NOUNS: &[&str] = &[
    "person", "man", "woman", "girl", "boy", "child", "kid", "baby", "face", "eyes", "tears",
    "hand", "hands", "smile", "dog", "cat", "car", "phone", "laptop", "computer", "desk",
    "coffee", "mug", "cup", "kitchen", "apartment", "house", "home", "room", "door", "window",
    "bed", "street", "city", "road", "beach", "ocean", "sea", "sky", "sun", "sunrise", "sunset",
    "forest", "tree", "mountain", "park", "office", "gym", "shoes", "bottle", "product", "box",
    "package", "wallet", "keys", "book", "camera", "bike", "train", "plane", "rain", "snow",
    "food", "plate", "table", "chair", "mirror", "couch", "garden", "customer", "runner",
];

const ACTION_VERBS: &[&str] = &[
    "walks", "walk", "walking", "runs", "run", "running", "holds", "holding", "opens", "opening",
    "smiles", "smiling", "laughs", "laughing", "cries", "crying", "pours", "pouring", "drinks",
    "drinking", "eats", "eating", "types", "typing", "looks", "looking", "sits", "sitting",
    "stands", "standing", "jumps", "jumping", "hugs", "hugging", "drives", "driving", "reads",
    "reading", "unboxes", "unboxing", "enters", "waves", "dances", "dancing", "cooks", "cooking",
    "sleeps", "wakes", "stretches", "scrolls", "scrolling", "frustrated", "rings",
];

const ABSTRACT_TERMS: &[&str] = &[
    "success", "freedom", "idea", "ideas", "concept", "future", "value", "growth", "potential",
    "opportunity", "strategy", "innovation", "mindset", "journey", "transformation", "solution",
    "results", "productivity", "wealth", "abundance", "purpose", "vision", "possibility",
    "change", "life", "time",
];

const MULTI_SUBJECT_TERMS: &[&str] = &[
    "crowd", "people", "team", "group", "everyone", "audience", "customers", "families",
    "friends", "together", "multiple", "several", "montage", "collage", "split", "comparison",
];

const TEXT_HEAVY_TERMS: &[&str] = &[
    "text", "words", "headline", "caption", "chart", "graph", "statistics", "stats", "percent",
    "numbers", "logo", "sign", "label", "list", "document", "spreadsheet", "screenshot",
    "dashboard", "website", "app", "countdown", "timer", "price",
];

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "of", "in", "on", "at", "to", "into", "with", "for",
    "from", "by", "her", "his", "their", "its", "our", "your", "my", "she", "he", "they", "we",
    "you", "i", "it", "is", "are", "was", "be", "this", "that", "as", "up", "out",
];

/// Scoring policy behind [`FeasibilityScorer`]. Implementations must return
/// a value in `[0.0, 1.0]`; the scorer clamps anyway.
pub trait FeasibilityPolicy: Send + Sync {
    fn confidence(&self, scene: &Scene) -> f64;
}

/// Default policy: keyword signals over the scene subject.
///
/// Concrete nouns and literal actions raise confidence, abstract, multi-subject
/// and text-heavy terms lower it. Guidance text is ignored since it is the
/// same for every scene of a tone.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordPolicy;

#[derive(Debug, Default, PartialEq, Eq)]
struct Signals {
    concrete: usize,
    actions: usize,
    abstract_terms: usize,
    multi_subject: usize,
    text_heavy: usize,
}

impl Signals {
    fn of(words: &[String]) -> Self {
        let mut signals = Signals::default();
        for word in words {
            let word = word.as_str();
            if CONCRETE_NOUNS.contains(&word) {
                signals.concrete += 1;
            }
            if ACTION_VERBS.contains(&word) {
                signals.actions += 1;
            }
            if ABSTRACT_TERMS.contains(&word) {
                signals.abstract_terms += 1;
            }
            if MULTI_SUBJECT_TERMS.contains(&word) {
                signals.multi_subject += 1;
            }
            if TEXT_HEAVY_TERMS.contains(&word) {
                signals.text_heavy += 1;
            }
        }
        signals
    }

    fn is_empty(&self) -> bool {
        *self == Signals::default()
    }
}

impl FeasibilityPolicy for KeywordPolicy {
    fn confidence(&self, scene: &Scene) -> f64 {
        let words = words_of(&scene.subject);
        let signals = Signals::of(&words);
        if signals.is_empty() {
            return LOW_SIGNAL_CONFIDENCE;
        }

        // Hundredths, so weights summing to a threshold land on it exactly.
        let mut score = BASE_CONFIDENCE_PCT
            + 10 * signals.concrete.min(3) as i64
            + 10 * signals.actions.min(2) as i64
            - 15 * signals.abstract_terms as i64
            - 15 * signals.multi_subject as i64
            - 20 * signals.text_heavy as i64;
        if words.len() > LONG_SUBJECT_WORDS {
            score -= 10;
        }

        score.clamp(0, 100) as f64 / 100.0
    }
}

#[derive(Clone)]
pub struct FeasibilityScorer {
    threshold: f64,
    policy: Arc<dyn FeasibilityPolicy>,
}

impl FeasibilityScorer {
    pub fn new(threshold: f64) -> Self {
        Self::with_policy(threshold, Arc::new(KeywordPolicy))
    }

    pub fn with_policy(threshold: f64, policy: Arc<dyn FeasibilityPolicy>) -> Self {
        Self { threshold, policy }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn score(&self, scene: &Scene) -> FeasibilityAssessment {
        let raw = self.policy.confidence(scene);
        let confidence = if raw.is_finite() {
            raw.clamp(0.0, 1.0)
        } else {
            LOW_SIGNAL_CONFIDENCE
        };

        if confidence >= self.threshold {
            FeasibilityAssessment {
                confidence,
                path: RecommendedPath::AiGenerate,
                search_instruction: None,
            }
        } else {
            FeasibilityAssessment {
                confidence,
                path: RecommendedPath::StockSearch,
                search_instruction: Some(search_instruction(scene)),
            }
        }
    }
}

/// `Search for: <keywords> footage, <tone> mood`
pub fn search_instruction(scene: &Scene) -> String {
    let mut seen = HashSet::new();
    let keywords: Vec<String> = words_of(&scene.subject)
        .into_iter()
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .filter(|w| seen.insert(w.clone()))
        .take(MAX_SEARCH_KEYWORDS)
        .collect();

    let keywords = if keywords.is_empty() {
        scene.beat.tone.to_string()
    } else {
        keywords.join(" ")
    };
    format!("Search for: {} footage, {} mood", keywords, scene.beat.tone)
}

fn words_of(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}
