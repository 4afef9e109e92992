use crate::{
    config::SceneDefaults,
    guidance::{ContentFormat, KnowledgeBase},
    types::{EmotionalBeat, Scene},
};

const MAX_SUBJECT_WORDS: usize = 12;

/// Spoken filler that never shows up on screen.
const FILLER_WORDS: &[&str] = &[
    "um",
    "uh",
    "so",
    "well",
    "like",
    "just",
    "really",
    "actually",
    "basically",
    "literally",
    "honestly",
    "okay",
    "ok",
];

/// Build the B-roll scene for one beat.
///
/// The prompt lists its fields in a fixed order so exports and copy-paste
/// stay predictable:
/// `<description> | duration: <n>s | aspect ratio: <w:h> | tone: <tone>`
pub fn compose(
    beat: EmotionalBeat,
    knowledge: &KnowledgeBase,
    format: ContentFormat,
    defaults: &SceneDefaults,
) -> Scene {
    let subject = match beat.visual_hint.as_deref() {
        Some(hint) => hint.to_string(),
        None => subject_from_excerpt(&beat.excerpt),
    };

    let description = format!(
        "{}, {}, {}",
        subject,
        knowledge.tone_guidance(beat.tone),
        knowledge.format_guidance(format)
    );
    let prompt = format!(
        "{} | duration: {}s | aspect ratio: {} | tone: {}",
        description, defaults.duration, defaults.aspect_ratio, beat.tone
    );

    Scene {
        beat,
        subject,
        description,
        prompt,
        duration: defaults.duration,
        aspect_ratio: defaults.aspect_ratio.clone(),
        format,
    }
}

/// Visual subject taken from the excerpt itself: punctuation stripped,
/// filler dropped, capped at a dozen words.
pub fn subject_from_excerpt(excerpt: &str) -> String {
    let words: Vec<&str> = excerpt
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-'))
        .filter(|w| !w.is_empty())
        .filter(|w| !FILLER_WORDS.contains(&w.to_lowercase().as_str()))
        .take(MAX_SUBJECT_WORDS)
        .collect();

    if words.is_empty() {
        excerpt.trim().to_string()
    } else {
        words.join(" ")
    }
}
