use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    completion::{CompletionRequest, CompletionService},
    error::AnalysisError,
    format::format_timestamp,
    guidance::{ContentFormat, KnowledgeBase, Tone},
    script::Script,
    types::EmotionalBeat,
};

/// Speaking rate used to estimate a timestamp when the service gives none.
const WORDS_PER_SECOND: f64 = 2.5;

static BEAT_EXTRACTION_PROMPT: &str = r#"You are a B-roll specialist for short-form social video.

INPUT: a video script.

TASK: split the script into emotional beats, in script order. A new beat starts
whenever the emotion or the visual moment changes, roughly every 3-5 seconds of
spoken text.

For every beat output:
- "timestamp": approximate position in the spoken script, MM:SS
- "script_excerpt": the exact words from the script this beat covers, copied
  verbatim (same spelling, same punctuation, no paraphrasing)
- "tone": exactly one of: inspiring, urgent, calm, funny, serious, emotional,
  uplifting, mysterious
- "visual": a SIMPLE, literal scene idea under 15 words with one clear subject
  GOOD: "Person frustrated with laptop"
  GOOD: "Happy customer holding product"
  BAD: "Close-up of person's disillusioned face as they futilely make cold calls"

Output ONLY a JSON array of beats, nothing else."#;

#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest {
    /// Overall tone the user wants the B-roll to support.
    pub tone: Tone,
    pub format: ContentFormat,
    /// Deadline for the completion call.
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub beats: Vec<EmotionalBeat>,
    /// Beats present in the service reply, before dropping.
    pub returned: usize,
    pub dropped: usize,
}

#[derive(Debug, Deserialize)]
struct RawBeat {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(alias = "excerpt")]
    script_excerpt: String,
    tone: String,
    #[serde(default, alias = "scene_description")]
    visual: Option<String>,
}

pub struct BeatExtractor {
    service: Arc<dyn CompletionService>,
    knowledge: Arc<KnowledgeBase>,
}

impl BeatExtractor {
    pub fn new(service: Arc<dyn CompletionService>, knowledge: Arc<KnowledgeBase>) -> Self {
        Self { service, knowledge }
    }

    pub fn build_request(&self, script: &Script, request: &ExtractionRequest) -> CompletionRequest {
        let system = format!(
            "{}\n\nTONE STRATEGY ({}): {}\nFORMAT STRATEGY ({}): {}",
            BEAT_EXTRACTION_PROMPT,
            request.tone,
            self.knowledge.tone_guidance(request.tone),
            request.format,
            self.knowledge.format_guidance(request.format),
        );
        let user = format!(
            "SCRIPT ({} words):\n{}\n\nTARGET TONE: {}\nFORMAT: {}",
            script.word_count(),
            script.content(),
            request.tone,
            request.format,
        );

        CompletionRequest {
            system,
            user,
            response_schema: beats_schema(),
            temperature: 0.3,
        }
    }

    /// Ask the completion service for beats. The call is abandoned once
    /// `request.timeout` elapses.
    pub async fn extract(
        &self,
        script: &Script,
        request: &ExtractionRequest,
    ) -> Result<Extraction, AnalysisError> {
        let completion = self.build_request(script, request);
        info!(service = %self.service.name(), "extracting beats");
        debug!("beat prompt: {}", completion.user);

        let value =
            match tokio::time::timeout(request.timeout, self.service.complete(&completion)).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!(
                        "beat extraction timed out after {:.1}s",
                        request.timeout.as_secs_f64()
                    );
                    return Err(AnalysisError::Timeout {
                        seconds: request.timeout.as_secs_f64(),
                    });
                }
            };

        parse_beats(script, &value)
    }
}

pub fn beats_schema() -> Value {
    let tones: Vec<&str> = Tone::ALL.iter().map(Tone::as_str).collect();
    serde_json::json!({
        "type": "array",
        "items": {
            "type": "object",
            "required": ["timestamp", "script_excerpt", "tone", "visual"],
            "properties": {
                "timestamp": { "type": "string", "pattern": "^[0-9]{1,2}:[0-9]{2}$" },
                "script_excerpt": { "type": "string", "minLength": 1 },
                "tone": { "type": "string", "enum": tones },
                "visual": { "type": "string" }
            }
        }
    })
}

/// Turn a service reply into beats anchored in `script`.
///
/// The reply must be a JSON array, or an object holding one under `beats`.
/// Individual entries that fail the schema or cannot be found in the script
/// are dropped.
pub fn parse_beats(script: &Script, value: &Value) -> Result<Extraction, AnalysisError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("beats") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AnalysisError::MalformedResponse {
                    reason: "expected an array of beats".to_string(),
                });
            }
        },
        other => {
            return Err(AnalysisError::MalformedResponse {
                reason: format!("expected an array of beats, got {}", kind_of(other)),
            });
        }
    };

    let text = script.content();
    let mut beats = Vec::with_capacity(items.len());
    let mut cursor = 0;

    for (index, item) in items.iter().enumerate() {
        let raw = match RawBeat::deserialize(item) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(index, "skipping invalid beat: {}", e);
                continue;
            }
        };
        let tone = match raw.tone.parse::<Tone>() {
            Ok(tone) => tone,
            Err(e) => {
                warn!(index, "skipping beat: {}", e);
                continue;
            }
        };
        let Some((offset, excerpt)) = locate_excerpt(text, &raw.script_excerpt, cursor) else {
            warn!(
                index,
                excerpt = raw.script_excerpt.as_str(),
                "skipping beat: excerpt not found in script"
            );
            continue;
        };
        cursor = offset + excerpt.len();

        let timestamp = raw
            .timestamp
            .filter(|t| is_timestamp(t))
            .unwrap_or_else(|| estimate_timestamp(text, offset));
        let visual_hint = raw
            .visual
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        beats.push(EmotionalBeat {
            excerpt: excerpt.to_string(),
            offset,
            timestamp,
            tone,
            visual_hint,
        });
    }

    beats.sort_by_key(|beat| beat.offset);

    let extraction = Extraction {
        returned: items.len(),
        dropped: items.len() - beats.len(),
        beats,
    };
    info!(
        kept = extraction.beats.len(),
        dropped = extraction.dropped,
        "beats parsed"
    );
    Ok(extraction)
}

/// Find `excerpt` in `text`, preferring a match at or after `cursor`.
/// Falls back to an ASCII case-insensitive match. Returns the byte offset and
/// the matching slice of `text`.
fn locate_excerpt<'a>(text: &'a str, excerpt: &str, cursor: usize) -> Option<(usize, &'a str)> {
    let needle = excerpt.trim();
    if needle.is_empty() {
        return None;
    }

    let found = find_from(text, needle, cursor).or_else(|| {
        // ASCII lowercasing keeps byte offsets and char boundaries intact.
        let lower_text = text.to_ascii_lowercase();
        let lower_needle = needle.to_ascii_lowercase();
        find_from(&lower_text, &lower_needle, cursor)
    })?;

    Some((found, &text[found..found + needle.len()]))
}

fn find_from(haystack: &str, needle: &str, cursor: usize) -> Option<usize> {
    haystack
        .get(cursor..)
        .and_then(|rest| rest.find(needle))
        .map(|i| cursor + i)
        .or_else(|| haystack.find(needle))
}

fn is_timestamp(raw: &str) -> bool {
    let Some((mins, secs)) = raw.trim().split_once(':') else {
        return false;
    };
    !mins.is_empty()
        && !secs.is_empty()
        && mins.chars().all(|c| c.is_ascii_digit())
        && secs.chars().all(|c| c.is_ascii_digit())
}

fn estimate_timestamp(text: &str, offset: usize) -> String {
    let words_before = text[..offset].split_whitespace().count();
    format_timestamp(words_before as f64 / WORDS_PER_SECOND)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{config::ScriptLimits, script::validate};

    fn script(text: &str) -> Script {
        validate(text, &ScriptLimits::default()).unwrap()
    }

    #[test]
    fn parses_and_anchors_beats() {
        let s = script("Tired of cold calling? Our app books meetings for you.");
        let reply = json!([
            {"timestamp": "00:00", "script_excerpt": "Tired of cold calling?", "tone": "urgent", "visual": "Person frustrated with phone"},
            {"timestamp": "00:02", "script_excerpt": "Our app books meetings for you.", "tone": "uplifting", "visual": ""}
        ]);

        let extraction = parse_beats(&s, &reply).unwrap();
        assert_eq!(extraction.returned, 2);
        assert_eq!(extraction.dropped, 0);
        assert_eq!(extraction.beats[0].offset, 0);
        assert_eq!(extraction.beats[0].tone, Tone::Urgent);
        assert_eq!(
            extraction.beats[0].visual_hint.as_deref(),
            Some("Person frustrated with phone")
        );
        assert_eq!(extraction.beats[1].offset, 23);
        assert_eq!(extraction.beats[1].visual_hint, None);
    }

    #[test]
    fn drops_unmatched_and_invalid_beats() {
        let s = script("Sarah walks into her new apartment. She smiles.");
        let reply = json!({"beats": [
            {"timestamp": "00:00", "script_excerpt": "Sarah walks into her new apartment.", "tone": "emotional"},
            {"timestamp": "00:01", "script_excerpt": "She dances all night.", "tone": "funny"},
            {"timestamp": "00:02", "script_excerpt": "She smiles.", "tone": "melancholic"},
            {"timestamp": "00:03", "tone": "calm"},
            {"timestamp": "00:04", "script_excerpt": "   ", "tone": "calm"}
        ]});

        let extraction = parse_beats(&s, &reply).unwrap();
        assert_eq!(extraction.returned, 5);
        assert_eq!(extraction.dropped, 4);
        assert_eq!(extraction.beats.len(), 1);
        assert!(s.content().contains(&extraction.beats[0].excerpt));
    }

    #[test]
    fn reorders_beats_by_script_position() {
        let s = script("First the alarm rings. Then coffee brews. Finally she runs out.");
        let reply = json!([
            {"timestamp": "00:04", "script_excerpt": "Finally she runs out.", "tone": "urgent"},
            {"timestamp": "00:00", "script_excerpt": "First the alarm rings.", "tone": "calm"},
            {"timestamp": "00:02", "script_excerpt": "Then coffee brews.", "tone": "calm"}
        ]);

        let extraction = parse_beats(&s, &reply).unwrap();
        let excerpts: Vec<&str> = extraction.beats.iter().map(|b| b.excerpt.as_str()).collect();
        assert_eq!(
            excerpts,
            ["First the alarm rings.", "Then coffee brews.", "Finally she runs out."]
        );
    }

    #[test]
    fn case_insensitive_match_keeps_script_text() {
        let s = script("Wake Up Early and win the day.");
        let reply = json!([{"timestamp": "0:00", "script_excerpt": "wake up early", "tone": "Inspiring"}]);

        let extraction = parse_beats(&s, &reply).unwrap();
        assert_eq!(extraction.beats[0].excerpt, "Wake Up Early");
        assert_eq!(extraction.beats[0].tone, Tone::Inspiring);
    }

    #[test]
    fn repeated_excerpts_anchor_to_successive_occurrences() {
        let s = script("Stop. Breathe. Stop. Smile.");
        let reply = json!([
            {"timestamp": "00:00", "script_excerpt": "Stop.", "tone": "serious"},
            {"timestamp": "00:01", "script_excerpt": "Stop.", "tone": "calm"}
        ]);

        let extraction = parse_beats(&s, &reply).unwrap();
        assert_eq!(extraction.beats[0].offset, 0);
        assert_eq!(extraction.beats[1].offset, 15);
    }

    #[test]
    fn estimates_missing_or_bad_timestamps() {
        let s = script("one two three four five six seven eight nine ten. Then the reveal.");
        let reply = json!([
            {"timestamp": "soon", "script_excerpt": "Then the reveal.", "tone": "mysterious"}
        ]);

        let extraction = parse_beats(&s, &reply).unwrap();
        assert_eq!(extraction.beats[0].timestamp, "00:04");
    }

    #[test]
    fn rejects_non_array_replies() {
        let s = script("A perfectly fine script.");
        for reply in [json!("beats"), json!({"scenes": []}), json!(42)] {
            let err = parse_beats(&s, &reply).unwrap_err();
            assert!(matches!(err, AnalysisError::MalformedResponse { .. }));
        }
    }

    #[test]
    fn schema_lists_every_tone() {
        let schema = beats_schema();
        let tones = schema["items"]["properties"]["tone"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(tones.len(), Tone::ALL.len());
    }
}
