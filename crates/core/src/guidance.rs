//! Tone and format knowledge base.
//!
//! Static guidance fragments that steer both the beat extraction prompt and
//! the visual descriptions built for each scene.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Used when a table has no entry for the requested tone.
pub const NEUTRAL_TONE_GUIDANCE: &str = "natural light, steady framing, realistic everyday setting";

/// Used when a table has no entry for the requested format.
pub const NEUTRAL_FORMAT_GUIDANCE: &str = "clean handheld footage";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Inspiring,
    Urgent,
    Calm,
    Funny,
    Serious,
    Emotional,
    Uplifting,
    Mysterious,
}

impl Tone {
    pub const ALL: [Tone; 8] = [
        Tone::Inspiring,
        Tone::Urgent,
        Tone::Calm,
        Tone::Funny,
        Tone::Serious,
        Tone::Emotional,
        Tone::Uplifting,
        Tone::Mysterious,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Inspiring => "inspiring",
            Tone::Urgent => "urgent",
            Tone::Calm => "calm",
            Tone::Funny => "funny",
            Tone::Serious => "serious",
            Tone::Emotional => "emotional",
            Tone::Uplifting => "uplifting",
            Tone::Mysterious => "mysterious",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str() == wanted)
            .ok_or_else(|| format!("unknown tone {:?}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentFormat {
    #[default]
    #[serde(rename = "UGC", alias = "ugc")]
    Ugc,
    #[serde(rename = "talking_head", alias = "talking-head")]
    TalkingHead,
    #[serde(rename = "testimonial")]
    Testimonial,
}

impl ContentFormat {
    pub const ALL: [ContentFormat; 3] = [
        ContentFormat::Ugc,
        ContentFormat::TalkingHead,
        ContentFormat::Testimonial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFormat::Ugc => "UGC",
            ContentFormat::TalkingHead => "talking_head",
            ContentFormat::Testimonial => "testimonial",
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "ugc" => Ok(ContentFormat::Ugc),
            "talking_head" => Ok(ContentFormat::TalkingHead),
            "testimonial" => Ok(ContentFormat::Testimonial),
            _ => Err(format!("unknown content format {:?}", s)),
        }
    }
}

/// Social platform presets. Only the aspect ratio feeds into scenes; the
/// rest is shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Facebook,
    InstagramFeed,
    InstagramStories,
    Tiktok,
    YoutubeShorts,
    Snapchat,
}

pub struct PlatformPreset {
    pub aspect_ratio: &'static str,
    pub duration: &'static str,
    pub focus: &'static str,
}

impl Platform {
    pub fn preset(&self) -> PlatformPreset {
        match self {
            Platform::Facebook => PlatformPreset {
                aspect_ratio: "1:1",
                duration: "15-30 seconds",
                focus: "Lifestyle transformations, social moments, family/friends content",
            },
            Platform::InstagramFeed => PlatformPreset {
                aspect_ratio: "1:1",
                duration: "15-60 seconds",
                focus: "Aesthetic appeal, lifestyle upgrade, influencer-style content",
            },
            Platform::InstagramStories => PlatformPreset {
                aspect_ratio: "9:16",
                duration: "5-15 seconds",
                focus: "Quick hooks, swipe-up CTAs, personal/intimate feel",
            },
            Platform::Tiktok => PlatformPreset {
                aspect_ratio: "9:16",
                duration: "15-30 seconds",
                focus: "Trending styles, quick cuts, younger demographic, viral potential",
            },
            Platform::YoutubeShorts => PlatformPreset {
                aspect_ratio: "9:16",
                duration: "15-60 seconds",
                focus: "Educational content, how-to reveals, authority building",
            },
            Platform::Snapchat => PlatformPreset {
                aspect_ratio: "9:16",
                duration: "3-10 seconds",
                focus: "Ultra-quick hooks, instant gratification, mobile-native",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::InstagramFeed => "Instagram Feed",
            Platform::InstagramStories => "Instagram Stories",
            Platform::Tiktok => "TikTok",
            Platform::YoutubeShorts => "YouTube Shorts",
            Platform::Snapchat => "Snapchat",
        }
    }
}

/// Read-only guidance tables, shared between concurrent scene tasks.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    tones: HashMap<Tone, String>,
    formats: HashMap<ContentFormat, String>,
}

impl KnowledgeBase {
    pub fn new(tones: HashMap<Tone, String>, formats: HashMap<ContentFormat, String>) -> Self {
        Self { tones, formats }
    }

    pub fn tone_guidance(&self, tone: Tone) -> &str {
        self.tones
            .get(&tone)
            .map(String::as_str)
            .unwrap_or(NEUTRAL_TONE_GUIDANCE)
    }

    pub fn format_guidance(&self, format: ContentFormat) -> &str {
        self.formats
            .get(&format)
            .map(String::as_str)
            .unwrap_or(NEUTRAL_FORMAT_GUIDANCE)
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        let tones = [
            (
                Tone::Inspiring,
                "golden hour light, upward camera movement, people achieving small wins",
            ),
            (
                Tone::Urgent,
                "fast cuts, ticking clocks, people rushing, tight framing",
            ),
            (
                Tone::Calm,
                "soft diffused light, slow pans, quiet uncluttered spaces",
            ),
            (
                Tone::Funny,
                "bright colors, exaggerated reactions, playful everyday mishaps",
            ),
            (
                Tone::Serious,
                "muted palette, steady locked-off shots, focused expressions",
            ),
            (
                Tone::Emotional,
                "close-ups on faces, shallow depth of field, warm intimate light",
            ),
            (
                Tone::Uplifting,
                "sunlit scenes, genuine smiles, open bright spaces",
            ),
            (
                Tone::Mysterious,
                "low-key lighting, partial reveals, slow push-in shots",
            ),
        ];
        let formats = [
            (
                ContentFormat::Ugc,
                "raw authentic footage that looks user-generated, selfie-style, genuine reactions",
            ),
            (
                ContentFormat::TalkingHead,
                "speaker framed chest-up with engaging gestures, cutaways that illustrate the point",
            ),
            (
                ContentFormat::Testimonial,
                "real customer moments, before and after reveals, emotional reactions",
            ),
        ];

        Self::new(
            tones
                .into_iter()
                .map(|(tone, text)| (tone, text.to_string()))
                .collect(),
            formats
                .into_iter()
                .map(|(format, text)| (format, text.to_string()))
                .collect(),
        )
    }
}
