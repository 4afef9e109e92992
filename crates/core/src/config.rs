use std::{str::FromStr, sync::Arc, time::Duration};

use crate::{error::ConfigError, guidance::KnowledgeBase};

pub const DEFAULT_DURATION: u32 = 5;
pub const DEFAULT_ASPECT_RATIO: &str = "9:16";
pub const MIN_SCRIPT_LENGTH: usize = 10;
pub const MAX_SCRIPT_LENGTH: usize = 5000;
pub const DEFAULT_FEASIBILITY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Clip durations accepted by current AI video tools, in seconds.
pub const DURATION_RANGE: std::ops::RangeInclusive<u32> = 1..=30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLimits {
    pub min: usize,
    pub max: usize,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            min: MIN_SCRIPT_LENGTH,
            max: MAX_SCRIPT_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneDefaults {
    pub duration: u32,
    pub aspect_ratio: String,
}

impl Default for SceneDefaults {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
        }
    }
}

/// Immutable settings handed to every pipeline stage.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub limits: ScriptLimits,
    pub scene: SceneDefaults,
    pub feasibility_threshold: f64,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    /// Overrides the provider's default model when set.
    pub model: Option<String>,
    pub knowledge: Arc<KnowledgeBase>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            limits: ScriptLimits::default(),
            scene: SceneDefaults::default(),
            feasibility_threshold: DEFAULT_FEASIBILITY_THRESHOLD,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            model: None,
            knowledge: Arc::new(KnowledgeBase::default()),
        }
    }
}

impl AnalysisConfig {
    /// Load settings from process environment variables, keeping defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(duration) = parse_var::<u32, _>(&lookup, "DEFAULT_DURATION")? {
            config.scene.duration = check_duration("DEFAULT_DURATION", duration)?;
        }
        if let Some(ratio) = lookup("DEFAULT_ASPECT_RATIO") {
            config.scene.aspect_ratio = check_aspect_ratio("DEFAULT_ASPECT_RATIO", &ratio)?;
        }
        if let Some(min) = parse_var(&lookup, "MIN_SCRIPT_LENGTH")? {
            config.limits.min = min;
        }
        if let Some(max) = parse_var(&lookup, "MAX_SCRIPT_LENGTH")? {
            config.limits.max = max;
        }
        if config.limits.min > config.limits.max {
            return Err(ConfigError::Invalid {
                var: "MIN_SCRIPT_LENGTH",
                value: config.limits.min.to_string(),
                reason: format!("greater than MAX_SCRIPT_LENGTH ({})", config.limits.max),
            });
        }
        if let Some(threshold) = parse_var::<f64, _>(&lookup, "FEASIBILITY_THRESHOLD")? {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::Invalid {
                    var: "FEASIBILITY_THRESHOLD",
                    value: threshold.to_string(),
                    reason: "must be between 0.0 and 1.0".to_string(),
                });
            }
            config.feasibility_threshold = threshold;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "CACHE_TTL")? {
            config.cache_ttl = Duration::from_secs(secs);
        }
        config.model = lookup("BROLL_MODEL").filter(|m| !m.trim().is_empty());

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        })
}

pub fn check_duration(var: &'static str, duration: u32) -> Result<u32, ConfigError> {
    if DURATION_RANGE.contains(&duration) {
        Ok(duration)
    } else {
        Err(ConfigError::Invalid {
            var,
            value: duration.to_string(),
            reason: format!(
                "must be between {} and {} seconds",
                DURATION_RANGE.start(),
                DURATION_RANGE.end()
            ),
        })
    }
}

/// Accepts `W:H` with two positive integers, e.g. `9:16`.
pub fn check_aspect_ratio(var: &'static str, ratio: &str) -> Result<String, ConfigError> {
    let ratio = ratio.trim();
    let valid = ratio
        .split_once(':')
        .map(|(w, h)| {
            matches!(w.parse::<u32>(), Ok(n) if n > 0) && matches!(h.parse::<u32>(), Ok(n) if n > 0)
        })
        .unwrap_or(false);

    if valid {
        Ok(ratio.to_string())
    } else {
        Err(ConfigError::Invalid {
            var,
            value: ratio.to_string(),
            reason: "expected W:H, e.g. 9:16".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let config = AnalysisConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.scene.duration, 5);
        assert_eq!(config.scene.aspect_ratio, "9:16");
        assert_eq!(config.limits, ScriptLimits { min: 10, max: 5000 });
        assert_eq!(config.feasibility_threshold, 0.5);
        assert!(config.model.is_none());
    }

    #[test]
    fn env_overrides_defaults() {
        let config = AnalysisConfig::from_lookup(lookup_from(&[
            ("DEFAULT_DURATION", "3"),
            ("DEFAULT_ASPECT_RATIO", "16:9"),
            ("MAX_SCRIPT_LENGTH", "200"),
            ("FEASIBILITY_THRESHOLD", "0.4"),
            ("REQUEST_TIMEOUT_SECS", "15"),
            ("BROLL_MODEL", "gpt-4o"),
        ]))
        .unwrap();
        assert_eq!(config.scene.duration, 3);
        assert_eq!(config.scene.aspect_ratio, "16:9");
        assert_eq!(config.limits.max, 200);
        assert_eq!(config.feasibility_threshold, 0.4);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn rejects_bad_values() {
        for pairs in [
            [("DEFAULT_DURATION", "abc")],
            [("DEFAULT_DURATION", "45")],
            [("DEFAULT_ASPECT_RATIO", "wide")],
            [("FEASIBILITY_THRESHOLD", "1.5")],
            [("MIN_SCRIPT_LENGTH", "9000")],
        ] {
            assert!(
                AnalysisConfig::from_lookup(lookup_from(&pairs)).is_err(),
                "{:?} should be rejected",
                pairs
            );
        }
    }
}
