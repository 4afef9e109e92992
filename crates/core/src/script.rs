use crate::{config::ScriptLimits, error::ValidationError};

/// Script text that passed validation. Length is counted in characters of
/// the trimmed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    content: String,
    length: usize,
}

impl Script {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

pub fn validate(raw: &str, limits: &ScriptLimits) -> Result<Script, ValidationError> {
    let content = raw.trim();
    let length = content.chars().count();

    if length < limits.min {
        return Err(ValidationError::TooShort {
            length,
            min: limits.min,
        });
    }
    if length > limits.max {
        return Err(ValidationError::TooLong {
            length,
            max: limits.max,
        });
    }

    Ok(Script {
        content: content.to_string(),
        length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: ScriptLimits = ScriptLimits { min: 10, max: 40 };

    #[test]
    fn accepts_bounds_inclusive() {
        assert!(validate(&"a".repeat(10), &LIMITS).is_ok());
        assert!(validate(&"a".repeat(40), &LIMITS).is_ok());
    }

    #[test]
    fn rejects_outside_bounds() {
        assert_eq!(
            validate("Hi", &LIMITS),
            Err(ValidationError::TooShort { length: 2, min: 10 })
        );
        assert_eq!(
            validate(&"a".repeat(41), &LIMITS),
            Err(ValidationError::TooLong { length: 41, max: 40 })
        );
    }

    #[test]
    fn whitespace_does_not_count() {
        assert_eq!(
            validate("   \n\t  ", &LIMITS),
            Err(ValidationError::TooShort { length: 0, min: 10 })
        );
        let script = validate("   hello world   ", &LIMITS).unwrap();
        assert_eq!(script.content(), "hello world");
        assert_eq!(script.len(), 11);
        assert_eq!(script.word_count(), 2);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 10 characters, 20 bytes
        let script = validate("éééééééééé", &LIMITS).unwrap();
        assert_eq!(script.len(), 10);
    }
}
