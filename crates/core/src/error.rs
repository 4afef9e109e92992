use thiserror::Error;

use crate::completion::CompletionError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Script is too short: {length} characters, at least {min} required")]
    TooShort { length: usize, min: usize },

    #[error("Script is too long: {length} characters, at most {max} allowed")]
    TooLong { length: usize, max: usize },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Text-completion service unavailable: {0}")]
    ServiceUnavailable(#[source] CompletionError),

    #[error("Malformed response from text-completion service: {reason}")]
    MalformedResponse { reason: String },

    #[error("Text-completion service did not answer within {seconds:.1}s")]
    Timeout { seconds: f64 },
}

impl AnalysisError {
    /// Analysis is side-effect free, so the caller may resend the same script.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AnalysisError::ServiceUnavailable(_)
                | AnalysisError::MalformedResponse { .. }
                | AnalysisError::Timeout { .. }
        )
    }
}

impl From<CompletionError> for AnalysisError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::InvalidResponse { reason } => {
                AnalysisError::MalformedResponse { reason }
            }
            CompletionError::Http(e) if e.is_decode() => AnalysisError::MalformedResponse {
                reason: e.to_string(),
            },
            other => AnalysisError::ServiceUnavailable(other),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("Cannot assemble {scenes} scenes with {assessments} feasibility assessments")]
    Mismatch { scenes: usize, assessments: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error("Scene task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;

    #[test]
    fn unparseable_reply_is_malformed() {
        let err: AnalysisError = CompletionError::InvalidResponse {
            reason: "expected JSON".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            AnalysisError::MalformedResponse { ref reason } if reason == "expected JSON"
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn transport_and_setup_failures_are_unavailable() {
        let status: AnalysisError = CompletionError::Status {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: "slow down".to_string(),
        }
        .into();
        assert!(matches!(
            status,
            AnalysisError::ServiceUnavailable(CompletionError::Status { .. })
        ));

        let provider: AnalysisError = CompletionError::Provider(ProviderError::MissingApiKey {
            provider_name: "OpenAI".to_string(),
            env_var: "OPENAI_API_KEY".to_string(),
        })
        .into();
        assert!(matches!(
            provider,
            AnalysisError::ServiceUnavailable(CompletionError::Provider(_))
        ));
    }
}
