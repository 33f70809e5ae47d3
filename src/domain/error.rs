// Error taxonomy - validation, credential, analysis and auth failures
use thiserror::Error;

/// Local input problems. Never reach the analysis client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unsupported file type. Please upload a CSV, JSON, or TXT file.")]
    UnsupportedFileType { content_type: String },

    #[error("Please fill all fields")]
    MissingFields,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("No customers selected")]
    NoRecipients,

    #[error("Offer message must not be empty")]
    EmptyMessage,

    #[error("Customer {0} is not in the current view")]
    UnknownCustomer(String),

    #[error("Upload is missing a file")]
    MissingFile,
}

/// Startup failure: the analysis client cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("API key is not configured (set API_KEY or INSIGHTS__GEMINI__API_KEY)")]
    MissingApiKey,
}

/// Remote failure while turning uploaded text into dashboard data.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to reach the analysis model: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Analysis model returned status {status}: {body}")]
    Model { status: u16, body: String },

    #[error("Analysis model returned an empty reply")]
    EmptyReply,

    #[error("Analysis reply is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("AI response is missing required data field `{0}`")]
    MissingField(String),

    #[error("AI response field `{field}` should be {expected}")]
    SchemaMismatch { field: String, expected: &'static str },
}

/// Simulated credential mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
}

/// A command was dispatched in a phase that does not accept it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{command}` is not allowed while {phase}")]
pub struct TransitionError {
    pub command: &'static str,
    pub phase: &'static str,
}

/// Failure of a single state-machine command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}
