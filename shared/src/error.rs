use thiserror::Error;

/// Reasons a submission is refused before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("A submission is already in progress")]
    InFlight,

    #[error("Please provide transcription for your handwriting")]
    EmptyTranscription,

    #[error("Please write something on the canvas")]
    NoStrokes,

    #[error("No valid stroke data after sanitization")]
    NoValidStrokes,

    #[error("Sign in before submitting a sample")]
    MissingIdentity,
}

/// Failures talking to the submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network request failed: {0}")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Server returned non-JSON response: {0}...")]
    InvalidResponse(String),

    #[error("Failed to encode request: {0}")]
    Encode(String),
}
