use thiserror::Error;

/// Why a forecast load failed.
///
/// The variants exist for diagnostics only; every one of them is presented to
/// the user the same way (see [`FetchError::user_message`]).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout or body transfer failure.
    #[error("forecast request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("forecast request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The payload was not JSON or lacked required fields.
    #[error("malformed forecast payload: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::Malformed(message.into())
    }

    /// Text shown in place of the forecast when loading fails.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        "Failed to load data"
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
