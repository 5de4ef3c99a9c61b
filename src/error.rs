//! Error taxonomy for the scheduling client.

/// Everything that can go wrong between the remote API and the grid.
#[derive(thiserror::Error, Debug)]
pub enum ScheduleError {
    /// Transport-level failure: DNS, connect, timeout, broken body stream.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// A request or response body could not be encoded/decoded.
    #[error("malformed payload: {0}")]
    Payload(String),

    /// Missing or invalid trip/form fields. Raised before any request is
    /// sent or any grid is built, never after partial work.
    #[error("invalid input: {0}")]
    Validation(String),
}
