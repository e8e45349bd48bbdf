use thiserror::Error;

/// Failures from the hosted text-generation providers.
///
/// Call sites are expected to degrade to templated fallback text rather
/// than surface these, except `Unconfigured` at startup.
#[derive(Error, Debug)]
pub enum AssistError {
    /// No provider credentials present (fatal in production)
    #[error("no text-generation provider configured")]
    Unconfigured,

    /// Transport-level failure (connect, timeout)
    #[error("{provider} request failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Provider answered with a non-success status
    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Provider reply did not contain usable text
    #[error("{provider} returned an unreadable reply: {message}")]
    Malformed {
        provider: &'static str,
        message: String,
    },
}
