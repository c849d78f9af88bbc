use thiserror::Error;

/// Top-level error type for the `xca-api` crate.
///
/// Covers the authentication step and every stage of an API query:
/// request construction, transport, response validation, body read and
/// decoding. The CLI collapses the query-stage variants into one exit code
/// and keeps them apart only in the printed message.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token request rejected or answered with something other than a token.
    #[error("{message}")]
    Authentication { message: String },

    // ── Request construction ────────────────────────────────────────
    /// The request could not be built locally (malformed host, bad path).
    #[error("could not create HTTP(S) request: {message}")]
    RequestConstruction { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Network-level failure: DNS, connect, TLS handshake, timeout.
    #[error("could not connect to XCA: {0}")]
    Transport(#[source] reqwest::Error),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Response validation ─────────────────────────────────────────
    #[error("got status code {actual} instead of {expected}")]
    UnexpectedStatus { actual: u16, expected: u16 },

    #[error("Content-Type {actual} returned instead of {expected}")]
    UnexpectedContentType {
        actual: String,
        expected: &'static str,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// The body stream failed part-way through.
    #[error("could not read server response: {0}")]
    BodyRead(#[source] reqwest::Error),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("could not decode server response: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the underlying transport gave up waiting.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) | Self::BodyRead(e) => e.is_timeout(),
            _ => false,
        }
    }
}
