//! Typed failures at the HTTP boundary.
//!
//! Everything that goes wrong while talking to the backend collapses into a
//! [`FetchError`]. It is the only error kind that is surfaced to the user as
//! an inline notice; line-level decode problems inside a stream are recorded
//! as skipped lines instead (see [`crate::stream`]).

use std::io;

use thiserror::Error;

/// A request to the backend could not be completed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, refused, timeout, ...).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read to completion.
    #[error("failed to read response body: {0}")]
    Read(#[from] io::Error),

    /// A single-document JSON body did not match the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    /// Convert a `ureq` call error, keeping the URL for the message.
    pub fn from_ureq(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => Self::Status {
                url: url.to_string(),
                status,
            },
            ureq::Error::Transport(t) => Self::Transport {
                url: url.to_string(),
                message: t.to_string(),
            },
        }
    }
}
