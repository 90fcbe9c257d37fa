//! Error types for the proxyscan client

use thiserror::Error;

/// Errors surfaced by the library
#[derive(Error, Debug)]
pub enum Error {
    /// The listing endpoint rejected the query, returned an unparseable
    /// body, or returned no records.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// A record's protocol is not one of http, https, socks4, socks5.
    #[error("Unsupported proxy protocol: {0:?}")]
    UnsupportedProtocol(String),
    /// Verification discarded every candidate within the retry budget.
    #[error("No working proxy found after {attempts} attempts")]
    ProbeExhausted { attempts: u32 },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Library result type
pub type Result<T> = std::result::Result<T, Error>;
