//! Error taxonomy shared by every core operation.

use thiserror::Error;

/// Errors produced by the recommendation core.
///
/// | Variant | Raised by | Recoverable |
/// |---------|-----------|-------------|
/// | [`Data`](RecsError::Data) | catalogue load, reload | no (aborts startup) |
/// | [`NotFound`](RecsError::NotFound) | `resolve`, `neighbors`, `recommend` | yes |
/// | [`InvalidQuery`](RecsError::InvalidQuery) | `resolve`, `recommend` | yes |
/// | [`Config`](RecsError::Config) | parameter validation, `recommend` | yes |
/// | [`ReloadInProgress`](RecsError::ReloadInProgress) | `reload` | yes |
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecsError {
    /// The catalogue source is malformed (missing required columns, bad cells, no rows).
    #[error("catalogue data error: {0}")]
    Data(String),

    /// The query or product id did not resolve to a catalogue entry.
    #[error("not found: {0}")]
    NotFound(String),

    /// The query is empty or otherwise unusable.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A tunable or request parameter is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Another reload is already building a new bundle.
    #[error("a catalogue reload is already in progress")]
    ReloadInProgress,
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, RecsError>;
