//! Error types for `slip39-core`.

use thiserror::Error;

/// Errors produced while splitting, encoding, decoding or recovering shares.
///
/// Every variant is terminal for the operation that raised it: no partial
/// secret is ever returned alongside an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Slip39Error {
    /// Invalid split parameters (secret length, passphrase charset,
    /// group/member thresholds, iteration exponent).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A mnemonic (or a tree path) could not be parsed: unknown word, wrong
    /// length, checksum mismatch, non-zero padding, field out of range.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Supplied shares disagree on metadata that must be identical.
    #[error("inconsistent shares: {0}")]
    Consistency(String),

    /// Not enough distinct shares to reach a threshold.
    #[error("insufficient shares: {0}")]
    InsufficientShares(String),

    /// The digest share does not authenticate the recombined secret.
    #[error("share digest verification failed")]
    DigestMismatch,

    /// The injected random source failed to produce bytes.
    #[error("random source failure: {0}")]
    Random(String),
}
