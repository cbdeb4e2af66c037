//! Error types shared by every component in the crate.
//!
//! Failures surface at the public API boundary and are never recovered
//! locally. Each carries the name of the component that raised it; none
//! carries key or plaintext material.

use thiserror::Error;

/// Result type alias for fallible crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by ciphers, modes, digests, and generators.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Key length is not in the legal set for the chosen cipher.
    #[error("{origin}: invalid key length {length}; see the legal key sizes")]
    InvalidKey {
        origin: &'static str,
        length: usize,
    },

    /// Rounds (or iteration) count outside the component's legal assignments.
    #[error("{origin}: invalid rounds count {rounds}")]
    InvalidRounds {
        origin: &'static str,
        rounds: usize,
    },

    /// Block size not in the supported set.
    #[error("{origin}: invalid block size {size}; supported sizes are 16 and 32 bytes")]
    InvalidBlockSize {
        origin: &'static str,
        size: usize,
    },

    /// Initialization vector length does not match the cipher block size.
    #[error("{origin}: invalid iv length {length}; the iv must be one block wide")]
    InvalidIv {
        origin: &'static str,
        length: usize,
    },

    /// Parallel degree is not an even number within the processor count.
    #[error("{origin}: invalid parallel degree {degree}; the degree must be an even number no greater than the processor count")]
    InvalidDegree {
        origin: &'static str,
        degree: usize,
    },

    /// A transform was requested before `initialize`.
    #[error("{origin}: the instance has not been initialized")]
    NotInitialized { origin: &'static str },

    /// An input or output slice cannot hold the requested transform.
    #[error("{origin}: {detail}")]
    BufferTooShort {
        origin: &'static str,
        detail: &'static str,
    },

    /// A runtime invariant was violated; this should be unreachable.
    #[error("{origin}: internal state violation: {detail}")]
    InternalState {
        origin: &'static str,
        detail: &'static str,
    },

    /// A cipher-type name that no concrete cipher is registered for.
    #[error("{origin}: unknown cipher type")]
    UnknownCipher { origin: &'static str },
}
