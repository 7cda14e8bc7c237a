//! Error types and `Result` alias for this crate.

use std::io;

use thiserror::Error;

/// Errors that can be surfaced from this crate's public API.
///
/// Programmer errors (dividing by zero, using a chunker whose tables were
/// never initialized) are not represented here, they abort via `panic!`,
/// since no caller-side recovery is expected or useful for a contract
/// violation. See the module docs on [`crate::chunker`] and
/// [`crate::polynomial`] for which operations panic instead of returning
/// `Err`.
#[derive(Error, Debug)]
pub enum Error {
    /// polynomial multiplication overflowed 64 bits
    #[error("polynomial multiplication overflowed 64 bits")]
    Overflow,

    /// `random_irreducible` exhausted its attempt budget without finding an
    /// irreducible polynomial of degree 53
    #[error("no irreducible polynomial found after {attempts} attempts")]
    NoPolynomial {
        /// number of candidates tested before giving up
        attempts: u32,
    },

    /// the external byte source failed
    #[error("source read failed: {0}")]
    Source(#[from] io::Error),
}

/// Convenience alias used throughout this crate's public API.
pub type Result<T> = std::result::Result<T, Error>;
