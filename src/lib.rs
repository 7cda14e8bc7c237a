//! Content-defined chunking (CDC) of byte streams via a rolling Rabin
//! fingerprint over a random irreducible polynomial in GF(2)\[X\].
//!
//! Chunk boundaries are determined by the *content* of the stream rather
//! than its absolute position, so local insertions or deletions only
//! perturb nearby chunks, the foundational primitive behind deduplicating
//! backup and storage systems.
//!
//! The crate is layered bottom-up:
//!
//! - [`polynomial`], arithmetic over GF(2)\[X\] packed into a `u64`.
//! - [`irreducible`], Ben-Or's irreducibility test and random polynomial
//!   generation.
//! - [`tables`], precomputed per-polynomial lookup tables, memoized in a
//!   process-wide cache.
//! - [`rolling_hash`], the 64-byte sliding-window Rabin fingerprint.
//! - [`source`] / [`entropy`], the external byte-producer traits the
//!   chunker and random polynomial generator pull from.
//! - [`chunker`], the pull-style chunk emitter built on all of the above.
//!
//! ```no_run
//! use rabin_cdc::chunker::Chunker;
//! use rabin_cdc::irreducible::random_irreducible;
//!
//! # fn run(mut source: impl std::io::Read) -> rabin_cdc::error::Result<()> {
//! let pol = random_irreducible(&mut rand::thread_rng())?;
//! let mut chunker = Chunker::new(source, pol);
//! let mut scratch = Vec::new();
//! while let Some(chunk) = chunker.next(&mut scratch)? {
//!     println!("chunk at {}: {} bytes, cut 0x{:x}", chunk.start, chunk.length, chunk.cut);
//! }
//! # Ok(())
//! # }
//! ```

pub mod chunker;
pub mod entropy;
pub mod error;
pub mod irreducible;
pub mod polynomial;
pub mod rolling_hash;
pub mod source;
pub mod tables;

pub use chunker::{Chunk, Chunker};
pub use entropy::Entropy;
pub use error::{Error, Result};
pub use irreducible::random_irreducible;
pub use polynomial::Polynomial;
pub use source::Source;
