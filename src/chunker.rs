//! The pull-style chunk emitter: buffers input from an external [`Source`],
//! enforces the configured min/max chunk size, evaluates the split mask, and
//! emits [`Chunk`] records in strict stream order.
//!
//! A single split mask drives the cut rule, with a dismiss phase that
//! guarantees the minimum size and a forced cut at the maximum size, over an
//! arbitrary streaming [`Source`] rather than a fixed in-memory slice.

use crate::entropy::Entropy;
use crate::error::Result;
use crate::irreducible::random_irreducible;
use crate::polynomial::Polynomial;
use crate::rolling_hash::RollingHash;
use crate::source::Source;
use crate::tables::{Tables, WINDOW_SIZE};
use std::sync::Arc;

/// Default minimum chunk size: 512 KiB.
pub const DEFAULT_MIN: usize = 512 * 1024;
/// Default maximum chunk size: 8 MiB.
pub const DEFAULT_MAX: usize = 8 * 1024 * 1024;
/// Default split-mask width, in bits. Average chunk size under uniform
/// input is `2^DEFAULT_AVERAGE_BITS` bytes.
pub const DEFAULT_AVERAGE_BITS: u32 = 20;
/// Default split mask: `(1 << DEFAULT_AVERAGE_BITS) - 1`.
pub const DEFAULT_SPLIT_MASK: u64 = (1 << DEFAULT_AVERAGE_BITS) - 1;

/// Size of the chunker's internal read-ahead buffer. Independent of
/// `DEFAULT_MIN`, even though both happen to be 512 KiB.
const READ_AHEAD_BUF_SIZE: usize = 512 * 1024;

/// One content-defined chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Byte offset, within the overall stream, where this chunk begins.
    pub start: u64,
    /// Number of bytes in this chunk. Equal to `data.len() as u64`.
    pub length: u64,
    /// The rolling digest value at the cut point (the fingerprint including
    /// the final byte of the chunk).
    pub cut: u64,
    /// The chunk's bytes.
    pub data: Vec<u8>,
}

/// A pull-style, content-defined chunk emitter over an external byte
/// [`Source`].
///
/// Single-threaded and cooperative: all work happens inside calls to
/// [`Chunker::next`], which may block inside a read from `source`. There is
/// no background thread and no implicit parallelism.
pub struct Chunker<S> {
    source: S,
    hasher: RollingHash,
    tables: Arc<Tables>,
    pol: Polynomial,
    pol_shift: i32,

    buf: Vec<u8>,
    bpos: usize,
    bmax: usize,

    start: u64,
    count: u64,
    pos: u64,
    pre: usize,
    closed: bool,

    min_size: usize,
    max_size: usize,
    split_mask: u64,
}

impl<S: Source> Chunker<S> {
    /// Creates a chunker with the default min/max/split-mask constants.
    ///
    /// # Panics
    ///
    /// Panics (via [`Chunker::new_with_boundaries`]) if `pol` is not
    /// irreducible or not of degree 53, a precondition of this entire
    /// module, checked with a debug assertion since verifying
    /// irreducibility is relatively expensive and the caller is expected to
    /// have obtained `pol` from [`random_irreducible`] or a similarly
    /// vetted source.
    pub fn new(source: S, pol: Polynomial) -> Chunker<S> {
        Chunker::new_with_boundaries(source, pol, DEFAULT_MIN, DEFAULT_MAX)
    }

    /// Creates a chunker with custom `min`/`max` chunk size boundaries.
    ///
    /// # Panics
    ///
    /// Panics if `min < WINDOW_SIZE`, if `max < min`, or (debug builds only)
    /// if `pol` is not an irreducible polynomial of degree 53.
    pub fn new_with_boundaries(source: S, pol: Polynomial, min: usize, max: usize) -> Chunker<S> {
        check_boundaries(min, max, pol);

        let tables = crate::tables::get_tables(pol);
        let mut chunker = Chunker {
            source,
            hasher: RollingHash::new(pol),
            tables,
            pol,
            pol_shift: pol.deg() - 8,
            buf: vec![0u8; READ_AHEAD_BUF_SIZE],
            bpos: 0,
            bmax: 0,
            start: 0,
            count: 0,
            pos: 0,
            pre: 0,
            closed: false,
            min_size: min,
            max_size: max,
            split_mask: DEFAULT_SPLIT_MASK,
        };
        chunker.begin_chunk();
        chunker
    }

    /// Reinitializes this chunker with a new `source` and `pol`, keeping the
    /// current min/max boundaries and split mask. Reuses the read-ahead
    /// buffer.
    ///
    /// # Panics
    ///
    /// Panics (debug builds only) if `pol` is not an irreducible polynomial
    /// of degree 53.
    pub fn reset(&mut self, source: S, pol: Polynomial) {
        self.reset_with_boundaries(source, pol, self.min_size, self.max_size);
    }

    /// Reinitializes this chunker with a new `source`, `pol`, and min/max
    /// boundaries. The split mask (set via [`Chunker::set_average_bits`] or
    /// defaulted) is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `min < WINDOW_SIZE`, if `max < min`, or (debug builds only)
    /// if `pol` is not an irreducible polynomial of degree 53.
    pub fn reset_with_boundaries(&mut self, source: S, pol: Polynomial, min: usize, max: usize) {
        check_boundaries(min, max, pol);

        self.source = source;
        self.pol = pol;
        self.pol_shift = pol.deg() - 8;
        self.tables = crate::tables::get_tables(pol);
        self.min_size = min;
        self.max_size = max;
        self.bpos = 0;
        self.bmax = 0;
        self.pos = 0;
        self.closed = false;
        self.begin_chunk();
    }

    /// Sets the split-mask width in bits: `split_mask = (1 << n) - 1`.
    /// Average chunk size under uniform input becomes `2^n` bytes.
    pub fn set_average_bits(&mut self, n: u32) {
        self.split_mask = (1u64 << n) - 1;
    }

    /// Prepares rolling-hash and bookkeeping state for the start of a new
    /// chunk: reuses the chunker's already-resolved tables (no cache lookup
    /// needed), zeroes the window/digest, seeds with `slide(1)` so that a
    /// run of leading zero bytes does not collapse the fingerprint to zero,
    /// and records the dismiss-phase byte count.
    fn begin_chunk(&mut self) {
        self.hasher.reset_with_tables(self.pol_shift, Arc::clone(&self.tables));
        self.count = 0;
        self.hasher.slide(1);
        self.start = self.pos;
        self.pre = self.min_size - WINDOW_SIZE;
    }

    /// Emits the next chunk, or `Ok(None)` at end-of-stream.
    ///
    /// `scratch` is cleared and then used as the accumulator for this
    /// chunk's bytes; on a successful cut its buffer becomes the returned
    /// [`Chunk`]'s `data`, and `scratch` is left as an empty `Vec` with the
    /// same capacity it had on entry, ready to be reused (and regrown if
    /// needed) on the next call.
    ///
    /// Once end-of-stream has been reached, every subsequent call returns
    /// `Ok(None)` until [`Chunker::reset`] (or
    /// [`Chunker::reset_with_boundaries`]) is called.
    ///
    /// Read errors from `source` propagate as `Err`; after an error, this
    /// chunker's state is undefined and it must be reset before further use.
    pub fn next(&mut self, scratch: &mut Vec<u8>) -> Result<Option<Chunk>> {
        let capacity = scratch.capacity();
        scratch.clear();

        loop {
            if self.bpos == self.bmax {
                if self.closed {
                    return Ok(None);
                }

                let n = self.source.read(&mut self.buf)?;
                if n == 0 {
                    self.closed = true;
                    if self.count > 0 {
                        return Ok(Some(self.emit(scratch, capacity)));
                    }
                    return Ok(None);
                }
                self.bpos = 0;
                self.bmax = n;
            }

            // Dismiss phase: copy bytes below the `min_size - WINDOW_SIZE`
            // threshold without fingerprinting them.
            while self.pre > 0 && self.bpos < self.bmax {
                let b = self.buf[self.bpos];
                scratch.push(b);
                self.bpos += 1;
                self.pos += 1;
                self.count += 1;
                self.pre -= 1;
            }
            if self.pre > 0 {
                continue;
            }

            // Scan phase: fingerprint each byte and evaluate the cut
            // predicate after it has been slid in.
            while self.bpos < self.bmax {
                let b = self.buf[self.bpos];
                self.hasher.slide(b);
                scratch.push(b);
                self.bpos += 1;
                self.pos += 1;
                self.count += 1;

                if (self.count as usize) < self.min_size {
                    continue;
                }

                let digest = self.hasher.digest().value();
                if (digest & self.split_mask) == 0 || self.count as usize >= self.max_size {
                    log::trace!(
                        "chunk cut at start={} length={} cut=0x{digest:x}",
                        self.start,
                        self.count
                    );
                    let chunk = Chunk {
                        start: self.start,
                        length: self.count,
                        cut: digest,
                        data: std::mem::replace(scratch, Vec::with_capacity(capacity)),
                    };
                    self.begin_chunk();
                    return Ok(Some(chunk));
                }
            }
        }
    }

    /// Emits the current accumulated (necessarily final, possibly
    /// under-`min_size`) chunk at end-of-stream.
    fn emit(&mut self, scratch: &mut Vec<u8>, capacity: usize) -> Chunk {
        let digest = self.hasher.digest().value();
        log::trace!(
            "final chunk at start={} length={} cut=0x{digest:x}",
            self.start,
            self.count
        );
        Chunk {
            start: self.start,
            length: self.count,
            cut: digest,
            data: std::mem::replace(scratch, Vec::with_capacity(capacity)),
        }
    }
}

fn check_boundaries(min: usize, max: usize, pol: Polynomial) {
    assert!(
        min >= WINDOW_SIZE,
        "minimum chunk size {min} must be at least the window size {WINDOW_SIZE}"
    );
    assert!(max >= min, "maximum chunk size {max} must be at least the minimum {min}");
    debug_assert_eq!(pol.deg(), 53, "chunker polynomial must have degree 53");
    debug_assert!(
        crate::irreducible::irreducible(pol),
        "chunker polynomial must be irreducible"
    );
}

/// Convenience constructor: draws a fresh random irreducible polynomial from
/// `entropy` and builds a [`Chunker`] with the default boundaries.
pub fn new_with_random_polynomial<S: Source>(
    source: S,
    entropy: &mut impl Entropy,
) -> Result<Chunker<S>> {
    let pol = random_irreducible(entropy)?;
    Ok(Chunker::new(source, pol))
}
