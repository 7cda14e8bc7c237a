//! Golden scenarios and reproducibility properties for the chunker.
//!
//! S1 and S3 pin chunk boundaries to a *specific* PRNG byte sequence, a test
//! fixture, not part of the library's contract. Without that exact
//! generator's source available to reproduce bit-for-bit, this file
//! exercises S1/S3-shaped input (32 MiB from a seeded deterministic
//! generator) against the structural invariants those scenarios are built to
//! check: chunk count sums to the input size, boundaries are monotonic,
//! every non-final chunk respects the mask or the max-size forced cut,
//! rather than asserting the exact `(length, cut)` literals, which this
//! crate cannot independently verify are correct without running the golden
//! generator itself. If that generator's exact constants are ever recovered,
//! S1/S3 should assert their literal tables too, the way S2 already does.
//!
//! S2 (the all-zero stream) has no such dependency: its expected chunk
//! count, length, and SHA-256 are fully determined by the algorithm alone,
//! and are asserted exactly.

use rabin_cdc::chunker::{Chunker, DEFAULT_MAX, DEFAULT_MIN};
use rabin_cdc::polynomial::Polynomial;
use sha2::{Digest, Sha256};
use std::io::Cursor;

/// The polynomial used throughout these golden scenarios: degree 53.
const GOLDEN_POLY: u64 = 0x3DA3358B4DC173;

fn golden_pol() -> Polynomial {
    Polynomial::new(GOLDEN_POLY)
}

/// Deterministic pseudo-random byte generator for test fixtures: a 32-bit
/// linear congruential generator seeded with `seed`, emitting the four
/// little-endian bytes of each draw with the top bit of the draw cleared,
/// so two generators seeded identically always agree.
struct Lcg32 {
    state: u32,
}

impl Lcg32 {
    fn new(seed: u32) -> Self {
        Lcg32 { state: seed }
    }

    fn next_bytes(&mut self) -> [u8; 4] {
        // Numerical Recipes constants; any fixed LCG works for a
        // self-consistent test fixture, since nothing outside this file
        // depends on matching an external byte sequence exactly.
        self.state = self
            .state
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223);
        let cleared = self.state & 0x7fff_ffff;
        cleared.to_le_bytes()
    }

    fn fill(&mut self, len: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(len);
        while out.len() < len {
            out.extend_from_slice(&self.next_bytes());
        }
        out.truncate(len);
        out
    }
}

#[test]
fn s2_all_zero_stream_yields_four_min_size_chunks_with_known_sha256() {
    const EXPECTED_SHA256: &str =
        "07854d2fef297a06ba81685e660c332de36d5d18d546927d30daad6d7fda1541";
    assert_eq!(EXPECTED_SHA256.len(), 64, "SHA-256 hex digest must be 64 chars");

    let data = vec![0u8; DEFAULT_MIN * 4];
    let mut chunker = Chunker::new(Cursor::new(data), golden_pol());
    let mut scratch = Vec::new();

    let mut chunks = Vec::new();
    while let Some(chunk) = chunker.next(&mut scratch).unwrap() {
        chunks.push(chunk);
    }

    assert_eq!(chunks.len(), 4, "expected exactly 4 chunks from 4*minSize zero bytes");
    for chunk in &chunks {
        assert_eq!(chunk.length as usize, DEFAULT_MIN);
        assert_eq!(chunk.cut, 0, "an all-zero chunk's fingerprint reduces to zero");

        let digest = Sha256::digest(&chunk.data);
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(hex, EXPECTED_SHA256);
    }
}

#[test]
fn s1_shaped_input_respects_chunk_invariants() {
    let mut rng = Lcg32::new(23);
    let data = rng.fill(32 * 1024 * 1024);
    assert_chunking_invariants(&data, golden_pol(), DEFAULT_MIN, DEFAULT_MAX, None);
}

#[test]
fn s3_shaped_input_with_average_bits_19_respects_chunk_invariants() {
    let mut rng = Lcg32::new(23);
    let data = rng.fill(32 * 1024 * 1024);
    assert_chunking_invariants(&data, golden_pol(), DEFAULT_MIN, DEFAULT_MAX, Some(19));
}

#[test]
fn s4_reset_round_trip_is_deterministic() {
    let mut rng = Lcg32::new(23);
    let data = rng.fill(4 * 1024 * 1024);

    let mut chunker = Chunker::new(Cursor::new(data.clone()), golden_pol());
    let mut scratch = Vec::new();
    let mut first_pass = Vec::new();
    while let Some(chunk) = chunker.next(&mut scratch).unwrap() {
        first_pass.push(chunk);
    }

    chunker.reset(Cursor::new(data), golden_pol());
    let mut second_pass = Vec::new();
    while let Some(chunk) = chunker.next(&mut scratch).unwrap() {
        second_pass.push(chunk);
    }

    assert_eq!(first_pass, second_pass);
}

#[test]
fn s5_different_polynomial_changes_the_first_chunk() {
    let mut rng = Lcg32::new(23);
    let data = rng.fill(4 * 1024 * 1024);

    let mut a = Chunker::new(Cursor::new(data.clone()), golden_pol());
    let mut scratch = Vec::new();
    let first_a = a.next(&mut scratch).unwrap().expect("a chunk");

    let mut entropy_rng = rand::thread_rng();
    let other_pol = rabin_cdc::random_irreducible(&mut entropy_rng).unwrap();
    assert_ne!(other_pol, golden_pol());

    let mut b = Chunker::new(Cursor::new(data), other_pol);
    let mut scratch2 = Vec::new();
    let first_b = b.next(&mut scratch2).unwrap().expect("a chunk");

    assert!(
        first_a.length != first_b.length || first_a.cut != first_b.cut,
        "an unrelated random polynomial should, with overwhelming probability, cut differently"
    );
}

#[test]
fn s6_read_boundary_independence() {
    let mut rng = Lcg32::new(23);
    let data = rng.fill(2 * 1024 * 1024);

    let mut whole = Chunker::new(Cursor::new(data.clone()), golden_pol());
    let mut scratch = Vec::new();
    let mut whole_chunks = Vec::new();
    while let Some(chunk) = whole.next(&mut scratch).unwrap() {
        whole_chunks.push(chunk);
    }

    struct OneByteReader(Cursor<Vec<u8>>);
    impl rabin_cdc::source::Source for OneByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            use std::io::Read;
            self.0.read(&mut buf[..buf.len().min(1)])
        }
    }

    let mut trickle = Chunker::new(OneByteReader(Cursor::new(data)), golden_pol());
    let mut scratch2 = Vec::new();
    let mut trickle_chunks = Vec::new();
    while let Some(chunk) = trickle.next(&mut scratch2).unwrap() {
        trickle_chunks.push(chunk);
    }

    assert_eq!(whole_chunks, trickle_chunks);
}

/// Shared assertions for the chunking invariants these scenarios check.
fn assert_chunking_invariants(
    data: &[u8],
    pol: Polynomial,
    min: usize,
    max: usize,
    average_bits: Option<u32>,
) {
    let mut chunker = Chunker::new_with_boundaries(Cursor::new(data.to_vec()), pol, min, max);
    if let Some(bits) = average_bits {
        chunker.set_average_bits(bits);
    }
    let split_mask = average_bits.map_or((1u64 << 20) - 1, |n| (1u64 << n) - 1);

    let mut scratch = Vec::new();
    let mut chunks = Vec::new();
    while let Some(chunk) = chunker.next(&mut scratch).unwrap() {
        chunks.push(chunk);
    }

    assert!(!chunks.is_empty());

    let total: u64 = chunks.iter().map(|c| c.length).sum();
    assert_eq!(total as usize, data.len(), "chunk lengths must sum to total bytes read");

    let mut expected_start = 0u64;
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.start, expected_start, "chunk.start must equal sum of prior lengths");
        expected_start += chunk.length;

        let is_last = i + 1 == chunks.len();
        if !is_last {
            assert!(
                chunk.length as usize >= min,
                "non-final chunk {i} shorter than min_size"
            );
            assert!(
                chunk.length as usize <= max,
                "non-final chunk {i} longer than max_size"
            );
            assert!(
                (chunk.cut & split_mask) == 0 || chunk.length as usize == max,
                "non-final chunk {i} cut at neither the split mask nor max_size"
            );
        } else {
            assert!(chunk.length as usize <= max, "final chunk longer than max_size");
        }
    }
}
