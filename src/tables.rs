//! Precomputed slide-out and modular-reduction tables for a given modulus
//! polynomial, and a process-wide cache that memoizes them.
//!
//! The polynomial varies at runtime (`random_irreducible` or a caller-chosen
//! value), so table construction lives in its own module rather than any one
//! `RollingHash` instance, and a process-wide cache (`once_cell::sync::Lazy`
//! guarding a `Mutex<HashMap<..>>`) lets chunkers that happen to share a
//! polynomial share the computation too.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::polynomial::Polynomial;

/// Number of entries in each lookup table: one per possible byte value.
pub const TABLE_ENTRIES: usize = 256;

/// The sliding-window size, in bytes, the tables and rolling hash assume.
pub const WINDOW_SIZE: usize = 64;

/// A pair of 256-entry lookup tables derived from one modulus polynomial.
///
/// Immutable once built; safe to share across threads via `Arc`.
#[derive(Debug)]
pub struct Tables {
    /// `out[b]` cancels the contribution of a byte value `b` leaving the
    /// sliding window: the Rabin fingerprint of `(b, 0, 0, ..., 0)`, padded
    /// to [`WINDOW_SIZE`] bytes, under the modulus polynomial.
    pub out: [Polynomial; TABLE_ENTRIES],

    /// `mod_table[b] = ((b << k) mod p) | (b << k)`, where `k = deg(p)`. The
    /// low bits supply the reduced remainder; the high bits reproduce the
    /// top 8 bits of the pre-reduction digest, so a single XOR both reduces
    /// modulo `p` and clears those top bits in one step.
    pub modulus: [Polynomial; TABLE_ENTRIES],
}

impl Tables {
    /// Builds the table pair for modulus polynomial `p`. Pure and
    /// deterministic: depends only on `p`.
    fn build(p: Polynomial) -> Tables {
        let k = p.deg();

        let mut out = [Polynomial::ZERO; TABLE_ENTRIES];
        for (b, slot) in out.iter_mut().enumerate() {
            // Append the byte sequence (b, 0, 0, ..., 0) of length
            // WINDOW_SIZE to the zero polynomial, under p.
            let mut hash = Polynomial::new(b as u64).modulo(p);
            for _ in 0..WINDOW_SIZE - 1 {
                hash = Polynomial::new(hash.value() << 8).modulo(p);
            }
            *slot = hash;
        }

        let mut modulus = [Polynomial::ZERO; TABLE_ENTRIES];
        for (b, slot) in modulus.iter_mut().enumerate() {
            let shifted = Polynomial::new((b as u64) << k);
            *slot = shifted.modulo(p).add(shifted);
        }

        Tables { out, modulus }
    }
}

type CacheMap = HashMap<Polynomial, Arc<Tables>>;

static CACHE: Lazy<Mutex<CacheMap>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns the shared, immutable `Tables` for `pol`, building and
/// memoizing them on first request.
///
/// Insertion is serialized by a mutex around the cache map; once inserted, a
/// `Tables` reference is valid for the process lifetime and reads of an
/// already-inserted entry only need the lock for the lookup itself.
/// Redundant concurrent builds of the same polynomial's tables are
/// acceptable (the computation is pure and deterministic) and are not
/// specially guarded against.
pub fn get_tables(pol: Polynomial) -> Arc<Tables> {
    let mut cache = CACHE.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(tables) = cache.get(&pol) {
        return Arc::clone(tables);
    }

    log::debug!("building Rabin tables for polynomial {pol}");
    let tables = Arc::new(Tables::build(pol));
    cache.insert(pol, Arc::clone(&tables));
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_POLY: u64 = 0x3DA3358B4DC173;

    #[test]
    fn get_tables_memoizes() {
        let p = Polynomial::new(TEST_POLY);
        let a = get_tables(p);
        let b = get_tables(p);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_polynomials_get_different_tables() {
        let a = get_tables(Polynomial::new(TEST_POLY));
        let b = get_tables(Polynomial::new(0x1B));
        assert_ne!(a.out[1], b.out[1]);
    }

    #[test]
    fn table_construction_is_deterministic() {
        let p = Polynomial::new(0xC96C5795D7870F42);
        let a = Tables::build(p);
        let b = Tables::build(p);
        assert_eq!(a.out, b.out);
        assert_eq!(a.modulus, b.modulus);
    }
}
