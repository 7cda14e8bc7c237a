//! A 64-byte sliding-window Rabin fingerprint.
//!
//! Unlike a fixed-window, instance-owned table design, this window size is a
//! module constant and its tables are shared across instances via
//! [`crate::tables::get_tables`].

use std::sync::Arc;

use crate::polynomial::Polynomial;
use crate::tables::{Tables, WINDOW_SIZE};

/// Rolling Rabin fingerprint state over a fixed-size sliding window.
pub struct RollingHash {
    window: [u8; WINDOW_SIZE],
    wpos: usize,
    digest: Polynomial,
    pol_shift: i32,
    tables: Arc<Tables>,
}

impl RollingHash {
    /// Initializes a rolling hash for modulus polynomial `pol`, fetching
    /// (and if necessary building) its tables from the process-wide cache.
    pub fn new(pol: Polynomial) -> RollingHash {
        let tables = crate::tables::get_tables(pol);
        RollingHash {
            window: [0; WINDOW_SIZE],
            wpos: 0,
            digest: Polynomial::ZERO,
            pol_shift: pol.deg() - 8,
            tables,
        }
    }

    /// Re-initializes this hash in place, reusing the given (already cached)
    /// tables instead of looking them up again.
    pub fn reset_with_tables(&mut self, pol_shift: i32, tables: Arc<Tables>) {
        self.window = [0; WINDOW_SIZE];
        self.wpos = 0;
        self.digest = Polynomial::ZERO;
        self.pol_shift = pol_shift;
        self.tables = tables;
    }

    /// The current 64-bit Rabin fingerprint.
    pub fn digest(&self) -> Polynomial {
        self.digest
    }

    /// Shares this hash's already-resolved tables, so a caller (the
    /// chunker) can hand them to the next `RollingHash` on reset without
    /// hitting the cache lock again.
    pub fn tables(&self) -> Arc<Tables> {
        Arc::clone(&self.tables)
    }

    /// The cached `deg(pol) - 8` shift used to index the modular-reduction
    /// table.
    pub fn pol_shift(&self) -> i32 {
        self.pol_shift
    }

    /// Slides one byte `b` into the window, canceling the departing byte's
    /// contribution and reducing modulo the polynomial in a single XOR.
    #[inline]
    pub fn slide(&mut self, b: u8) {
        let out_byte = self.window[self.wpos];
        self.window[self.wpos] = b;
        self.digest = self.digest.add(self.tables.out[out_byte as usize]);
        self.wpos = (self.wpos + 1) & (WINDOW_SIZE - 1);

        let index = ((self.digest.value() >> self.pol_shift) & 0xff) as usize;
        let shifted = Polynomial::new((self.digest.value() << 8) | b as u64);
        self.digest = shifted.add(self.tables.modulus[index]);
    }
}
