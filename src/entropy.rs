//! The entropy source abstraction used by [`crate::irreducible::random_irreducible`].
//!
//! Kept separate from [`crate::source`] even though both are "pull some
//! bytes from somewhere" traits: a `Source` can run dry (end-of-stream) and
//! its reads can fail, while an `Entropy` producer is assumed infinite and
//! infallible.

/// An infinite byte producer, typically backed by a cryptographically
/// secure RNG.
pub trait Entropy {
    /// Fills `buf` completely with fresh random bytes.
    fn fill_bytes(&mut self, buf: &mut [u8]);

    /// Draws a single random `u64`, little-endian.
    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }
}

impl<R: rand::RngCore> Entropy for R {
    fn fill_bytes(&mut self, buf: &mut [u8]) {
        rand::RngCore::fill_bytes(self, buf)
    }

    fn next_u64(&mut self) -> u64 {
        rand::RngCore::next_u64(self)
    }
}
