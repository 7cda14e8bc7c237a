//! Arithmetic over GF(2)\[X\], with each polynomial packed into a `u64` where
//! bit `i` is the coefficient of `x^i`.
//!
//! This mirrors the restic-derived `Polynom64`/`PolynomExtend` split found in
//! production Rust backup tools, collapsed into a single value type since a
//! `u64` newtype is cheap to copy and the operations on it are pure.

use std::fmt;

use crate::error::{Error, Result};

/// A polynomial over GF(2), packed into a 64-bit word.
///
/// Arithmetic is immutable: every operation returns a new `Polynomial`
/// rather than mutating `self`. Addition in GF(2)\[X\] is bitwise XOR, so
/// `Polynomial` derives `PartialEq`/`Eq`/`Hash` directly off its `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Polynomial(pub u64);

impl Polynomial {
    /// The zero polynomial.
    pub const ZERO: Polynomial = Polynomial(0);

    /// Wraps a raw bit-packed value.
    pub const fn new(value: u64) -> Self {
        Polynomial(value)
    }

    /// Returns the raw bit-packed value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Degree of the polynomial: the index of the highest set bit, or `-1`
    /// for the zero polynomial. Runs in O(1) via `leading_zeros`, which
    /// trivially satisfies the O(log n) budget a naive bit-scan would need.
    pub fn deg(self) -> i32 {
        if self.0 == 0 {
            -1
        } else {
            63 - self.0.leading_zeros() as i32
        }
    }

    /// GF(2)\[X\] addition: bitwise XOR. Associative, commutative, its own
    /// inverse (`x + x = 0`), with `ZERO` as identity.
    pub fn add(self, other: Polynomial) -> Polynomial {
        Polynomial(self.0 ^ other.0)
    }

    /// Carryless multiplication. Fails with [`Error::Overflow`] when the
    /// mathematical product would not fit in 64 bits.
    ///
    /// Overflow is detected with Pike's trick: recompute `(x*y)/y` and
    /// compare against `x`, rather than reaching for a 128-bit intermediate.
    pub fn mul(self, other: Polynomial) -> Result<Polynomial> {
        if self.0 == 0 || other.0 == 0 {
            return Ok(Polynomial::ZERO);
        }

        let mut acc: u64 = 0;
        let x = self.0;
        let y = other.0;
        for i in 0..64 {
            if y & (1 << i) != 0 {
                acc ^= x.wrapping_shl(i);
            }
        }
        let product = Polynomial(acc);

        let (q, _) = product.divmod(other);
        if q != self {
            return Err(Error::Overflow);
        }
        Ok(product)
    }

    /// Division with remainder: `(q, r)` such that `self = d*q + r` and
    /// `deg(r) < deg(d)`, via repeated XOR-subtraction of `d << diff`.
    ///
    /// # Panics
    ///
    /// Panics if `d` is the zero polynomial, dividing by zero is a
    /// programmer error, not a recoverable condition.
    pub fn divmod(self, d: Polynomial) -> (Polynomial, Polynomial) {
        assert!(d.0 != 0, "division by the zero polynomial");

        if self.0 == 0 {
            return (Polynomial::ZERO, Polynomial::ZERO);
        }

        let dn = d.deg();
        let mut r = self.0;
        let mut q: u64 = 0;
        loop {
            let rn = Polynomial(r).deg();
            if rn < dn {
                break;
            }
            let shift = rn - dn;
            r ^= d.0 << shift;
            q |= 1u64 << shift;
        }
        (Polynomial(q), Polynomial(r))
    }

    /// Quotient of `self / d`. See [`Polynomial::divmod`].
    pub fn div(self, d: Polynomial) -> Polynomial {
        self.divmod(d).0
    }

    /// Remainder of `self mod d`. See [`Polynomial::divmod`].
    pub fn modulo(self, d: Polynomial) -> Polynomial {
        self.divmod(d).1
    }

    /// Greatest common divisor via the Euclidean algorithm using
    /// [`Polynomial::modulo`]. `gcd(x, 0) = x`, `gcd(0, x) = x`.
    pub fn gcd(self, other: Polynomial) -> Polynomial {
        let (mut a, mut b) = (self, other);
        while b.0 != 0 {
            let r = a.modulo(b);
            a = b;
            b = r;
        }
        a
    }

    /// `(self * other) mod g`, via repeated square-and-add under the
    /// modulus so the intermediate product never has a chance to overflow.
    pub fn mul_mod(self, other: Polynomial, g: Polynomial) -> Polynomial {
        if self.0 == 0 || other.0 == 0 {
            return Polynomial::ZERO;
        }

        let mut res = Polynomial::ZERO;
        let mut a = self;
        let mut b = other.0;

        if b & 1 != 0 {
            res = res.add(a).modulo(g);
        }
        b >>= 1;
        while b != 0 {
            a = Polynomial(a.0 << 1).modulo(g);
            if b & 1 != 0 {
                res = res.add(a).modulo(g);
            }
            b >>= 1;
        }
        res
    }

    /// `(x^(2^p) - x) mod g`, i.e. `(x^(2^p) + x) mod g` in characteristic 2.
    /// Starts from the polynomial value of `x` (i.e. `2`) and squares modulo
    /// `g` a total of `p` times, then adds `x`. Used solely by the
    /// irreducibility test.
    pub fn qp(p: u32, g: Polynomial) -> Polynomial {
        let mut res = Polynomial::new(2);
        for _ in 0..p {
            res = res.mul_mod(res, g);
        }
        res.add(Polynomial::new(2)).modulo(g)
    }

    /// Renders as `"0x"` followed by lowercase hex, no leading zero-pad.
    pub fn to_hex(self) -> String {
        format!("0x{:x}", self.0)
    }

    /// Renders as `"x^53+x^52+...+x+1"`, emitting `x` for bit 1, `1` for bit
    /// 0, no leading `+`, and `"0"` for the zero polynomial.
    pub fn expand(self) -> String {
        if self.0 == 0 {
            return "0".to_string();
        }

        let mut terms = Vec::new();
        for i in (0..64).rev() {
            if self.0 & (1 << i) == 0 {
                continue;
            }
            match i {
                0 => terms.push("1".to_string()),
                1 => terms.push("x".to_string()),
                n => terms.push(format!("x^{n}")),
            }
        }
        terms.join("+")
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
