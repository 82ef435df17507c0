//! # Exact Rational Arithmetic
//!
//! Arbitrary-precision fractions, the backbone of universe determinism.
//!
//! ## Why not `f64`?
//!
//! Floating-point noise diverges subtly across CPUs and engines. Two clients
//! disagreeing about one coordinate's biome is a consensus failure in a shared
//! world, so every intermediate value stays an exact fraction and floats only
//! appear at the final display conversion.
//!
//! ## Determinism Guarantee
//!
//! No operation in this module touches native floating point except
//! [`Rational::to_f64`], which must never feed back into a comparison or a
//! branch.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

/// An exact rational number: big-integer numerator over positive big-integer
/// denominator, always gcd-reduced.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    /// Numerator; carries the sign.
    num: BigInt,
    /// Denominator; strictly positive.
    den: BigInt,
}

impl Rational {
    /// Creates a rational from numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero. A zero denominator is a programmer error, not
    /// a recoverable condition.
    #[must_use]
    pub fn new(num: BigInt, den: BigInt) -> Self {
        assert!(!den.is_zero(), "rational denominator must be non-zero");
        let mut r = Self { num, den };
        r.reduce();
        r
    }

    /// Creates a rational from a machine integer.
    #[must_use]
    pub fn from_integer(v: i64) -> Self {
        Self {
            num: BigInt::from(v),
            den: BigInt::from(1),
        }
    }

    /// Creates a rational from a big integer.
    #[must_use]
    pub fn from_bigint(v: BigInt) -> Self {
        Self {
            num: v,
            den: BigInt::from(1),
        }
    }

    /// The rational zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    /// The rational one.
    #[must_use]
    pub fn one() -> Self {
        Self::from_integer(1)
    }

    /// Returns the (reduced) numerator.
    #[must_use]
    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    /// Returns the (reduced, positive) denominator.
    #[must_use]
    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    /// Normalizes sign into the numerator and divides out the gcd.
    fn reduce(&mut self) {
        if self.den.is_negative() {
            self.num = -std::mem::take(&mut self.num);
            self.den = -std::mem::take(&mut self.den);
        }
        if self.num.is_zero() {
            self.den = BigInt::from(1);
            return;
        }
        let g = self.num.gcd(&self.den);
        self.num /= &g;
        self.den /= &g;
    }

    /// Returns `true` iff the value is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.num.is_negative()
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            num: self.num.abs(),
            den: self.den.clone(),
        }
    }

    /// Largest integer less than or equal to the value.
    #[must_use]
    pub fn floor(&self) -> BigInt {
        self.num.div_floor(&self.den)
    }

    /// Remainder after division by `modulus`, always in `[0, modulus)` for a
    /// positive modulus.
    ///
    /// Native `%` follows the dividend's sign; grid snapping at negative
    /// coordinates needs the non-negative variant.
    ///
    /// # Panics
    ///
    /// Panics if `modulus` is not strictly positive.
    #[must_use]
    pub fn real_mod(&self, modulus: &Self) -> Self {
        assert!(
            !modulus.is_negative() && !modulus.num.is_zero(),
            "real_mod modulus must be strictly positive"
        );
        let quotient = Self::from_bigint((self / modulus).floor());
        self - &(modulus * &quotient)
    }

    /// Converts to `f64`. This is the ONLY place core values become floats;
    /// the result is for display and must never re-enter exact computation.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        if let (Some(n), Some(d)) = (self.num.to_f64(), self.den.to_f64()) {
            if n.is_finite() && d.is_finite() {
                return n / d;
            }
        }
        // Magnitudes beyond f64: split into integer part and proper fraction.
        let quotient = self.floor();
        let remainder = &self.num - &quotient * &self.den;
        let frac = remainder.to_f64().unwrap_or(0.0) / self.den.to_f64().unwrap_or(f64::MAX);
        quotient.to_f64().unwrap_or(0.0) + frac
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross-multiplication preserves order.
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl Add for &Rational {
    type Output = Rational;

    fn add(self, rhs: &Rational) -> Rational {
        Rational::new(
            &self.num * &rhs.den + &rhs.num * &self.den,
            &self.den * &rhs.den,
        )
    }
}

impl Sub for &Rational {
    type Output = Rational;

    fn sub(self, rhs: &Rational) -> Rational {
        Rational::new(
            &self.num * &rhs.den - &rhs.num * &self.den,
            &self.den * &rhs.den,
        )
    }
}

impl Mul for &Rational {
    type Output = Rational;

    fn mul(self, rhs: &Rational) -> Rational {
        Rational::new(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

impl Div for &Rational {
    type Output = Rational;

    fn div(self, rhs: &Rational) -> Rational {
        assert!(!rhs.num.is_zero(), "rational division by zero");
        Rational::new(&self.num * &rhs.den, &self.den * &rhs.num)
    }
}

macro_rules! forward_owned_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                (&self).$method(&rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);
forward_owned_binop!(Div, div);

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        -&self
    }
}
