//! Exact rational numbers, always kept in reduced canonical form.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// An always-reduced rational number `numer / denom` with `denom > 0`.
///
/// Unlike a general fraction type, `Rational` never carries nested fractions
/// and collapses to canonical form (`gcd(|numer|, denom) == 1`) after every
/// constructor and arithmetic operation. Floating-point values are converted
/// via a Stern–Brocot mediant search to a caller-supplied tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    numer: i64,
    denom: i64,
}

impl Rational {
    /// The default tolerance used when no epsilon is given.
    pub const DEFAULT_EPS: f64 = 1e-4;

    pub const ZERO: Rational = Rational { numer: 0, denom: 1 };
    pub const ONE: Rational = Rational { numer: 1, denom: 1 };

    /// Construct `n / 1`.
    pub fn from_int(n: i64) -> Self {
        Rational { numer: n, denom: 1 }
    }

    /// Construct `n / d`, reducing to canonical form.
    ///
    /// # Panics
    /// Panics if `d == 0`.
    pub fn new(n: i64, d: i64) -> Self {
        assert!(d != 0, "Rational denominator must be nonzero");
        let mut r = Rational { numer: n, denom: d };
        r.reduce();
        r
    }

    /// Approximate a floating-point value by Stern–Brocot mediant search.
    pub fn from_f64(f: f64, eps: f64) -> Self {
        let integral_part = f.floor();
        let frac = f - integral_part;

        let in_lower = |q: Rational, frac: f64, eps: f64| (frac - eps) <= q.to_f64();
        let in_upper = |q: Rational, frac: f64, eps: f64| (frac + eps) >= q.to_f64();

        let mut lower = Rational::new(0, 1);
        let mut upper = Rational::new(1, 1);

        if in_lower(lower, frac, eps) && in_upper(lower, frac, eps) {
            return lower + Rational::from_int(integral_part as i64);
        }
        if in_lower(upper, frac, eps) && in_upper(upper, frac, eps) {
            return upper + Rational::from_int(integral_part as i64);
        }

        let mut med = Rational::new(1, 2);
        loop {
            if !in_lower(med, frac, eps) {
                lower = med;
            } else if !in_upper(med, frac, eps) {
                upper = med;
            } else {
                return med + Rational::from_int(integral_part as i64);
            }
            med = Self::mediant(lower, upper);
        }
    }

    fn mediant(lhs: Rational, rhs: Rational) -> Rational {
        Rational::new(lhs.numer + rhs.numer, lhs.denom + rhs.denom)
    }

    pub fn numerator(&self) -> i64 {
        self.numer
    }

    pub fn denominator(&self) -> i64 {
        self.denom
    }

    pub fn to_f64(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }

    fn reduce(&mut self) {
        if self.denom < 0 {
            self.numer = -self.numer;
            self.denom = -self.denom;
        }
        if self.numer == 0 {
            self.denom = 1;
            return;
        }
        let g = gcd(self.numer.unsigned_abs(), self.denom.unsigned_abs());
        self.numer /= g as i64;
        self.denom /= g as i64;
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a.max(1)
    } else {
        gcd(b, a % b)
    }
}

impl Default for Rational {
    fn default() -> Self {
        Rational::ZERO
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational {
            numer: -self.numer,
            denom: self.denom,
        }
    }
}

impl Add for Rational {
    type Output = Rational;
    fn add(self, rhs: Rational) -> Rational {
        Rational::new(
            self.numer * rhs.denom + rhs.numer * self.denom,
            self.denom * rhs.denom,
        )
    }
}

impl Sub for Rational {
    type Output = Rational;
    fn sub(self, rhs: Rational) -> Rational {
        self + (-rhs)
    }
}

impl Mul for Rational {
    type Output = Rational;
    fn mul(self, rhs: Rational) -> Rational {
        Rational::new(self.numer * rhs.numer, self.denom * rhs.denom)
    }
}

impl Div for Rational {
    type Output = Rational;
    fn div(self, rhs: Rational) -> Rational {
        assert!(rhs.numer != 0, "division by zero Rational");
        Rational::new(self.numer * rhs.denom, self.denom * rhs.numer)
    }
}

impl AddAssign for Rational {
    fn add_assign(&mut self, rhs: Rational) {
        *self = *self + rhs;
    }
}
impl SubAssign for Rational {
    fn sub_assign(&mut self, rhs: Rational) {
        *self = *self - rhs;
    }
}
impl MulAssign for Rational {
    fn mul_assign(&mut self, rhs: Rational) {
        *self = *self * rhs;
    }
}
impl DivAssign for Rational {
    fn div_assign(&mut self, rhs: Rational) {
        *self = *self / rhs;
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Rational {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.numer * other.denom).cmp(&(other.numer * self.denom))
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Rational::from_int(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_reduction() {
        let r = Rational::new(4, 8);
        assert_eq!(r.numerator(), 1);
        assert_eq!(r.denominator(), 2);
    }

    #[test]
    fn test_negative_denominator_normalized() {
        let r = Rational::new(1, -2);
        assert_eq!(r.numerator(), -1);
        assert_eq!(r.denominator(), 2);
    }

    #[test]
    fn test_zero_always_over_one() {
        let r = Rational::new(0, 5);
        assert_eq!(r.denominator(), 1);
    }

    #[test]
    fn test_arithmetic() {
        let a = Rational::new(1, 2);
        let b = Rational::new(1, 3);
        assert_eq!(a + b, Rational::new(5, 6));
        assert_eq!(a - b, Rational::new(1, 6));
        assert_eq!(a * b, Rational::new(1, 6));
        assert_eq!(a / b, Rational::new(3, 2));
    }

    #[test]
    fn test_from_f64_approximates_simple_fractions() {
        let r = Rational::from_f64(0.25, 1e-6);
        assert_eq!(r, Rational::new(1, 4));

        let r = Rational::from_f64(0.3333333333, 1e-6);
        assert_eq!(r, Rational::new(1, 3));
    }

    #[test]
    fn test_from_f64_negative() {
        let r = Rational::from_f64(-0.5, 1e-6);
        assert_eq!(r, Rational::new(-1, 2));
    }

    #[test]
    fn test_ordering() {
        assert!(Rational::new(1, 3) < Rational::new(1, 2));
        assert!(Rational::new(-1, 2) < Rational::new(0, 1));
    }
}
