//! Canonical rational multiples of π, used as gate angles.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::rational::Rational;

/// A phase `rπ` with `r` an exact [`Rational`] kept in the canonical range
/// `(-1, 1]`.
///
/// Addition and subtraction are performed modulo `2π` (folding back into the
/// canonical range); multiplication and division accept any integer or
/// [`Rational`] scalar. Multiplying or dividing two phases is deliberately
/// unsupported: it would change the physical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Phase {
    rational: Rational,
}

impl Phase {
    pub const ZERO: Phase = Phase {
        rational: Rational::ZERO,
    };

    /// `π` itself, i.e. `Phase::new(1, 1)`.
    pub fn pi() -> Self {
        Phase::new(1, 1)
    }

    /// Construct `n/d * π`, normalized into `(-1, 1]`.
    pub fn new(n: i64, d: i64) -> Self {
        let mut p = Phase {
            rational: Rational::new(n, d),
        };
        p.normalize();
        p
    }

    /// Construct from an integer multiple of π: `n * π`.
    pub fn from_int(n: i64) -> Self {
        Phase::new(n, 1)
    }

    /// Approximate `f` radians to within `eps` radians.
    pub fn from_radians(f: f64, eps: f64) -> Self {
        let mut p = Phase {
            rational: Rational::from_f64(f / std::f64::consts::PI, eps / std::f64::consts::PI),
        };
        p.normalize();
        p
    }

    /// Approximate `f` radians to the default tolerance.
    pub fn from_radians_default(f: f64) -> Self {
        Phase::from_radians(f, Rational::DEFAULT_EPS)
    }

    pub fn to_radians(&self) -> f64 {
        std::f64::consts::PI * self.rational.to_f64()
    }

    pub fn get_rational(&self) -> Rational {
        self.rational
    }

    pub fn numerator(&self) -> i64 {
        self.rational.numerator()
    }

    pub fn denominator(&self) -> i64 {
        self.rational.denominator()
    }

    /// Whether this phase is a Clifford-compatible angle, i.e. its
    /// denominator divides 2 (multiples of π/2).
    pub fn is_clifford_angle(&self) -> bool {
        self.rational.denominator() <= 2
    }

    pub fn is_zero(&self) -> bool {
        self.rational == Rational::ZERO
    }

    /// Fold `self.rational` back into `(-1, 1]`.
    fn normalize(&mut self) {
        let one = Rational::new(1, 1);
        let neg_one = Rational::new(-1, 1);
        let two = Rational::new(2, 1);
        while self.rational <= neg_one {
            self.rational += two;
        }
        while self.rational > one {
            self.rational -= two;
        }
    }

    pub fn mul_scalar(self, rhs: Rational) -> Phase {
        Phase::new(
            (self.rational * rhs).numerator(),
            (self.rational * rhs).denominator(),
        )
    }

    pub fn div_scalar(self, rhs: Rational) -> Phase {
        Phase::new(
            (self.rational / rhs).numerator(),
            (self.rational / rhs).denominator(),
        )
    }

    pub fn mul_int(self, rhs: i64) -> Phase {
        self.mul_scalar(Rational::from_int(rhs))
    }

    pub fn div_int(self, rhs: i64) -> Phase {
        self.div_scalar(Rational::from_int(rhs))
    }

    /// Human-readable form, e.g. `"3π/4"`, `"π"`, `"-π"`, `"0"`.
    pub fn get_print_string(&self) -> String {
        let n = self.rational.numerator();
        let d = self.rational.denominator();
        match (n, d) {
            (0, _) => "0".to_string(),
            (1, 1) => "π".to_string(),
            (-1, 1) => "-π".to_string(),
            (n, 1) => format!("{n}π"),
            (1, d) => format!("π/{d}"),
            (-1, d) => format!("-π/{d}"),
            (n, d) => format!("{n}π/{d}"),
        }
    }

    /// ASCII form suitable for QASM-style output, e.g. `"3*pi/4"`.
    pub fn get_ascii_string(&self) -> String {
        let n = self.rational.numerator();
        let d = self.rational.denominator();
        match (n, d) {
            (0, _) => "0".to_string(),
            (1, 1) => "pi".to_string(),
            (-1, 1) => "-pi".to_string(),
            (n, 1) => format!("{n}*pi"),
            (1, d) => format!("pi/{d}"),
            (-1, d) => format!("-pi/{d}"),
            (n, d) => format!("{n}*pi/{d}"),
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::ZERO
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_print_string())
    }
}

impl Neg for Phase {
    type Output = Phase;
    fn neg(self) -> Phase {
        Phase::new(-self.rational.numerator(), self.rational.denominator())
    }
}

impl Add for Phase {
    type Output = Phase;
    fn add(self, rhs: Phase) -> Phase {
        let sum = self.rational + rhs.rational;
        Phase::new(sum.numerator(), sum.denominator())
    }
}

impl Sub for Phase {
    type Output = Phase;
    fn sub(self, rhs: Phase) -> Phase {
        self + (-rhs)
    }
}

impl AddAssign for Phase {
    fn add_assign(&mut self, rhs: Phase) {
        *self = *self + rhs;
    }
}

impl SubAssign for Phase {
    fn sub_assign(&mut self, rhs: Phase) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_range() {
        let p = Phase::new(3, 1);
        // 3pi normalizes to 1pi = pi (since (-1,1] range, 3 mod 2 = 1)
        assert_eq!(p, Phase::new(1, 1));
    }

    #[test]
    fn test_addition_is_mod_2pi() {
        let a = Phase::new(3, 4);
        let b = Phase::new(3, 4);
        // 3/4 + 3/4 = 3/2 -> normalize: 3/2 - 2 = -1/2
        assert_eq!(a + b, Phase::new(-1, 2));
    }

    #[test]
    fn test_add_then_negate_recovers_other() {
        let p = Phase::new(1, 3);
        let q = Phase::new(2, 5);
        assert_eq!((p + q) + (-p), q);
    }

    #[test]
    fn test_clifford_angle() {
        assert!(Phase::new(1, 2).is_clifford_angle());
        assert!(Phase::new(1, 1).is_clifford_angle());
        assert!(!Phase::new(1, 4).is_clifford_angle());
    }

    #[test]
    fn test_print_strings() {
        assert_eq!(Phase::ZERO.get_print_string(), "0");
        assert_eq!(Phase::new(1, 1).get_print_string(), "π");
        assert_eq!(Phase::new(-1, 1).get_print_string(), "-π");
        assert_eq!(Phase::new(1, 4).get_print_string(), "π/4");
        assert_eq!(Phase::new(3, 4).get_print_string(), "3π/4");
        assert_eq!(Phase::new(1, 4).get_ascii_string(), "pi/4");
        assert_eq!(Phase::new(3, 4).get_ascii_string(), "3*pi/4");
    }

    #[test]
    fn test_from_radians_roundtrip() {
        let p = Phase::from_radians(std::f64::consts::FRAC_PI_4, 1e-6);
        assert_eq!(p, Phase::new(1, 4));
    }
}
