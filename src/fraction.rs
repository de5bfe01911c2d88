//! Exact rational intervals between chord voices.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::math;

/// A positive rational number stored in lowest terms.
///
/// [`Fraction`] is the exact counterpart of a floating-point frequency ratio.
/// All limit checks and complexity norms operate on reduced numerators and
/// denominators, so reduction happens once, at construction time.
///
/// # Examples
///
/// ```
/// # use tetrad::fraction::Fraction;
/// let fifth = Fraction::new(6, 4);
/// assert_eq!((fifth.numer(), fifth.denom()), (3, 2));
/// assert_eq!(fifth.to_string(), "3/2");
/// ```
///
/// # Panics
///
/// Panics if the denominator is zero.
///
/// ```should_panic
/// # use tetrad::fraction::Fraction;
/// Fraction::new(1, 0);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Fraction {
    numer: u64,
    denom: u64,
}

impl Fraction {
    pub fn new(numer: u64, denom: u64) -> Self {
        assert!(denom != 0, "Fraction denominator must not be zero");
        let (numer, denom) = math::simplify(numer, denom);
        Self { numer, denom }
    }

    pub fn numer(self) -> u64 {
        self.numer
    }

    pub fn denom(self) -> u64 {
        self.denom
    }

    pub fn as_float(self) -> f64 {
        self.numer as f64 / self.denom as f64
    }

    /// Returns the logarithmic size of the interval in cents.
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use tetrad::fraction::Fraction;
    /// assert_approx_eq!(Fraction::new(2, 1).as_cents(), 1200.0);
    /// assert_approx_eq!(Fraction::new(3, 2).as_cents(), 701.955, 0.001);
    /// assert_approx_eq!(Fraction::new(1, 1).as_cents(), 0.0);
    /// ```
    pub fn as_cents(self) -> f64 {
        1200.0 * self.as_float().log2()
    }

    /// Returns the odd limit of the interval, i.e. the larger odd part of
    /// numerator and denominator.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tetrad::fraction::Fraction;
    /// assert_eq!(Fraction::new(5, 4).odd_limit(), 5);
    /// assert_eq!(Fraction::new(16, 9).odd_limit(), 9);
    /// assert_eq!(Fraction::new(2, 1).odd_limit(), 1);
    /// ```
    pub fn odd_limit(self) -> u64 {
        math::odd_part(self.numer).max(math::odd_part(self.denom))
    }

    /// Returns the integer limit of the interval, i.e. the larger of the
    /// reduced numerator and denominator.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tetrad::fraction::Fraction;
    /// assert_eq!(Fraction::new(5, 4).integer_limit(), 5);
    /// assert_eq!(Fraction::new(4, 3).integer_limit(), 4);
    /// ```
    pub fn integer_limit(self) -> u64 {
        self.numer.max(self.denom)
    }
}

/// [`Fraction`]s are rendered as `numer/denom` in lowest terms.
///
/// ```
/// # use tetrad::fraction::Fraction;
/// assert_eq!(Fraction::new(10, 8).to_string(), "5/4");
/// assert_eq!(Fraction::new(3, 1).to_string(), "3/1");
/// ```
impl Display for Fraction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.numer, self.denom)
    }
}

/// [`Fraction`]s can be parsed from `p/q` or plain integer expressions.
///
/// ```
/// # use tetrad::fraction::Fraction;
/// assert_eq!("3/2".parse::<Fraction>().unwrap(), Fraction::new(3, 2));
/// assert_eq!("5".parse::<Fraction>().unwrap(), Fraction::new(5, 1));
/// assert!("3/0".parse::<Fraction>().is_err());
/// assert!("x/2".parse::<Fraction>().is_err());
/// ```
impl FromStr for Fraction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (numer, denom) = match s.split_once('/') {
            Some((numer, denom)) => (numer, denom),
            None => (s, "1"),
        };
        let numer = numer
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("Invalid numerator '{numer}': Must be a positive integer"))?;
        let denom = denom
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("Invalid denominator '{denom}': Must be a positive integer"))?;
        if denom == 0 {
            return Err(format!("Invalid fraction '{s}': Denominator must not be zero"));
        }
        Ok(Fraction::new(numer, denom))
    }
}
