//! Harmonic complexity measures for rational intervals.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::fraction::Fraction;
use crate::math;

/// A measure assigning a harmonic complexity score to a rational interval.
///
/// All measures evaluate the interval in lowest terms, so e.g. 6/4 always
/// scores as 3/2. Lower scores mean simpler intervals. The measures are not
/// on a common scale and must not be compared across variants.
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// # use tetrad::complexity::Complexity;
/// # use tetrad::fraction::Fraction;
/// let fifth = Fraction::new(3, 2);
/// assert_approx_eq!(Complexity::Tenney.rate(fifth), 6.0f64.log2());
/// assert_approx_eq!(Complexity::Benedetti.rate(fifth), 6.0);
/// assert_approx_eq!(Complexity::Tenney.rate(Fraction::new(1, 1)), 0.0);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Complexity {
    /// `log2(p·q)`. The harmonic distance of Tenney's lattice model.
    Tenney,

    /// `log2(max(p, q))`. Weil height of the reduced fraction.
    Weil,

    /// Sum of the prime factors of `p·q` counted with multiplicity.
    Wilson,

    /// Euler's gradus suavitatis: `s − n + 1` where `s` is the sum and `n`
    /// the count of the prime factors of `p·q` with multiplicity.
    Gradus,

    /// The plain product `p·q`.
    Benedetti,

    /// The plain sum `p + q`.
    Arithmetic,
}

impl Complexity {
    /// Scores the given interval.
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use tetrad::complexity::Complexity;
    /// # use tetrad::fraction::Fraction;
    /// let third = Fraction::new(5, 4);
    /// assert_approx_eq!(Complexity::Weil.rate(third), 5.0f64.log2());
    /// assert_approx_eq!(Complexity::Wilson.rate(third), 9.0); // 5 + 2 + 2
    /// assert_approx_eq!(Complexity::Gradus.rate(third), 7.0); // 9 - 3 + 1
    /// assert_approx_eq!(Complexity::Arithmetic.rate(third), 9.0);
    /// ```
    pub fn rate(self, interval: Fraction) -> f64 {
        let numer = interval.numer();
        let denom = interval.denom();
        match self {
            Complexity::Tenney => ((numer * denom) as f64).log2(),
            Complexity::Weil => (numer.max(denom) as f64).log2(),
            Complexity::Wilson => factor_sum(numer * denom) as f64,
            Complexity::Gradus => {
                let factors = math::prime_factors(numer * denom);
                let sum: u64 = factors
                    .iter()
                    .map(|(&prime, &exponent)| prime * u64::from(exponent))
                    .sum();
                let count: u64 = factors.values().map(|&exponent| u64::from(exponent)).sum();
                (sum + 1 - count) as f64
            }
            Complexity::Benedetti => (numer * denom) as f64,
            Complexity::Arithmetic => (numer + denom) as f64,
        }
    }
}

fn factor_sum(n: u64) -> u64 {
    math::prime_factors(n)
        .into_iter()
        .map(|(prime, exponent)| prime * u64::from(exponent))
        .sum()
}

impl Display for Complexity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self {
            Complexity::Tenney => "tenney",
            Complexity::Weil => "weil",
            Complexity::Wilson => "wilson",
            Complexity::Gradus => "gradus",
            Complexity::Benedetti => "benedetti",
            Complexity::Arithmetic => "arithmetic",
        };
        write!(f, "{name}")
    }
}

/// [`Complexity`] measures parse from their lowercase names.
///
/// ```
/// # use tetrad::complexity::Complexity;
/// assert_eq!("tenney".parse::<Complexity>().unwrap(), Complexity::Tenney);
/// assert_eq!("Gradus".parse::<Complexity>().unwrap(), Complexity::Gradus);
/// assert!("euler".parse::<Complexity>().is_err());
/// ```
impl FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tenney" => Ok(Complexity::Tenney),
            "weil" => Ok(Complexity::Weil),
            "wilson" => Ok(Complexity::Wilson),
            "gradus" => Ok(Complexity::Gradus),
            "benedetti" => Ok(Complexity::Benedetti),
            "arithmetic" => Ok(Complexity::Arithmetic),
            _ => Err(format!(
                "Unknown complexity measure '{s}'. \
                 Should be tenney, weil, wilson, gradus, benedetti or arithmetic"
            )),
        }
    }
}
