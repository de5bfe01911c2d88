//! Interval complexity ceilings and the candidate numbers they admit.

use std::collections::VecDeque;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::fraction::Fraction;
use crate::math;

/// A ceiling constraining which intervals are allowed in a chord.
///
/// The three limit families constrain an interval's reduced numerator and
/// denominator via their odd part, their full value or their prime
/// factorization. The enum is closed on purpose: a limit mode is selected
/// once at the configuration boundary and matched exhaustively afterwards.
///
/// # Examples
///
/// ```
/// # use tetrad::fraction::Fraction;
/// # use tetrad::limit::Limit;
/// let five_odd_limit = Limit::odd(5);
/// assert!(five_odd_limit.allows(Fraction::new(5, 4)));
/// assert!(five_odd_limit.allows(Fraction::new(8, 5)));
/// assert!(!five_odd_limit.allows(Fraction::new(7, 4)));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Limit {
    /// The odd part of numerator and denominator must not exceed the given value.
    Odd(u32),

    /// Numerator and denominator (in lowest terms) must not exceed the given value.
    Integer(u32),

    /// Numerator and denominator must factor over the given primes with bounded exponents.
    Prime(PrimeLimit),
}

impl Limit {
    pub fn odd(limit: u32) -> Self {
        Limit::Odd(limit)
    }

    pub fn integer(limit: u32) -> Self {
        Limit::Integer(limit)
    }

    pub fn prime(primes: Vec<u32>, max_exponent: u32) -> Self {
        Limit::Prime(PrimeLimit {
            primes,
            max_exponent,
        })
    }

    /// Reports whether the given interval satisfies the limit.
    ///
    /// The check is exact at the boundary: an interval whose limit value
    /// equals the ceiling is accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tetrad::fraction::Fraction;
    /// # use tetrad::limit::Limit;
    /// assert!(Limit::integer(9).allows(Fraction::new(9, 8)));
    /// assert!(!Limit::integer(9).allows(Fraction::new(10, 9)));
    ///
    /// let seven_limit = Limit::prime(vec![2, 3, 5, 7], 3);
    /// assert!(seven_limit.allows(Fraction::new(7, 5)));
    /// assert!(seven_limit.allows(Fraction::new(8, 7))); // 2^3 hits the exponent cap
    /// assert!(!seven_limit.allows(Fraction::new(16, 7))); // 2^4 exceeds it
    /// assert!(!seven_limit.allows(Fraction::new(11, 8)));
    /// ```
    pub fn allows(&self, interval: Fraction) -> bool {
        match self {
            Limit::Odd(limit) => interval.odd_limit() <= u64::from(*limit),
            Limit::Integer(limit) => interval.integer_limit() <= u64::from(*limit),
            Limit::Prime(prime_limit) => {
                prime_limit.admits(interval.numer()) && prime_limit.admits(interval.denom())
            }
        }
    }

    /// Generates the sorted set of integers eligible to appear as chord members.
    ///
    /// The result always contains 1, even for degenerate limits that admit no
    /// numbers at all. The upper bounds are generous heuristics, not tight
    /// closures:
    ///
    /// - odd mode scans `1..=max(N·⌈equave⌉·2, 200)` s.t. the enumerator can
    ///   fill the full equave range even after octave-reduction mismatches,
    /// - integer mode is exactly `1..=N`,
    /// - prime mode grows a breadth-first closure from 1 that stops at the
    ///   product ceiling `⌈equave⌉·max(primes)·max_exponent·2`. Numbers only
    ///   reachable via longer multiplication paths are excluded.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tetrad::limit::Limit;
    /// assert_eq!(Limit::integer(5).candidate_numbers(2.0), [1, 2, 3, 4, 5]);
    /// assert_eq!(Limit::odd(0).candidate_numbers(2.0), [1]);
    ///
    /// let candidates = Limit::odd(3).candidate_numbers(2.0);
    /// assert!(candidates.contains(&1));
    /// assert!(candidates.contains(&96)); // odd part 3
    /// assert!(!candidates.contains(&5));
    ///
    /// let candidates = Limit::prime(vec![2, 3], 2).candidate_numbers(2.0);
    /// assert_eq!(candidates, [1, 2, 3, 4, 6, 9, 12, 18]);
    /// ```
    pub fn candidate_numbers(&self, equave_ratio: f64) -> Vec<u32> {
        let equave = equave_ratio.ceil().max(1.0) as u64;
        let candidates = match self {
            Limit::Odd(limit) => {
                // Capping at u32::MAX keeps the cast below lossless.
                let bound = u64::from(*limit)
                    .saturating_mul(equave)
                    .saturating_mul(2)
                    .max(200)
                    .min(u64::from(u32::MAX));
                (1..=bound)
                    .filter(|&num| math::odd_part(num) <= u64::from(*limit))
                    .map(|num| num as u32)
                    .collect()
            }
            Limit::Integer(limit) => (1..=*limit).collect(),
            Limit::Prime(prime_limit) => prime_limit.candidate_numbers(equave),
        };
        if candidates.is_empty() {
            return vec![1];
        }
        candidates
    }
}

impl Display for Limit {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Limit::Odd(limit) => write!(f, "{limit}-odd-limit"),
            Limit::Integer(limit) => write!(f, "{limit}-integer-limit"),
            Limit::Prime(prime_limit) => {
                let primes = prime_limit
                    .primes
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(".");
                write!(f, "{{{primes}}}-prime-limit^{}", prime_limit.max_exponent)
            }
        }
    }
}

/// The parameters of the prime limit family.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrimeLimit {
    primes: Vec<u32>,
    max_exponent: u32,
}

impl PrimeLimit {
    /// Parses a prime limit from the two UI-level inputs.
    ///
    /// The `spec` is either a plain number (all primes up to and including
    /// that number are allowed, e.g. `"7"`) or a dot-separated list of
    /// explicit primes (e.g. `"3.5.7"`).
    ///
    /// # Examples
    ///
    /// ```
    /// # use tetrad::limit::PrimeLimit;
    /// assert_eq!(PrimeLimit::from_spec("7", 3).unwrap().primes(), [2, 3, 5, 7]);
    /// assert_eq!(PrimeLimit::from_spec("3.5.7", 3).unwrap().primes(), [3, 5, 7]);
    /// assert!(PrimeLimit::from_spec("3.x", 3).is_err());
    /// assert!(PrimeLimit::from_spec("1", 3).is_err());
    /// ```
    pub fn from_spec(spec: &str, max_exponent: u32) -> Result<Self, LimitParseError> {
        let primes = if spec.contains('.') {
            spec.split('.')
                .map(|part| {
                    part.trim()
                        .parse::<u32>()
                        .map_err(|_| LimitParseError::InvalidNumber(part.to_owned()))
                })
                .collect::<Result<Vec<_>, _>>()?
        } else {
            let ceiling = spec
                .trim()
                .parse::<u32>()
                .map_err(|_| LimitParseError::InvalidNumber(spec.to_owned()))?;
            (2..=ceiling)
                .filter(|&num| math::is_prime(u64::from(num)))
                .collect()
        };

        if primes.is_empty() {
            return Err(LimitParseError::EmptyPrimeList);
        }
        if let Some(&not_a_prime) = primes.iter().find(|&&num| !math::is_prime(u64::from(num))) {
            return Err(LimitParseError::NotAPrime(not_a_prime));
        }

        Ok(PrimeLimit {
            primes,
            max_exponent,
        })
    }

    pub fn primes(&self) -> &[u32] {
        &self.primes
    }

    pub fn max_exponent(&self) -> u32 {
        self.max_exponent
    }

    /// Reports whether `num` factors over the allowed primes with every
    /// exponent at most `max_exponent`. 1 is always admitted.
    fn admits(&self, num: u64) -> bool {
        math::prime_factors(num).into_iter().all(|(prime, exponent)| {
            exponent <= self.max_exponent
                && self.primes.iter().any(|&allowed| u64::from(allowed) == prime)
        })
    }

    fn candidate_numbers(&self, equave: u64) -> Vec<u32> {
        let max_prime = match self.primes.iter().max() {
            Some(&max_prime) => u64::from(max_prime),
            None => return vec![1],
        };
        // Capping at u32::MAX keeps the cast below lossless.
        let bound = equave
            .saturating_mul(max_prime)
            .saturating_mul(u64::from(self.max_exponent))
            .saturating_mul(2)
            .min(u64::from(u32::MAX));

        let mut valid_numbers = vec![1u64];
        let mut queue = VecDeque::from([1u64]);
        while let Some(current) = queue.pop_front() {
            for &prime in &self.primes {
                let next = current * u64::from(prime);
                if next > bound {
                    continue;
                }
                if self.admits(next) && !valid_numbers.contains(&next) {
                    valid_numbers.push(next);
                    queue.push_back(next);
                }
            }
        }

        let mut valid_numbers = valid_numbers
            .into_iter()
            .map(|num| num as u32)
            .collect::<Vec<_>>();
        valid_numbers.sort_unstable();
        valid_numbers
    }
}

/// Error reported when a prime-limit specification cannot be parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LimitParseError {
    /// A list entry or the prime ceiling was not a positive integer.
    InvalidNumber(String),

    /// The specification did not yield any primes, e.g. `"1"`.
    EmptyPrimeList,

    /// An explicitly listed number is not prime.
    NotAPrime(u32),
}

impl Display for LimitParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LimitParseError::InvalidNumber(num) => {
                write!(f, "Invalid number '{num}': Must be a positive integer")
            }
            LimitParseError::EmptyPrimeList => write!(f, "No primes in limit specification"),
            LimitParseError::NotAPrime(num) => write!(f, "{num} is not a prime number"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn odd_candidates_contain_all_powers_of_two_in_range() {
        let candidates = Limit::odd(9).candidate_numbers(2.0);
        for power in [1u32, 2, 4, 8, 16, 32, 64, 128] {
            assert!(candidates.contains(&power), "missing {power}");
        }
        assert!(!candidates.contains(&11));
        assert!(candidates.contains(&144)); // odd part 9
    }

    #[test]
    fn odd_candidate_bound_is_at_least_200() {
        let candidates = Limit::odd(3).candidate_numbers(2.0);
        assert_eq!(*candidates.last().unwrap(), 192); // largest n <= 200 with odd part <= 3
    }

    #[test]
    fn prime_closure_respects_exponent_cap() {
        let candidates = Limit::prime(vec![2, 3, 5], 1).candidate_numbers(2.0);
        assert!(candidates.contains(&6));
        assert!(candidates.contains(&15));
        assert!(!candidates.contains(&4));
        assert!(!candidates.contains(&9));
    }

    #[test]
    fn candidate_sets_are_sorted_and_start_at_one() {
        for limit in [
            Limit::odd(5),
            Limit::integer(12),
            Limit::prime(vec![2, 3, 7], 2),
        ] {
            let candidates = limit.candidate_numbers(2.0);
            assert_eq!(candidates[0], 1);
            assert!(candidates.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn degenerate_limits_still_yield_the_unison_member() {
        for limit in [Limit::odd(0), Limit::integer(0), Limit::prime(vec![], 3)] {
            assert_eq!(limit.candidate_numbers(2.0), [1], "for {limit}");
        }
    }

    #[test]
    fn huge_prime_exponents_do_not_wrap_the_candidate_bound() {
        let candidates = Limit::prime(vec![2, 3], u32::MAX).candidate_numbers(2.0);
        assert!(!candidates.contains(&0));
        assert_eq!(candidates[0], 1);
        assert!(candidates.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn boundary_intervals_are_exact() {
        assert!(Limit::odd(5).allows(Fraction::new(5, 4)));
        assert!(!Limit::odd(5).allows(Fraction::new(7, 4)));
        assert!(Limit::odd(5).allows(Fraction::new(5, 3)));
        assert!(!Limit::odd(5).allows(Fraction::new(9, 5)));
        assert!(Limit::integer(5).allows(Fraction::new(5, 4)));
        assert!(!Limit::integer(5).allows(Fraction::new(6, 5)));
    }
}
