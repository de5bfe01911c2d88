//! Integer helpers shared by the chord enumeration and scoring code.

use std::collections::BTreeMap;

/// Returns the greatest common divisor of `a` and `b`.
///
/// # Examples
///
/// ```
/// # use tetrad::math;
/// assert_eq!(math::gcd_u64(12, 18), 6);
/// assert_eq!(math::gcd_u64(7, 5), 1);
/// assert_eq!(math::gcd_u64(0, 9), 9);
/// assert_eq!(math::gcd_u64(9, 0), 9);
/// assert_eq!(math::gcd_u64(0, 0), 0);
/// ```
pub fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}

/// Returns the least common multiple of `a` and `b`.
///
/// A zero input yields 0. This is a sentinel value, not a mathematical lcm,
/// and mirrors the convention used by the virtual-fundamental computation.
///
/// # Examples
///
/// ```
/// # use tetrad::math;
/// assert_eq!(math::lcm_u64(4, 6), 12);
/// assert_eq!(math::lcm_u64(5, 1), 5);
/// assert_eq!(math::lcm_u64(0, 6), 0);
/// assert_eq!(math::lcm_u64(6, 0), 0);
/// ```
pub fn lcm_u64(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd_u64(a, b) * b
}

/// Returns the odd part of `n`, i.e. `n` with all factors of two removed.
///
/// # Examples
///
/// ```
/// # use tetrad::math;
/// assert_eq!(math::odd_part(96), 3);
/// assert_eq!(math::odd_part(15), 15);
/// assert_eq!(math::odd_part(1), 1);
/// assert_eq!(math::odd_part(0), 0);
/// ```
pub fn odd_part(mut n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    while n % 2 == 0 {
        n /= 2;
    }
    n
}

/// Reduces the fraction `numer`/`denom` to lowest terms.
///
/// The caller must guarantee `denom != 0`.
///
/// # Examples
///
/// ```
/// # use tetrad::math;
/// assert_eq!(math::simplify(10, 4), (5, 2));
/// assert_eq!(math::simplify(3, 7), (3, 7));
/// assert_eq!(math::simplify(0, 5), (0, 1));
/// ```
pub fn simplify(numer: u64, denom: u64) -> (u64, u64) {
    let gcd = gcd_u64(numer, denom);
    (numer / gcd, denom / gcd)
}

/// Returns the prime factorization of `n` as a prime → exponent mapping.
///
/// The result satisfies `n = ∏ pᵢ^eᵢ`. `prime_factors(1)` and
/// `prime_factors(0)` return an empty mapping. The map type is a [`BTreeMap`]
/// s.t. iteration order is deterministic.
///
/// # Examples
///
/// ```
/// # use tetrad::math;
/// assert_eq!(
///     math::prime_factors(360).into_iter().collect::<Vec<_>>(),
///     [(2, 3), (3, 2), (5, 1)]
/// );
/// assert!(math::prime_factors(1).is_empty());
/// ```
pub fn prime_factors(mut n: u64) -> BTreeMap<u64, u32> {
    let mut factors = BTreeMap::new();
    let mut divisor = 2;
    while divisor * divisor <= n {
        while n % divisor == 0 {
            *factors.entry(divisor).or_insert(0) += 1;
            n /= divisor;
        }
        divisor += 1;
    }
    if n > 1 {
        *factors.entry(n).or_insert(0) += 1;
    }
    factors
}

/// Reports whether `n` is prime via trial division.
///
/// # Examples
///
/// ```
/// # use tetrad::math;
/// assert!(math::is_prime(2));
/// assert!(math::is_prime(31));
/// assert!(!math::is_prime(1));
/// assert!(!math::is_prime(91)); // 7 * 13
/// ```
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut divisor = 2;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}
