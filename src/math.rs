//! Widened integer arithmetic shared by the pricing engines.
//!
//! Every pricing formula in the crate is a product followed by a truncating
//! division. Amounts on the wire are `u64`, so all products are computed in
//! `u128` — overflow of an intermediate is structurally impossible, and the
//! only failure modes left are a zero divisor and a quotient that does not
//! fit back into `u64`.
//!
//! Floor rounding is load-bearing throughout: it guarantees a pool never
//! over-pays, at the cost of favouring the pool by at most one unit per
//! trade.

use crate::error::{ExchangeError, Result};

/// Computes `floor(a * b / d)` with the product widened to `u128`.
///
/// # Errors
///
/// - [`ExchangeError::DivisionByZero`] if `d == 0`.
/// - [`ExchangeError::Overflow`] if the floored quotient exceeds `u64::MAX`.
pub fn mul_div(a: u64, b: u64, d: u128) -> Result<u64> {
    if d == 0 {
        return Err(ExchangeError::DivisionByZero);
    }
    let q = u128::from(a) * u128::from(b) / d;
    u64::try_from(q).map_err(|_| ExchangeError::Overflow("mul_div quotient exceeds u64"))
}

/// Integer square root via Newton's method, floor result.
///
/// Converges for all `u128` inputs; `isqrt(0) == 0`.
#[must_use]
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = x.div_ceil(2);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    // -- mul_div --------------------------------------------------------------

    #[test]
    fn mul_div_exact() {
        let Ok(q) = mul_div(6, 7, 2) else {
            panic!("expected Ok");
        };
        assert_eq!(q, 21);
    }

    #[test]
    fn mul_div_floors() {
        // 10 * 10 / 3 = 33.33… → 33
        let Ok(q) = mul_div(10, 10, 3) else {
            panic!("expected Ok");
        };
        assert_eq!(q, 33);
    }

    #[test]
    fn mul_div_widens_past_u64() {
        // u64::MAX * 2 overflows u64 but not u128; dividing by 2 recovers it.
        let Ok(q) = mul_div(u64::MAX, 2, 2) else {
            panic!("expected Ok");
        };
        assert_eq!(q, u64::MAX);
    }

    #[test]
    fn mul_div_zero_divisor() {
        assert_eq!(mul_div(1, 1, 0), Err(ExchangeError::DivisionByZero));
    }

    #[test]
    fn mul_div_quotient_too_large() {
        let result = mul_div(u64::MAX, u64::MAX, 1);
        assert!(matches!(result, Err(ExchangeError::Overflow(_))));
    }

    #[test]
    fn mul_div_zero_numerator() {
        let Ok(q) = mul_div(0, u64::MAX, 7) else {
            panic!("expected Ok");
        };
        assert_eq!(q, 0);
    }

    // -- isqrt ----------------------------------------------------------------

    #[test]
    fn isqrt_zero_and_one() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
    }

    #[test]
    fn isqrt_perfect_squares() {
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(1_000_000), 1_000);
        assert_eq!(isqrt(1_000_000_000_000), 1_000_000);
    }

    #[test]
    fn isqrt_floors_between_squares() {
        assert_eq!(isqrt(2), 1);
        assert_eq!(isqrt(8), 2);
        assert_eq!(isqrt(999_999), 999);
    }

    #[test]
    fn isqrt_large_values() {
        // sqrt(u64::MAX^2) == u64::MAX exactly.
        let max = u128::from(u64::MAX);
        assert_eq!(isqrt(max * max), max);
        // One less than a perfect square floors down.
        assert_eq!(isqrt(max * max - 1), max - 1);
    }

    #[test]
    fn isqrt_result_is_floor() {
        for n in [3u128, 10, 99, 123_456, 987_654_321] {
            let r = isqrt(n);
            assert!(r * r <= n);
            assert!((r + 1) * (r + 1) > n);
        }
    }
}
