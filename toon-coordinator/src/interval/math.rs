/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Pure arithmetic helpers for the common poll interval.
//!
//! Free functions so they can be tested without building a [`TickPlan`].
//!
//! [`TickPlan`]: super::TickPlan

/// Iterative Euclidean GCD.  `gcd(0, n) == n`, `gcd(0, 0) == 0`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Reduce a slice of periods to their overall GCD.
///
/// Returns `0` for an empty slice.  The result does not depend on the order of
/// the periods.
pub fn gcd_of_slice(periods: &[u64]) -> u64 {
    periods.iter().fold(0, |acc, &p| gcd(acc, p))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── gcd ───────────────────────────────────────────────────────────────────

    #[test]
    fn gcd_basic_cases() {
        assert_eq!(gcd(12, 8), 4);
        assert_eq!(gcd(7, 3), 1);
        assert_eq!(gcd(100, 25), 25);
    }

    #[test]
    fn gcd_with_zero() {
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(gcd(5, 0), 5);
        assert_eq!(gcd(0, 0), 0);
    }

    #[test]
    fn gcd_coprime_scan_intervals() {
        // 7 s and 10 s share nothing: the timer has to fire every second
        assert_eq!(gcd(7, 10), 1);
    }

    // ── gcd_of_slice ──────────────────────────────────────────────────────────

    #[test]
    fn gcd_of_slice_empty_returns_zero() {
        assert_eq!(gcd_of_slice(&[]), 0);
    }

    #[test]
    fn gcd_of_slice_single_element_is_itself() {
        assert_eq!(gcd_of_slice(&[42]), 42);
    }

    #[test]
    fn gcd_of_slice_typical_scan_intervals() {
        // boiler 60 s, P1 meter 10 s, thermostat 10 s
        assert_eq!(gcd_of_slice(&[60, 10, 10]), 10);
        // program 300 s, thermostat 45 s
        assert_eq!(gcd_of_slice(&[300, 45]), 15);
    }

    #[test]
    fn gcd_of_slice_is_order_independent() {
        let a = gcd_of_slice(&[60, 45, 90, 30]);
        let b = gcd_of_slice(&[30, 90, 45, 60]);
        assert_eq!(a, 15);
        assert_eq!(a, b);
    }
}
