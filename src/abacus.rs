//! The counter behind every command.

use std::fmt;

/// A running integer total.
///
/// Amounts are `i64` and the total is `i128`, so no reachable sequence of
/// operations overflows it (that takes more than 2^64 maximal steps).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Abacus {
    total: i128,
}

impl Abacus {
    /// Create an abacus starting at `start`.
    pub fn new(start: i128) -> Self {
        Self { total: start }
    }

    /// Current total.
    pub fn total(&self) -> i128 {
        self.total
    }

    /// Add `value` to the total.
    pub fn add(&mut self, value: i64) {
        self.total += i128::from(value);
    }

    /// Subtract `value` from the total.
    pub fn subtract(&mut self, value: i64) {
        self.total -= i128::from(value);
    }

    /// Canonical textual form, `Abacus(<total>)`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Abacus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Abacus({})", self.total)
    }
}

impl fmt::Debug for Abacus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
