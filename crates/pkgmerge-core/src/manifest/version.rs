//! API Version
//!
//! Fixed-point decimal so `"59.10"` and `"59.1"` compare equal and no
//! binary floating-point rounding leaks into the merged version.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::SkipReason;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiVersion {
    whole: u64,
    /// Fractional digits, trailing zeros stripped
    fraction: String,
}

impl ApiVersion {
    /// `fraction` must be ASCII digits only; `FromStr` is the public way in
    pub(crate) fn new(whole: u64, fraction: &str) -> Self {
        debug_assert!(fraction.bytes().all(|b| b.is_ascii_digit()));
        Self {
            whole,
            fraction: fraction.trim_end_matches('0').to_string(),
        }
    }

    /// Render with exactly one fractional digit, rounding half to even.
    pub fn to_one_decimal(&self) -> String {
        let tenths = self.fraction.bytes().next().map_or(0, |b| b - b'0');
        let rest = &self.fraction[self.fraction.len().min(1)..];

        let round_up = match rest.as_bytes().first() {
            None => false,
            Some(&b) if b > b'5' => true,
            Some(&b) if b < b'5' => false,
            // Leading '5': any further digit is nonzero since trailing zeros are stripped
            Some(_) if rest.len() > 1 => true,
            Some(_) => tenths % 2 == 1,
        };

        let (mut whole, mut tenths) = (self.whole, tenths);
        if round_up {
            tenths += 1;
            if tenths == 10 {
                tenths = 0;
                whole = whole.saturating_add(1);
            }
        }
        format!("{}.{}", whole, tenths)
    }
}

impl FromStr for ApiVersion {
    type Err = SkipReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SkipReason::UnparseableVersion(s.to_string());
        let trimmed = s.trim();

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole = if whole.is_empty() {
            0
        } else {
            whole.parse::<u64>().map_err(|_| invalid())?
        };

        Ok(Self::new(whole, fraction))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Fractions have no trailing zeros, so digit-string order is numeric order
        self.whole
            .cmp(&other.whole)
            .then_with(|| self.fraction.cmp(&other.fraction))
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fraction.is_empty() {
            write!(f, "{}.0", self.whole)
        } else {
            write!(f, "{}.{}", self.whole, self.fraction)
        }
    }
}
