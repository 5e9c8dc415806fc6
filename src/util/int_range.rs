// Numeric range values - IntRange
// (c) 2024 Ross Younger
use serde::{de, Serialize};
use std::{fmt::Display, ops::RangeInclusive, str::FromStr};

/// An inclusive range of non-negative integers, as written in a configuration value.
///
/// A range may be specified as a single integer or as a pair joined by a hyphen. For example:
/// ```text
/// cics => 25        ; a single value, equivalent to 25-25
/// cics => 25-48     ; a range
/// ```
///
/// The endpoints are not checked for ordering; `48-25` parses, and is empty when iterated.
///
/// Each endpoint must fit in a `u64`. Text such as `99999999999999999999-1` has the right shape
/// but does not parse.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct IntRange {
    /// First number in the range
    pub begin: u64,
    /// Last number in the range, inclusive.
    pub end: u64,
}

/// The text did not match `<start>` or `<start>-<end>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid range `{input}` (expected `N` or `N-M`)")]
pub struct RangeParseError {
    /// The offending text
    pub input: String,
}

impl IntRange {
    /// Creates a range covering `begin` to `end` inclusive.
    #[must_use]
    pub fn new(begin: u64, end: u64) -> Self {
        Self { begin, end }
    }

    /// Does this range cover the given number?
    #[must_use]
    pub fn contains(&self, n: u64) -> bool {
        self.begin <= n && n <= self.end
    }

    /// True if `end` is before `begin`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end < self.begin
    }

    /// Every number in the range
    #[must_use]
    pub fn numbers(&self) -> RangeInclusive<u64> {
        self.begin..=self.end
    }
}

impl Display for IntRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.begin == self.end {
            f.write_fmt(format_args!("{}", self.begin))
        } else {
            f.write_fmt(format_args!("{}-{}", self.begin, self.end))
        }
    }
}

impl From<IntRange> for String {
    fn from(value: IntRange) -> Self {
        value.to_string()
    }
}

impl From<IntRange> for RangeInclusive<u64> {
    fn from(value: IntRange) -> Self {
        value.numbers()
    }
}

/// Strict unsigned decimal: digits only, no sign, no whitespace
fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for IntRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.split_once('-') {
            None => parse_digits(s).map(|n| Self::new(n, n)),
            Some((a, b)) => parse_digits(a).zip(parse_digits(b)).map(|(a, b)| Self::new(a, b)),
        };
        parsed.ok_or_else(|| RangeParseError { input: s.into() })
    }
}

impl<'de> serde::Deserialize<'de> for IntRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_test::{assert_tokens, Token};

    type Uut = super::IntRange;

    #[test]
    fn output_single() {
        let uut = Uut::new(123, 123);
        assert_eq!(format!("{uut}"), "123");
    }
    #[test]
    fn output_range() {
        let uut = Uut::new(123, 456);
        assert_eq!(format!("{uut}"), "123-456");
    }
    #[test]
    fn parse_single() {
        let uut = Uut::from_str("5").unwrap();
        assert_eq!(uut.begin, 5);
        assert_eq!(uut.end, 5);
    }
    #[test]
    fn parse_range() {
        let uut = Uut::from_str("25-48").unwrap();
        assert_eq!(uut.begin, 25);
        assert_eq!(uut.end, 48);
        assert_eq!(std::ops::RangeInclusive::from(uut), 25..=48);
        assert!(uut.contains(25));
        assert!(uut.contains(48));
        assert!(!uut.contains(49));
    }
    #[test]
    fn endpoints_at_the_limit() {
        let uut = Uut::from_str("0-18446744073709551615").unwrap();
        assert_eq!(uut.end, u64::MAX);
    }
    #[test]
    fn backwards_range_is_empty_not_invalid() {
        let uut = Uut::from_str("48-25").unwrap();
        assert!(uut.is_empty());
        assert_eq!(uut.numbers().count(), 0);
    }
    #[test]
    fn invalid_inputs() {
        for input in [
            "", "bogus", "-500", "+5", "1-", "-", "1-2-3", " 1", "1 - 2", "0x10", "1,2",
            "99999999999999999999",
            "99999999999999999999-1",
            "1-18446744073709551616",
        ] {
            let err = Uut::from_str(input).expect_err(input);
            assert_eq!(err.input, input);
        }
    }
    #[test]
    fn serde_as_string() {
        assert_tokens(&Uut::new(1, 24), &[Token::Str("1-24")]);
        assert_tokens(&Uut::new(7, 7), &[Token::Str("7")]);
    }
}
