//! Stored attribute values and their on-demand coercions
// (c) 2024 Ross Younger

use std::fmt::Display;

use serde::Serialize;

use crate::util::IntRange;

/// A value which is either a single item or an ordered list of items.
///
/// Attribute slots are `Shaped<String>`: a key written once holds `One`, a key written
/// repeatedly holds `Many` with every value in the order it was written.
/// Coercions which preserve shape return `Shaped` of the coerced type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Shaped<T> {
    /// A scalar
    One(T),
    /// An ordered list
    Many(Vec<T>),
}

/// The raw contents of an attribute slot
pub type Value = Shaped<String>;

impl<T> Shaped<T> {
    /// Is this a list (as opposed to a scalar)?
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Shaped::Many(_))
    }

    /// Number of items held
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// True only for an empty list. (A scalar is never empty.)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Views the contents as a slice, whatever the shape
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Shaped::One(item) => std::slice::from_ref(item),
            Shaped::Many(items) => items,
        }
    }

    /// Applies `f` to each item, keeping the shape
    pub fn map<U, F>(&self, mut f: F) -> Shaped<U>
    where
        F: FnMut(&T) -> U,
    {
        match self {
            Shaped::One(item) => Shaped::One(f(item)),
            Shaped::Many(items) => Shaped::Many(items.iter().map(f).collect()),
        }
    }

    /// Adds another item. A scalar is promoted to a two-item list; a list is appended to.
    pub(crate) fn push(&mut self, item: T) {
        let previous = std::mem::replace(self, Shaped::Many(Vec::new()));
        *self = match previous {
            Shaped::One(first) => Shaped::Many(vec![first, item]),
            Shaped::Many(mut items) => {
                items.push(item);
                Shaped::Many(items)
            }
        };
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Shaped::One(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Shaped::One(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Shaped::Many(value)
    }
}

fn fmt_list<T, F>(f: &mut std::fmt::Formatter<'_>, items: &[T], mut each: F) -> std::fmt::Result
where
    F: FnMut(&mut std::fmt::Formatter<'_>, &T) -> std::fmt::Result,
{
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        each(f, item)?;
    }
    f.write_str("]")
}

impl<T: Display> Display for Shaped<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shaped::One(item) => item.fmt(f),
            Shaped::Many(items) => fmt_list(f, items, |f, item| item.fmt(f)),
        }
    }
}

// COERCIONS /////////////////////////////////////////////////////////////////////////////////

/// How to reinterpret a stored value when reading it
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
    clap::ValueEnum,
    Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Coercion {
    /// The stored value, as-is
    #[default]
    None,
    /// Leading-integer conversion, per item
    Int,
    /// Comma-separated list. Lists are flattened into one.
    Array,
    /// `N` or `N-M` inclusive range, per item; unparseable items become `None`
    Range,
}

/// The result of reading an attribute with a [`Coercion`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Coerced {
    /// [`Coercion::None`]
    Raw(Value),
    /// [`Coercion::Int`]
    Int(Shaped<i64>),
    /// [`Coercion::Array`]
    Array(Vec<String>),
    /// [`Coercion::Range`]
    Range(Shaped<Option<IntRange>>),
}

impl Coercion {
    /// Reinterprets a stored value
    #[must_use]
    pub fn apply(self, value: &Value) -> Coerced {
        match self {
            Coercion::None => Coerced::Raw(value.clone()),
            Coercion::Int => Coerced::Int(value.map(|s| lenient_int(s))),
            Coercion::Array => Coerced::Array(
                value
                    .as_slice()
                    .iter()
                    .flat_map(|s| split_list(s))
                    .collect(),
            ),
            Coercion::Range => Coerced::Range(value.map(|s| s.parse().ok())),
        }
    }
}

impl Display for Coerced {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn fmt_range(f: &mut std::fmt::Formatter<'_>, r: Option<&IntRange>) -> std::fmt::Result {
            match r {
                Some(r) => r.fmt(f),
                None => f.write_str("<invalid>"),
            }
        }
        match self {
            Coerced::Raw(v) => v.fmt(f),
            Coerced::Int(v) => v.fmt(f),
            Coerced::Array(v) => fmt_list(f, v, |f, s| f.write_str(s)),
            Coerced::Range(Shaped::One(r)) => fmt_range(f, r.as_ref()),
            Coerced::Range(Shaped::Many(rs)) => fmt_list(f, rs, |f, r| fmt_range(f, r.as_ref())),
        }
    }
}

/// Leading-integer conversion.
///
/// Skips leading whitespace, accepts one sign character, then reads as many decimal digits as
/// are present (single underscores between digits are separators). Anything else ends the
/// number; if there were no digits the result is 0. Saturates at the limits of `i64`.
#[must_use]
pub fn lenient_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = digits.as_bytes();
    let mut result: i64 = 0;
    let mut after_digit = false;
    for (i, &b) in digits.iter().enumerate() {
        match b {
            b'0'..=b'9' => {
                let d = i64::from(b - b'0');
                result = result.saturating_mul(10);
                result = if negative {
                    result.saturating_sub(d)
                } else {
                    result.saturating_add(d)
                };
                after_digit = true;
            }
            b'_' if after_digit && digits.get(i + 1).is_some_and(u8::is_ascii_digit) => {
                after_digit = false;
            }
            _ => break,
        }
    }
    result
}

/// Splits a comma-separated list.
///
/// Fields are not trimmed. Trailing empty fields are dropped, so an empty string is an empty list.
#[must_use]
pub fn split_list(s: &str) -> Vec<String> {
    let mut fields: Vec<String> = s.split(',').map(String::from).collect();
    while fields.last().is_some_and(String::is_empty) {
        let _ = fields.pop();
    }
    fields
}
