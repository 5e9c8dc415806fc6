//! Configuration sections and typed attribute access
// (c) 2024 Ross Younger

use std::collections::BTreeMap;

use heck::ToSnakeCase as _;

use crate::util::IntRange;
use crate::value::{lenient_int, split_list, Coerced, Coercion, Shaped, Value};

/// Converts an attribute name as written in a file into its canonical key.
///
/// Must be deterministic, and should be idempotent on its own output.
pub type Normalizer = fn(&str) -> String;

/// The default [`Normalizer`]: `snake_case`.
///
/// `AttrOne`, `attrOne`, `attr-one` and `attr_one` all become `attr_one`.
///
/// Leading and trailing `_` or `-` are kept (as `_`), so `foo`, `foo_` and `_foo` stay distinct.
/// Runs of separators inside a name collapse: `foo__bar` and `foo-_bar` both become `foo_bar`.
#[must_use]
pub fn snake_case(name: &str) -> String {
    let is_separator = |c: char| c == '_' || c == '-';
    let body = name.trim_start_matches(is_separator);
    let leading = name.len() - body.len();
    let body = body.trim_end_matches(is_separator);
    let trailing = name.len() - leading - body.len();

    let mut key = "_".repeat(leading);
    key.push_str(&body.to_snake_case());
    key.push_str(&"_".repeat(trailing));
    key
}

/// An attribute was requested which was never set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no attribute `{key}` in category `{category}`")]
pub struct MissingAttribute {
    /// Category that was searched
    pub category: String,
    /// Key as requested
    pub key: String,
}

/// Anything the parser can build from a section of a file.
///
/// [`Category`] is the general-purpose implementation. Domain-specific types usually wrap
/// a `Category`, delegate these methods to it, and add their own accessors.
pub trait Section {
    /// Creates an empty section
    fn new(name: &str) -> Self
    where
        Self: Sized;

    /// Section name, as it appeared in the header
    fn name(&self) -> &str;

    /// Records one `key => value` line
    fn add_attribute(&mut self, raw_name: &str, value: &str);
}

/// A named section of a configuration file, holding its attributes.
///
/// Values are stored exactly as read. Reading with a [`Coercion`] reinterprets them on the fly
/// and never alters what is stored.
#[derive(Clone)]
pub struct Category {
    name: String,
    attributes: BTreeMap<String, Value>,
    normalizer: Normalizer,
}

impl std::fmt::Debug for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Category")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.attributes == other.attributes
    }
}

impl Eq for Category {}

impl Section for Category {
    fn new(name: &str) -> Self {
        Category::new(name)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn add_attribute(&mut self, raw_name: &str, value: &str) {
        Category::add_attribute(self, raw_name, value);
    }
}

impl Category {
    /// Creates an empty category using the default [`snake_case`] normaliser
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::with_normalizer(name, snake_case)
    }

    /// Creates an empty category which canonicalises keys with the given function
    #[must_use]
    pub fn with_normalizer(name: &str, normalizer: Normalizer) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            normalizer,
        }
    }

    /// Category name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The canonical form of a key
    #[must_use]
    pub fn canonical_key(&self, key: &str) -> String {
        (self.normalizer)(key)
    }

    /// Records a value.
    ///
    /// Repeated keys accumulate: the first write stores a scalar, the second turns it into a
    /// two-item list, later writes append.
    pub fn add_attribute(&mut self, raw_name: &str, value: &str) {
        let key = self.canonical_key(raw_name);
        match self.attributes.get_mut(&key) {
            Some(slot) => slot.push(value.into()),
            None => {
                let _ = self.attributes.insert(key, value.into());
            }
        }
    }

    /// Reads an attribute, reinterpreting it as requested
    pub fn get(&self, key: &str, coercion: Coercion) -> Result<Coerced, MissingAttribute> {
        self.raw(key).map(|v| coercion.apply(v))
    }

    /// Reads an attribute as stored, if it was ever set
    #[must_use]
    pub fn try_get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(&self.canonical_key(key))
    }

    /// Reads an attribute as stored
    pub fn raw(&self, key: &str) -> Result<&Value, MissingAttribute> {
        self.try_get(key).ok_or_else(|| MissingAttribute {
            category: self.name.clone(),
            key: key.into(),
        })
    }

    /// Reads an attribute as integer(s); see [`Coercion::Int`]
    pub fn int(&self, key: &str) -> Result<Shaped<i64>, MissingAttribute> {
        self.raw(key).map(|v| v.map(|s| lenient_int(s)))
    }

    /// Reads an attribute as a flat list; see [`Coercion::Array`]
    pub fn array(&self, key: &str) -> Result<Vec<String>, MissingAttribute> {
        self.raw(key)
            .map(|v| v.as_slice().iter().flat_map(|s| split_list(s)).collect())
    }

    /// Reads an attribute as range(s); see [`Coercion::Range`]
    pub fn range(&self, key: &str) -> Result<Shaped<Option<IntRange>>, MissingAttribute> {
        self.raw(key).map(|v| v.map(|s| s.parse().ok()))
    }

    /// Was this attribute ever set?
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.try_get(key).is_some()
    }

    /// Canonical keys, in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Canonical keys and their stored values, in key order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct attributes
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True if no attributes were set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
