//! Config file parsing, Asterisk-style
// (c) 2024 Ross Younger
//!
//! The format is line oriented:
//!
//! ```text
//! ; comment line
//! [section-name]
//! key => value
//! key2=>value2, more
//! ```
//!
//! Parsing is lenient: lines which are not understood are skipped, and never cause an error.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::category::{Category, Section};

/// A parsed configuration: section name to section.
///
/// If a section name is repeated, the last section with that name wins.
pub type Sections<C = Category> = BTreeMap<String, C>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A classified line of input
pub(crate) enum Line<'a> {
    Empty,
    Comment,
    Header(&'a str),
    Value { key: &'a str, value: &'a str },
    Unrecognised,
}

/// Whitespace as far as the file format is concerned
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c')
}

/// Characters permitted in section names and keys
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_name_char)
}

/// Removes at most one leading whitespace character
fn skip_one_space(s: &str) -> &str {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_space(c) => chars.as_str(),
        _ => s,
    }
}

pub(crate) fn classify(line: &str) -> Line<'_> {
    let line = line.trim_matches(|c| is_space(c) || c == '\0');
    if line.is_empty() {
        return Line::Empty;
    }
    if line.starts_with(';') {
        return Line::Comment;
    }
    if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
        return if is_name(name) {
            Line::Header(name)
        } else {
            Line::Unrecognised
        };
    }

    // key, at most one space, `=>`, at most one space, then the value is everything else
    let key_len = line.find(|c| !is_name_char(c)).unwrap_or(line.len());
    let (key, rest) = line.split_at(key_len);
    if key.is_empty() {
        return Line::Unrecognised;
    }
    match skip_one_space(rest).strip_prefix("=>") {
        Some(rest) => Line::Value {
            key,
            value: skip_one_space(rest),
        },
        None => Line::Unrecognised,
    }
}

/// Where we are in the file
enum State<C> {
    /// No section has been opened yet
    SeekingHeader,
    /// Attributes go into this section
    InSection(C),
}

fn commit<C: Section>(output: &mut Sections<C>, section: C) {
    let name = section.name().to_string();
    debug!("read section [{name}]");
    if output.insert(name, section).is_some() {
        debug!("section was defined more than once; the later definition wins");
    }
}

/// Parses configuration text, building each section with `factory`.
///
/// `factory` receives the section name and returns an empty section.
/// Empty input yields an empty result.
pub fn parse_with<C, F>(raw: &str, mut factory: F) -> Sections<C>
where
    C: Section,
    F: FnMut(&str) -> C,
{
    let mut output = Sections::<C>::new();
    if raw.is_empty() {
        debug!("no configuration text to parse");
        return output;
    }

    let mut state = State::SeekingHeader;
    for (line_number, line) in (1_usize..).zip(raw.lines()) {
        state = match (state, classify(line)) {
            (state, Line::Empty | Line::Comment) => state,
            (State::SeekingHeader, Line::Header(name)) => State::InSection(factory(name)),
            (State::InSection(previous), Line::Header(name)) => {
                commit(&mut output, previous);
                State::InSection(factory(name))
            }
            (State::InSection(mut current), Line::Value { key, value }) => {
                current.add_attribute(key, value);
                State::InSection(current)
            }
            (state, ignored) => {
                trace!("ignoring line {line_number}: {ignored:?}");
                state
            }
        };
    }
    if let State::InSection(last) = state {
        commit(&mut output, last);
    }
    debug!("parsed {} section(s)", output.len());
    output
}

/// Parses configuration text into sections of type `C`
#[must_use]
pub fn parse_as<C: Section>(raw: &str) -> Sections<C> {
    parse_with(raw, C::new)
}

/// Parses configuration text into [`Category`] sections
#[must_use]
pub fn parse(raw: &str) -> Sections {
    parse_as(raw)
}
