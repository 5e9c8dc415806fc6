// (c) 2024 Ross Younger
//! # asterisk-config
//!
//! Reads Asterisk-style configuration files into named sections of attributes.
//!
//! ```text
//! ; comments run to the end of the line
//! [host-cm-mg2]
//! links => 1,2,3
//! links => 5
//! opc => 0x1234
//! cics => 1-31
//! ```
//!
//! * A line `[name]` starts a section. Everything up to the next header belongs to it.
//! * A line `key => value` adds an attribute to the current section. Attribute names are
//!   normalized to `snake_case`. Setting the same attribute twice accumulates the values
//!   into a list, in file order.
//! * Everything else is ignored.
//!
//! Values are stored as text and interpreted when read, with a [`Coercion`]:
//!
//! ```
//! use asterisk_config::{parse, Coercion};
//! let sections = parse("[host-cm-mg2]\nlinks => 1,2,3\nlinks => 5\ncics => 1-31\n");
//! let host = &sections["host-cm-mg2"];
//! assert_eq!(host.get("links", Coercion::Array)?.to_string(), "[1, 2, 3, 5]");
//! assert_eq!(host.get("cics", Coercion::Range)?.to_string(), "1-31");
//! # Ok::<(), asterisk_config::MissingAttribute>(())
//! ```
//!
//! Files may be read from the local filesystem or from a remote host over ssh; see [`Loader`].
//!
//! The `astconf` command-line utility wraps all of this. Its own settings may be kept in
//! a configuration file; see [`config`].

pub mod category;
pub use category::{Category, MissingAttribute, Section};

mod cli;
pub use cli::cli;

pub mod config;

pub mod fetch;
pub use fetch::{fetch_raw_config, FetchOptions, Loader};

pub mod parser;
pub use parser::{parse, parse_as, parse_with, Sections};

/// Utilities
pub mod util;

pub mod value;
pub use value::{Coerced, Coercion, Shaped, Value};
