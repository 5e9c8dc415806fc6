// (c) 2024 Ross Younger
//! # Configuration management
//!
//! astconf obtains its own run-time configuration (where to read files from, and how to
//! reach remote hosts) from the following sources, in order:
//! 1. Command-line options
//! 2. The user's configuration file (`~/.astconf.toml`)
//! 3. The system-wide configuration file (`/etc/astconf.toml`)
//! 4. Hard-wired defaults
//!
//! Each option may appear in multiple places, but only the first match is used.
//! `astconf --show-config` outputs each field, its current value, and where it came from.
//!
//! This is quite separate from the Asterisk-style files the crate parses.
//!
//! ### Example
//!
//! ```text
//! # Our media gateways run an old sshd
//! host = "cm-mg0"
//! ssh_user = "asterisk"
//! ssh_kex_algorithm = "diffie-hellman-group1-sha1"
//! ```

mod structure;
pub use structure::{Configuration, ConfigurationOverrides};

mod manager;
pub use manager::Manager;

pub(crate) const BASE_CONFIG_FILENAME: &str = "astconf.toml";
