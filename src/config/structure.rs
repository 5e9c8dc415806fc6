//! Configuration structure
// (c) 2024 Ross Younger

use serde::{Deserialize, Serialize};

use crate::fetch::{FetchOptions, LOCALHOST};

/// The set of configurable options supported by astconf.
///
/// **Note:** The implementation of `default()` for this struct returns the hard-wired defaults.
///
/// String fields which are optional in practice (user, identity file, key exchange algorithm)
/// are unset when empty.
// Maintainer note: None of the members of this struct should be Option<anything>; the command
// line uses [`ConfigurationOverrides`] for that, so that unset options fall through to files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Configuration {
    /// Host to read configuration from. `localhost` reads the local filesystem.
    pub host: String,
    /// The ssh client program to use
    pub ssh: String,
    /// Remote user name. Empty means the ssh default.
    pub ssh_user: String,
    /// Identity file for ssh. Empty means the ssh default.
    pub ssh_identity_file: String,
    /// Key exchange algorithm to enable in addition to the ssh defaults. Empty means none.
    pub ssh_kex_algorithm: String,
    /// Additional arguments to pass to the ssh client.
    ///
    /// **In a configuration file** this field is an array of strings,
    /// for example `ssh_opt = ["-p", "2222"]`
    pub ssh_opt: Vec<String>,
}

impl Default for Configuration {
    /// **(Unusual!)**
    /// Returns the hard-wired configuration defaults.
    fn default() -> Self {
        Self {
            host: LOCALHOST.into(),
            ssh: "ssh".into(),
            ssh_user: String::new(),
            ssh_identity_file: String::new(),
            ssh_kex_algorithm: String::new(),
            ssh_opt: Vec::new(),
        }
    }
}

impl Configuration {
    /// Each field name with its value rendered for display
    pub(crate) fn fields(&self) -> [(&'static str, String); 6] {
        [
            ("host", self.host.clone()),
            ("ssh", self.ssh.clone()),
            ("ssh_user", self.ssh_user.clone()),
            ("ssh_identity_file", self.ssh_identity_file.clone()),
            ("ssh_kex_algorithm", self.ssh_kex_algorithm.clone()),
            ("ssh_opt", self.ssh_opt.join(" ")),
        ]
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

impl From<&Configuration> for FetchOptions {
    fn from(value: &Configuration) -> Self {
        Self {
            host: value.host.clone(),
            ssh: value.ssh.clone(),
            ssh_user: non_empty(&value.ssh_user),
            ssh_identity_file: non_empty(&value.ssh_identity_file),
            ssh_kex_algorithm: non_empty(&value.ssh_kex_algorithm),
            ssh_opt: value.ssh_opt.clone(),
        }
    }
}

/// Command-line overrides for [`Configuration`].
///
/// Only the options the user actually gave are serialized, so merging this over the
/// configuration files leaves everything else alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, clap::Args)]
pub struct ConfigurationOverrides {
    /// Reads the file from this host over ssh [default: localhost]
    #[arg(short = 'H', long, help_heading("Connection"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Specifies the ssh client program to use [default: ssh]
    #[arg(long, help_heading("Connection"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh: Option<String>,

    /// Remote user name
    #[arg(short = 'u', long, help_heading("Connection"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_user: Option<String>,

    /// Identity file for ssh
    #[arg(short = 'i', long = "identity-file", value_name("FILE"), help_heading("Connection"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_identity_file: Option<String>,

    /// Enables an additional ssh key exchange algorithm (for older remote systems)
    #[arg(long = "kex-algorithm", value_name("ALG"), help_heading("Connection"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_kex_algorithm: Option<String>,

    /// Provides an additional option or argument to pass to the ssh client.
    ///
    /// Note that you must repeat `-S` for each.
    /// For example, to pass `-p 2222` to ssh, specify: `-S -p -S 2222`
    #[arg(
        short = 'S',
        action,
        value_name("ssh-option"),
        allow_hyphen_values(true),
        help_heading("Connection")
    )]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ssh_opt: Vec<String>,
}
