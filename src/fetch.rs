//! Obtaining configuration text from the local or a remote filesystem
// (c) 2024 Ross Younger

use std::process::Stdio;

use anyhow::{Context as _, Result};
use tracing::{debug, warn};

use crate::category::{Category, Section};
use crate::parser::{parse_with, Sections};

/// The host name which means "read the file locally"
pub const LOCALHOST: &str = "localhost";

/// ssh itself exits with this status when it fails (as opposed to the remote command failing)
const SSH_FAILURE_STATUS: i32 = 255;

/// Where to read configuration from, and how to get there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Host to read from; [`LOCALHOST`] reads the local filesystem
    pub host: String,
    /// ssh client program
    pub ssh: String,
    /// Remote user name
    pub ssh_user: Option<String>,
    /// Identity (private key) file to pass to ssh
    pub ssh_identity_file: Option<String>,
    /// Additional key exchange algorithm to enable, for elderly remote systems
    pub ssh_kex_algorithm: Option<String>,
    /// Further arguments passed to ssh verbatim, before the destination
    pub ssh_opt: Vec<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            host: LOCALHOST.into(),
            ssh: "ssh".into(),
            ssh_user: None,
            ssh_identity_file: None,
            ssh_kex_algorithm: None,
            ssh_opt: Vec::new(),
        }
    }
}

impl FetchOptions {
    /// Default options for a given host
    #[must_use]
    pub fn for_host(host: &str) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Does this read the local filesystem?
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.host == LOCALHOST
    }

    /// The ssh destination: `host` or `user@host`
    #[must_use]
    pub fn ssh_destination(&self) -> String {
        match &self.ssh_user {
            Some(user) => format!("{user}@{}", self.host),
            None => self.host.clone(),
        }
    }

    /// The options to pass to ssh, ahead of the destination
    #[must_use]
    pub fn ssh_option_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(identity) = &self.ssh_identity_file {
            args.push("-i".to_string());
            args.push(identity.clone());
        }
        if let Some(alg) = &self.ssh_kex_algorithm {
            args.push(format!("-oKexAlgorithms=+{alg}"));
        }
        args.extend(self.ssh_opt.iter().cloned());
        args
    }
}

/// Quotes a string for a POSIX shell
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// The command the remote shell runs. It outputs nothing, and fails, if the file is not there.
fn remote_command(path: &str) -> String {
    let path = shell_quote(path);
    format!("[ -e {path} ] && cat -- {path}")
}

/// Describes a remote command which ran but produced no file
fn not_fetched_message(path: &str, destination: &str, code: i32, stderr: &str) -> String {
    if stderr.is_empty() {
        format!("{path} not present on {destination} (exit status {code})")
    } else {
        format!("could not read {path} on {destination} (exit status {code}): {stderr}")
    }
}

async fn read_local(path: &str) -> Result<String> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("{path} does not exist");
            Ok(String::new())
        }
        Err(e) => Err(e).with_context(|| format!("reading {path}")),
    }
}

async fn read_remote(path: &str, options: &FetchOptions) -> Result<String> {
    let destination = options.ssh_destination();
    if destination.starts_with('-') {
        anyhow::bail!("invalid ssh destination `{destination}`");
    }
    let mut ssh = tokio::process::Command::new(&options.ssh);
    let _ = ssh
        .kill_on_drop(true)
        .args(options.ssh_option_args())
        .arg("--")
        .arg(&destination)
        .arg(remote_command(path))
        .stdin(Stdio::null());
    debug!("fetching {path} from {destination}: {ssh:?}");

    let output = ssh
        .output()
        .await
        .with_context(|| format!("could not run ssh client `{}`", options.ssh))?;
    match output.status.code() {
        Some(0) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
        Some(SSH_FAILURE_STATUS) | None => anyhow::bail!(
            "ssh to {destination} failed ({status}): {stderr}",
            status = output.status,
            stderr = String::from_utf8_lossy(&output.stderr).trim()
        ),
        Some(code) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                "{}",
                not_fetched_message(path, &destination, code, stderr.trim())
            );
            Ok(String::new())
        }
    }
}

/// Reads the raw text of a configuration file.
///
/// If the file does not exist the result is an empty string, which parses to an empty
/// configuration. Failing to reach a remote host is an error.
pub async fn fetch_raw_config(path: &str, options: &FetchOptions) -> Result<String> {
    if options.is_local() {
        read_local(path).await
    } else {
        read_remote(path, options).await
    }
}

/// Fetches and parses a configuration file
#[derive(Debug, Clone)]
pub struct Loader {
    path: String,
    options: FetchOptions,
}

impl Loader {
    /// Constructor
    #[must_use]
    pub fn new(path: &str, options: FetchOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// File to be read
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fetches the file and parses it into [`Category`] sections
    pub async fn load(&self) -> Result<Sections> {
        self.load_with(Category::new).await
    }

    /// Fetches the file and parses it, building sections with `factory`
    pub async fn load_with<C, F>(&self, factory: F) -> Result<Sections<C>>
    where
        C: Section,
        F: FnMut(&str) -> C,
    {
        let raw = fetch_raw_config(&self.path, &self.options).await?;
        Ok(parse_with(&raw, factory))
    }
}
