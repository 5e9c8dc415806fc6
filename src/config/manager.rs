//! Configuration file wrangling
// (c) 2024 Ross Younger

use super::{Configuration, ConfigurationOverrides, BASE_CONFIG_FILENAME};

use figment::{
    providers::{Format, Serialized, Toml},
    value::{Dict, Map},
    Figment, Metadata, Profile, Provider,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};
use tabled::{settings::style::Style, Table, Tabled};

use tracing::{trace, warn};

/// Source label for the hard-wired defaults
const DEFAULTS: &str = "default";
/// Source label for command-line options
const COMMAND_LINE: &str = "command line";

// PATHS /////////////////////////////////////////////////////////////////////////////////////////////////////

fn user_config_path() -> Option<PathBuf> {
    // ~/.<filename> for now
    let mut d = dirs::home_dir()?;
    d.push(format!(".{BASE_CONFIG_FILENAME}"));
    Some(d)
}

fn system_config_path() -> PathBuf {
    // /etc/<filename> for now
    let mut p: PathBuf = PathBuf::new();
    p.push("/etc");
    p.push(BASE_CONFIG_FILENAME);
    p
}

// PROVIDERS ////////////////////////////////////////////////////////////////////////////////////////////////

/// Serialized data with a human-friendly name for `--show-config`
struct Labelled<T> {
    label: &'static str,
    data: Serialized<T>,
}

impl<T: Serialize> Labelled<T> {
    fn new(label: &'static str, value: T) -> Self {
        Self {
            label,
            data: Serialized::defaults(value),
        }
    }
}

impl<T: Serialize> Provider for Labelled<T> {
    fn metadata(&self) -> Metadata {
        Metadata::named(self.label)
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        self.data.data()
    }
}

// CONFIG MANAGER /////////////////////////////////////////////////////////////////////////////////////////////

/// Processes and merges all possible configuration sources.
///
/// Later sources override earlier ones: hard-wired defaults, the system file, the user file,
/// then whatever the caller merges in (typically the command line).
#[derive(Debug, Default)]
pub struct Manager {
    /// Configuration data
    data: Figment,
}

fn add_user_config(f: Figment) -> Figment {
    let Some(path) = user_config_path() else {
        warn!("could not determine user configuration file path");
        return f;
    };
    if !path.exists() {
        trace!("user configuration file {path:?} not present");
        return f;
    }
    f.merge(Toml::file(path.as_path()))
}

fn add_system_config(f: Figment) -> Figment {
    let path = system_config_path();
    if !path.exists() {
        trace!("system configuration file {path:?} not present");
        return f;
    }
    f.merge(Toml::file(path.as_path()))
}

impl Manager {
    /// Initialises this structure, reading the set of config files appropriate to the platform
    /// and the current user.
    #[must_use]
    pub fn new() -> Self {
        let mut data = Figment::new().merge(Labelled::new(DEFAULTS, Configuration::default()));
        data = add_system_config(data);

        // N.B. This may leave data in a fused-error state, if a data file isn't parseable.
        data = add_user_config(data);
        Self { data }
    }

    /// Returns the list of configuration files we read.
    ///
    /// This is a function of platform and the current user id.
    #[must_use]
    pub fn config_files() -> Vec<String> {
        let inputs = vec![Some(system_config_path()), user_config_path()];

        inputs
            .into_iter()
            .flatten()
            .map(|p| p.into_os_string().to_string_lossy().into())
            .collect()
    }

    /// Testing/internal constructor, does not read files from system
    #[must_use]
    pub fn without_files() -> Self {
        let data = Figment::new().merge(Labelled::new(DEFAULTS, Configuration::default()));
        Self { data }
    }

    /// Merges in a data set, which is some sort of [figment::Provider](https://docs.rs/figment/latest/figment/trait.Provider.html).
    ///
    /// For the command line, use [`merge_overrides`](Self::merge_overrides).
    pub fn merge_provider<T>(&mut self, provider: T)
    where
        T: Provider,
    {
        let f = std::mem::take(&mut self.data);
        self.data = f.merge(provider); // in the error case, this leaves the provider in a fused state
    }

    /// Merges in options given on the command line
    pub fn merge_overrides(&mut self, overrides: &ConfigurationOverrides) {
        self.merge_provider(Labelled::new(COMMAND_LINE, overrides.clone()));
    }

    /// Merges in a data set from a TOML file
    pub fn merge_toml_file<T>(&mut self, toml: T)
    where
        T: AsRef<Path>,
    {
        let path = toml.as_ref();
        let provider = Toml::file_exact(path);
        self.merge_provider(provider);
    }

    /// Attempts to extract a particular struct from the data.
    ///
    /// `T` is usually [Configuration], but it isn't intrinsically required to be.
    pub fn get<'de, T>(&self) -> anyhow::Result<T, figment::Error>
    where
        T: Deserialize<'de>,
    {
        self.data.extract::<T>()
    }
}

// PRETTY PRINT SUPPORT ///////////////////////////////////////////////////////////////////////////////////////

#[derive(Tabled)]
struct Row {
    field: &'static str,
    value: String,
    source: String,
}

impl Manager {
    /// Where the active value of a field came from
    fn source_of(&self, field: &str) -> String {
        let Some(meta) = self.data.find_metadata(field) else {
            return String::new();
        };
        meta.source
            .as_ref()
            .map_or_else(|| meta.name.to_string(), ToString::to_string)
    }
}

impl Display for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config = match self.get::<Configuration>() {
            Ok(c) => c,
            Err(e) => return write!(f, "error: {e}"),
        };
        let rows = config.fields().into_iter().map(|(field, value)| Row {
            field,
            value,
            source: self.source_of(field),
        });
        write!(f, "{}", Table::new(rows).with(Style::sharp()))
    }
}

#[cfg(test)]
mod test {
    use crate::config::{Configuration, ConfigurationOverrides, Manager};
    use crate::util::make_test_tempfile;
    use assertables::assert_contains;
    use figment::providers::Serialized;

    #[test]
    fn defaults() {
        let mgr = Manager::without_files();
        let result = mgr.get::<Configuration>().unwrap();
        let expected = Configuration::default();
        assert_eq!(expected, result);
    }

    #[test]
    fn config_merge() {
        // simulate a CLI
        let entered = ConfigurationOverrides {
            host: Some("cm-mg0".into()),
            ..Default::default()
        };
        let expected = Configuration {
            host: "cm-mg0".into(),
            ..Default::default()
        };

        let mut mgr = Manager::without_files();
        mgr.merge_provider(Serialized::defaults(entered));
        let result = mgr.get::<Configuration>().unwrap();
        assert_eq!(expected, result);
    }

    #[test]
    fn file_then_cli() {
        let (path, _tempdir) = make_test_tempfile(
            r#"
            host = "cm-mg0"
            ssh_user = "asterisk"
            ssh_kex_algorithm = "diffie-hellman-group1-sha1"
            ssh_opt = ["-p", "2222"]
        "#,
            "test.toml",
        );
        let fake_cli = ConfigurationOverrides {
            ssh_user: Some("somedude".into()),
            ..Default::default()
        };
        let mut mgr = Manager::without_files();
        mgr.merge_toml_file(path);
        mgr.merge_provider(Serialized::defaults(fake_cli));
        let result = mgr.get::<Configuration>().unwrap();
        assert_eq!(result.host, "cm-mg0");
        assert_eq!(result.ssh_user, "somedude");
        assert_eq!(result.ssh_kex_algorithm, "diffie-hellman-group1-sha1");
        assert_eq!(result.ssh_opt, vec!["-p", "2222"]);
        assert_eq!(result.ssh, "ssh");

        let table = mgr.to_string();
        assert_contains!(table, "somedude");
        assert_contains!(table, "test.toml");
    }

    #[test]
    fn table_names_each_source() {
        let (path, _tempdir) = make_test_tempfile(r#"ssh_user = "asterisk""#, "test.toml");
        let mut mgr = Manager::without_files();
        mgr.merge_toml_file(path);
        mgr.merge_overrides(&ConfigurationOverrides {
            host: Some("cm-mg0".into()),
            ssh_opt: vec!["-p".into(), "2222".into()],
            ..Default::default()
        });
        let table = mgr.to_string();
        let row = |field: &str| {
            table
                .lines()
                .find(|l| l.contains(&format!(" {field} ")))
                .unwrap_or_default()
                .to_string()
        };
        assert_contains!(row("host"), "cm-mg0");
        assert_contains!(row("host"), "command line");
        assert_contains!(row("ssh_opt"), "-p 2222");
        assert_contains!(row("ssh_user"), "asterisk");
        assert_contains!(row("ssh_user"), "test.toml");
        assert_contains!(row("ssh"), "default");
        assert_contains!(row("ssh_kex_algorithm"), "default");
    }

    #[test]
    fn table_reports_bad_data() {
        let (path, _tempdir) = make_test_tempfile("ssh_opt = true", "test.toml");
        let mut mgr = Manager::without_files();
        mgr.merge_toml_file(path);
        assert_contains!(mgr.to_string(), "error:");
    }

    #[test]
    fn unparseable_toml() {
        let (path, _tempdir) = make_test_tempfile(
            r"
            host = 1
            ssh 123 # this line is a syntax error
        ",
            "test.toml",
        );
        let mut mgr = Manager::without_files();
        mgr.merge_toml_file(path);
        let get = mgr.get::<Configuration>();
        assert!(get.is_err());
    }

    #[test]
    fn type_error() {
        let (path, _tempdir) = make_test_tempfile(
            r"
            ssh_opt = true # invalid
        ",
            "test.toml",
        );
        let mut mgr = Manager::without_files();
        mgr.merge_toml_file(path);
        let _ = mgr.get::<Configuration>().unwrap_err();
    }

    #[test]
    fn config_files_named() {
        let files = Manager::config_files();
        assert_eq!(files.first().map(String::as_str), Some("/etc/astconf.toml"));
    }
}
