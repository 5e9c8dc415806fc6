// astconf command-line arguments
// (c) 2024 Ross Younger

use clap::Parser;

use crate::{config::ConfigurationOverrides, value::Coercion};

/// Options that switch us into another mode i.e. which don't require a FILE argument
pub(crate) const MODE_OPTIONS: &[&str] = &["show_config", "config_files"];

#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version(env!("ASTCONF_VERSION_STRING")),
    about,
    before_help = "e.g.   astconf -H cm-mg0 /etc/asterisk/ss7.conf host-cm-mg2 links --as array",
    infer_long_args(true)
)]
#[command(help_template(
    "\
{name} version {version}
{about-with-newline}
{usage-heading} {usage}
{before-help}
{all-args}{after-help}
"
))]
#[command(styles=super::styles::CLAP_STYLES)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CliArgs {
    // MODE SELECTION ======================================================================
    /// Outputs the configuration, then exits.
    ///
    /// Shows every field, its active value, and where the value came from.
    #[arg(long, help_heading("Configuration"), display_order(0))]
    pub show_config: bool,

    /// Outputs the paths to configuration file(s), then exits
    #[arg(long, help_heading("Configuration"), display_order(0))]
    pub config_files: bool,

    // OUTPUT ==============================================================================
    /// How to interpret the value of KEY
    #[arg(short = 'a', long = "as", value_enum, default_value_t = Coercion::None, value_name("TYPE"))]
    pub coercion: Coercion,

    /// Quiet mode: reports only errors
    #[arg(short, long, action, conflicts_with("debug"))]
    pub quiet: bool,

    // DEBUG ===============================================================================
    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=asterisk_config=debug` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, help_heading("Debug"))]
    pub debug: bool,

    /// Log to a file
    ///
    /// By default the log receives everything printed to stderr.
    /// To override this behaviour, set the environment variable `RUST_LOG_FILE_DETAIL` (same semantics as `RUST_LOG`).
    #[arg(short('l'), long, action, help_heading("Debug"), value_name("FILE"))]
    pub log_file: Option<String>,

    // CONNECTION ==========================================================================
    #[command(flatten)]
    pub config: ConfigurationOverrides,

    // POSITIONAL ARGUMENTS ================================================================
    /// The configuration file to read, e.g. `/etc/asterisk/ss7.conf`
    #[arg(conflicts_with_all(MODE_OPTIONS), required = true, value_name = "FILE")]
    pub file: Option<String>,

    /// A section to show. If omitted, lists the section names.
    #[arg(value_name = "SECTION")]
    pub section: Option<String>,

    /// An attribute within SECTION to show. If omitted, shows every attribute.
    #[arg(requires("section"), value_name = "KEY")]
    pub key: Option<String>,
}

impl CliArgs {
    pub(crate) fn trace_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod test {
    use super::CliArgs;
    use crate::value::Coercion;
    use clap::{CommandFactory as _, Parser as _};

    #[test]
    fn definition_is_sane() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn full_invocation() {
        let args = CliArgs::try_parse_from([
            "astconf",
            "-H",
            "cm-mg0",
            "--kex-algorithm",
            "diffie-hellman-group1-sha1",
            "-S",
            "-p",
            "-S",
            "2222",
            "/etc/asterisk/ss7.conf",
            "host-cm-mg2",
            "links",
            "--as",
            "array",
        ])
        .unwrap();
        assert_eq!(args.config.host.as_deref(), Some("cm-mg0"));
        assert_eq!(
            args.config.ssh_kex_algorithm.as_deref(),
            Some("diffie-hellman-group1-sha1")
        );
        assert_eq!(args.config.ssh_opt, vec!["-p", "2222"]);
        assert_eq!(args.file.as_deref(), Some("/etc/asterisk/ss7.conf"));
        assert_eq!(args.section.as_deref(), Some("host-cm-mg2"));
        assert_eq!(args.key.as_deref(), Some("links"));
        assert_eq!(args.coercion, Coercion::Array);
    }

    #[test]
    fn file_required_unless_mode() {
        let _ = CliArgs::try_parse_from(["astconf"]).unwrap_err();
        let args = CliArgs::try_parse_from(["astconf", "--show-config"]).unwrap();
        assert!(args.show_config);
        assert!(args.file.is_none());
    }

    #[test]
    fn unknown_coercion_rejected() {
        let _ = CliArgs::try_parse_from(["astconf", "f.conf", "s", "k", "--as", "float"])
            .unwrap_err();
    }
}
