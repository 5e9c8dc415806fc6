// Main CLI entrypoint
// (c) 2024 Ross Younger

use std::{io::Write, process::ExitCode};

use super::{args::CliArgs, styles};

use crate::{
    category::Category,
    config::{Configuration, Manager},
    fetch::{FetchOptions, Loader},
    parser::Sections,
    util::setup_tracing,
    value::Coercion,
};
use anstream::{eprintln, println};
use anyhow::Context as _;
use clap::Parser;
use tracing::debug;

/// Main CLI entrypoint
pub fn cli() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    setup_tracing(args.trace_level(), args.log_file.as_deref())
        .inspect_err(|e| eprintln!("{e:?}"))?;

    if args.config_files {
        for f in Manager::config_files() {
            println!("{f}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut manager = Manager::new();
    manager.merge_overrides(&args.config);
    if args.show_config {
        println!("{manager}");
        return Ok(ExitCode::SUCCESS);
    }

    let config = manager
        .get::<Configuration>()
        .context("invalid configuration")?;

    run(&args, &config)
        .inspect_err(|e| {
            eprintln!(
                "{}Error:{} {e:#}",
                styles::ERROR.render(),
                styles::ERROR.render_reset()
            );
        })
        .or_else(|_| Ok(false))
        .map(|success| {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        })
}

#[tokio::main(flavor = "current_thread")]
async fn run(args: &CliArgs, config: &Configuration) -> anyhow::Result<bool> {
    let Some(file) = args.file.as_deref() else {
        anyhow::bail!("no configuration file specified");
    };
    let loader = Loader::new(file, FetchOptions::from(config));
    debug!("reading {} from {}", loader.path(), config.host);
    let sections = loader.load().await?;
    show(&mut anstream::stdout(), &sections, args)?;
    Ok(true)
}

/// Outputs whatever the arguments asked for: section names, one section, or one value
fn show(out: &mut impl Write, sections: &Sections, args: &CliArgs) -> anyhow::Result<()> {
    let Some(name) = args.section.as_deref() else {
        for name in sections.keys() {
            writeln!(out, "{name}")?;
        }
        return Ok(());
    };
    let section = sections
        .get(name)
        .with_context(|| format!("no section [{name}]"))?;

    if let Some(key) = args.key.as_deref() {
        writeln!(out, "{}", section.get(key, args.coercion)?)?;
    } else {
        show_section(out, section, args.coercion)?;
    }
    Ok(())
}

fn show_section(
    out: &mut impl Write,
    section: &Category,
    coercion: Coercion,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{}[{}]{}",
        styles::HEADER.render(),
        section.name(),
        styles::HEADER.render_reset()
    )?;
    for (key, value) in section.attributes() {
        writeln!(out, "{key} => {}", coercion.apply(value))?;
    }
    Ok(())
}
