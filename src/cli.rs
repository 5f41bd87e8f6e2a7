// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::commands::{self, GenerateOptions};
use crate::core::config::ReportSettings;
use crate::infra::fs::expand_path;
use crate::{resolve_locale, t};

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built, so the
/// help text is already translated. It looks for `--lang <VALUE>` and
/// `--lang=<VALUE>`.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(value) = args.iter().find_map(|arg| arg.strip_prefix("--lang=")) {
        return Some(value.to_string());
    }
    let pos = args.iter().position(|arg| arg == "--lang")?;
    args.get(pos + 1).cloned()
}

pub fn build_cli(locale: &str) -> Command {
    Command::new("generate_report")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about", locale = locale).to_string())
        .arg(
            Arg::new("bundle")
                .help(t!("cli.bundle", locale = locale).to_string())
                .value_name("BUNDLE")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help(t!("cli.output", locale = locale).to_string())
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("title")
                .short('t')
                .long("title")
                .help(t!("cli.title", locale = locale).to_string())
                .value_name("TITLE")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help(t!("cli.config", locale = locale).to_string())
                .value_name("CONFIG")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("cli.verbose", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
}

/// Installs the stderr diagnostics subscriber. `RUST_LOG` wins over the
/// verbosity flag when set.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_settings(matches: &ArgMatches) -> Result<ReportSettings> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => ReportSettings::load(&expand_path(path)?),
        None => Ok(ReportSettings::default()),
    }
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let requested = pre_parse_language();
    let cli_locale = resolve_locale(requested.as_deref());
    rust_i18n::set_locale(&cli_locale);

    let matches = build_cli(&cli_locale).get_matches();
    init_tracing(matches.get_flag("verbose"));

    let settings = load_settings(&matches)?;

    // --lang beats the settings file, which beats the system locale.
    let locale = match (matches.get_one::<String>("lang"), &settings.language) {
        (Some(lang), _) | (None, Some(lang)) => resolve_locale(Some(lang.as_str())),
        (None, None) => cli_locale,
    };
    rust_i18n::set_locale(&locale);
    tracing::debug!("using locale {}", locale);

    let options = GenerateOptions {
        bundle: matches
            .get_one::<PathBuf>("bundle")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing bundle path"))?,
        output: matches.get_one::<PathBuf>("output").cloned(),
        title: matches.get_one::<String>("title").cloned(),
        settings,
        locale,
    };

    commands::execute(options).await?;
    Ok(())
}
