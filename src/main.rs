use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use envi::cli::{handle_dump, handle_encode, handle_run, Cli};
use envi::config::EnviPaths;
use envi::passphrase::{PassphraseSource, PromptPassphrase, StaticPassphrase};
use envi::store::EnvStore;

fn main() -> Result<()> {
    if std::env::args_os().len() == 1 {
        Cli::command().print_help()?;
        return Ok(());
    }

    let mut cli = Cli::parse();

    // Keep the passphrase out of an adopted environment
    std::env::remove_var("ENVI_PASSPHRASE");

    // RUST_LOG wins; otherwise --debug toggles between warn and debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.debug { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let paths = EnviPaths::new();
    let store = EnvStore::new();
    let passphrases: Box<dyn PassphraseSource> = match cli.passphrase.take() {
        Some(passphrase) => Box::new(StaticPassphrase::new(passphrase)),
        None => Box::new(PromptPassphrase::new()),
    };

    if cli.encode {
        handle_encode(&cli, &paths, &store, passphrases.as_ref())?;
        return Ok(());
    }

    if cli.dump {
        handle_dump(&cli, &paths, &store, passphrases.as_ref())?;
        return Ok(());
    }

    let code = handle_run(&cli, &paths, &store, passphrases.as_ref())?;
    std::process::exit(code);
}
