//! Encode, dump and run handlers

use std::io::Write;

use tracing::info;

use crate::config::EnviPaths;
use crate::error::{EnviError, EnviResult};
use crate::launch;
use crate::mapping::{parse_overrides, to_environ, EnvMapping};
use crate::passphrase::{PassphrasePurpose, PassphraseSource};
use crate::source::SourceReader;
use crate::store::EnvStore;

use super::Cli;

/// Resolve every source named on the command line and apply overrides
fn resolve(
    cli: &Cli,
    paths: &EnviPaths,
    store: &EnvStore,
    passphrases: &dyn PassphraseSource,
) -> EnviResult<EnvMapping> {
    // Validate overrides before any prompt
    let overrides = parse_overrides(&cli.envs)?;

    let reader = SourceReader::new(store, passphrases, paths);
    let resolved = reader.resolve(&cli.sources(paths))?;

    Ok(resolved.finalize(&overrides))
}

/// Encrypt the resolved variables to the output file
pub fn handle_encode(
    cli: &Cli,
    paths: &EnviPaths,
    store: &EnvStore,
    passphrases: &dyn PassphraseSource,
) -> EnviResult<()> {
    let mapping = resolve(cli, paths, store, passphrases)?;
    let output = cli.output_path(paths);

    let passphrase = passphrases.acquire(PassphrasePurpose::Encrypt(&output))?;
    store.write_file(&output, &mapping, passphrase.as_bytes())?;

    info!(path = %output.display(), variables = mapping.len(), "encrypted file saved");
    println!("{} file saved successfully.", output.display());
    Ok(())
}

/// Print the resolved variables as dotenv text
pub fn handle_dump(
    cli: &Cli,
    paths: &EnviPaths,
    store: &EnvStore,
    passphrases: &dyn PassphraseSource,
) -> EnviResult<()> {
    let mapping = resolve(cli, paths, store, passphrases)?;
    let text = store.render_plain(&mapping)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Run the trailing command with the resolved variables as its environment
///
/// Returns the child's exit code.
pub fn handle_run(
    cli: &Cli,
    paths: &EnviPaths,
    store: &EnvStore,
    passphrases: &dyn PassphraseSource,
) -> EnviResult<i32> {
    let (program, args) = cli
        .command
        .split_first()
        .ok_or_else(|| EnviError::Launch("No command given".to_string()))?;

    let mapping = resolve(cli, paths, store, passphrases)?;
    launch::run(program, args, &to_environ(&mapping))
}
