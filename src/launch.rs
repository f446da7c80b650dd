//! Child process launching
//!
//! The child receives exactly the resolved environment and nothing else.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::error::{EnviError, EnviResult};
use crate::mapping::parse_environ_entry;

/// Run `program` with `args` and the given `NAME=VALUE` environment
///
/// The program is looked up on envi's own `PATH`, not the child's. Stdio is
/// inherited. Returns the exit code the caller should exit with.
pub fn run(program: &str, args: &[String], environ: &[String]) -> EnviResult<i32> {
    let executable = find_program(program, std::env::var_os("PATH").as_deref());
    let mut cmd = Command::new(&executable);
    cmd.args(args).env_clear();

    for entry in environ {
        if let Some((name, value)) = parse_environ_entry(entry) {
            cmd.env(name, value);
        }
    }

    debug!(
        program,
        executable = %executable.display(),
        variables = environ.len(),
        "launching child process"
    );

    let status = cmd
        .status()
        .map_err(|e| EnviError::Launch(format!("Failed to run {}: {}", program, e)))?;

    Ok(exit_code(status))
}

/// Locate a bare program name on `search_path`
///
/// Names containing a path separator, and names not found, are returned
/// unchanged so the spawn reports its own error.
pub fn find_program(program: &str, search_path: Option<&OsStr>) -> PathBuf {
    let name = Path::new(program);
    if name.components().count() != 1 {
        return name.to_path_buf();
    }

    search_path
        .into_iter()
        .flat_map(std::env::split_paths)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
        .unwrap_or_else(|| name.to_path_buf())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Map a child's exit status onto a process exit code
///
/// Signal-terminated children on Unix map to `128 + signal`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
