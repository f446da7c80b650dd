use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn envi(dir: &Path, passphrase: &str) -> Command {
    let mut cmd = Command::cargo_bin("envi").unwrap();
    cmd.current_dir(dir)
        .env("ENVI_DIR", dir)
        .env("ENVI_PASSPHRASE", passphrase)
        .env_remove("ENVI_ENCRYPTED_FILE")
        .env_remove("ENVI_PLAIN_FILE")
        .env_remove("RUST_LOG");
    cmd
}

fn encoded_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "A=2\nB=3\n").unwrap();

    envi(dir.path(), "pw")
        .args(["-E", "-a", "-e", "A:5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("saved successfully"));

    dir
}

#[test]
fn test_encode_then_dump() {
    let dir = encoded_project();
    assert!(dir.path().join(".env.AES").exists());

    envi(dir.path(), "pw")
        .arg("--dump")
        .assert()
        .success()
        .stdout("A=5\nB=3\n");
}

#[test]
fn test_encrypted_file_is_not_plaintext() {
    let dir = encoded_project();
    let data = fs::read(dir.path().join(".env.AES")).unwrap();

    // 12-byte nonce + ciphertext + 16-byte tag of "A=5\nB=3\n"
    assert_eq!(data.len(), 12 + 8 + 16);
    assert!(!String::from_utf8_lossy(&data).contains("A=5"));
}

#[test]
fn test_wrong_passphrase_fails_without_leaking() {
    let dir = encoded_project();

    envi(dir.path(), "not-the-passphrase")
        .arg("--dump")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decryption failed"))
        .stderr(predicate::str::contains("A=5").not())
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_tampered_file_fails() {
    let dir = encoded_project();
    let path = dir.path().join(".env.AES");
    let mut data = fs::read(&path).unwrap();
    let last = data.len() - 1;
    data[last] ^= 0x80;
    fs::write(&path, data).unwrap();

    envi(dir.path(), "pw")
        .arg("--dump")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decryption failed"));
}

#[test]
fn test_encrypted_outranks_plain_and_override_outranks_all() {
    let dir = encoded_project();
    fs::write(dir.path().join("late.env"), "A=plain\nB=plain\nC=plain\n").unwrap();

    envi(dir.path(), "pw")
        .args(["-f", "late.env", "-i", ".env.AES", "-e", "C:inline", "--dump"])
        .assert()
        .success()
        .stdout("A=5\nB=3\nC=\"inline\"\n");
}

#[test]
fn test_no_source_found() {
    let dir = TempDir::new().unwrap();

    envi(dir.path(), "pw")
        .arg("--dump")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No source found"));
}

#[test]
fn test_missing_explicit_file() {
    let dir = TempDir::new().unwrap();

    envi(dir.path(), "pw")
        .args(["-i", "nope.AES", "--dump"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_invalid_override() {
    let dir = encoded_project();

    envi(dir.path(), "pw")
        .args(["-e", "NOT VALID:1", "--dump"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid mapping"));
}

#[test]
fn test_override_error_hides_value() {
    let dir = encoded_project();

    envi(dir.path(), "pw")
        .args(["-e", "API_KEY=sk-live-123", "--dump"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid mapping"))
        .stderr(predicate::str::contains("sk-live-123").not());
}

#[test]
fn test_encode_adopt_skips_unwritable_names() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("envi")
        .unwrap()
        .current_dir(dir.path())
        .env_clear()
        .env("ENVI_DIR", dir.path())
        .env("ENVI_PASSPHRASE", "pw")
        .env("BASH_FUNC_f%%", "() { :; }")
        .env("ENVI_ADOPTED", "kept")
        .args(["-E", "-A"])
        .assert()
        .success();

    envi(dir.path(), "pw")
        .arg("--dump")
        .assert()
        .success()
        .stdout(predicate::str::contains("ENVI_ADOPTED=\"kept\""))
        .stdout(predicate::str::contains("BASH_FUNC").not());
}

#[cfg(unix)]
#[test]
fn test_run_injects_environment() {
    let dir = encoded_project();

    envi(dir.path(), "pw")
        .args(["-e", "GREETING:hello", "--", "sh", "-c", "printf '%s %s' \"$GREETING\" \"$A\""])
        .assert()
        .success()
        .stdout("hello 5");
}

#[cfg(unix)]
#[test]
fn test_run_propagates_exit_code() {
    let dir = encoded_project();

    envi(dir.path(), "pw")
        .args(["sh", "-c", "exit 3"])
        .assert()
        .code(3);
}

#[cfg(unix)]
#[test]
fn test_passphrase_not_passed_to_child() {
    let dir = encoded_project();

    envi(dir.path(), "pw")
        .args(["-A", "--", "sh", "-c", "printf '%s' \"${ENVI_PASSPHRASE-unset}\""])
        .assert()
        .success()
        .stdout("unset");
}

#[cfg(unix)]
#[test]
fn test_adopt_layers_default_encrypted_file() {
    let dir = encoded_project();

    envi(dir.path(), "pw")
        .env("FROM_PARENT", "yes")
        .args(["-A", "--", "sh", "-c", "printf '%s %s' \"$FROM_PARENT\" \"$A\""])
        .assert()
        .success()
        .stdout("yes 5");
}

#[cfg(unix)]
#[test]
fn test_program_found_on_parent_path() {
    use std::os::unix::fs::PermissionsExt;

    let dir = encoded_project();
    let bin = TempDir::new().unwrap();
    let tool = bin.path().join("envi-path-tool");
    fs::write(&tool, "#!/bin/sh\nexit 4\n").unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

    let path = match std::env::var_os("PATH") {
        Some(existing) => {
            let dirs = std::iter::once(bin.path().to_path_buf())
                .chain(std::env::split_paths(&existing));
            std::env::join_paths(dirs).unwrap()
        }
        None => bin.path().as_os_str().to_os_string(),
    };

    // The resolved mapping carries no PATH of its own
    envi(dir.path(), "pw")
        .env("PATH", path)
        .arg("envi-path-tool")
        .assert()
        .code(4);
}
