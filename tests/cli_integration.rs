//! Integration tests for the Sesame CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! Phrases and codes are passed through `SESAME_PHRASE` / `SESAME_CODE`
//! and secrets are echoed with `--quiet --echo`, so stdout holds nothing
//! but the secrets themselves.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PHRASE: &str = "zoo cabin oak zoo machine bacon dad abandon";

/// Scratch directories for one test: cave, lock and home.
struct Sandbox {
    cave: TempDir,
    lock: TempDir,
    home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            cave: TempDir::new().unwrap(),
            lock: TempDir::new().unwrap(),
            home: TempDir::new().unwrap(),
        }
    }

    /// A `sesame` command isolated from the user's config and lock.
    fn sesame(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("sesame").expect("binary should exist");
        cmd.current_dir(self.home.path())
            .env("HOME", self.home.path())
            .env_remove("SESAME_PATH")
            .env_remove("SESAME_PHRASE")
            .env_remove("SESAME_CODE")
            .arg("--path")
            .arg(self.cave.path())
            .arg("--lock-dir")
            .arg(self.lock.path())
            .args(["--pow", "20", "--quiet", "--echo"]);
        cmd
    }

    fn lock_exists(&self) -> bool {
        self.lock.path().join("sesame.lock").exists()
    }
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn help_flag_shows_usage() {
    #[allow(deprecated)]
    Command::cargo_bin("sesame")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deterministic passphrase vault"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("next"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn version_flag_shows_version() {
    #[allow(deprecated)]
    Command::cargo_bin("sesame")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sesame"));
}

#[test]
fn reconstruct_add_and_get() {
    let sandbox = Sandbox::new();

    let created = sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["--reconstruct", "add", "GitHub", "Alice"])
        .assert()
        .success();
    let lines = stdout_lines(created.get_output());
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], PHRASE);
    let passphrase = lines[1].clone();
    assert!(passphrase.split_whitespace().count() >= 4);
    assert!(sandbox.cave.path().join("sesame.cave").exists());

    let got = sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["get", "github"])
        .assert()
        .success();
    assert_eq!(stdout_lines(got.get_output()), vec![passphrase.clone()]);

    let next = sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["next", "github", "alice"])
        .assert()
        .success();
    let rotated = stdout_lines(next.get_output());
    assert_eq!(rotated.len(), 1);
    assert_ne!(rotated[0], passphrase);

    let peek = sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["get", "github", "--offset", "0"])
        .assert()
        .success();
    assert_eq!(stdout_lines(peek.get_output()), vec![passphrase]);
}

#[test]
fn lock_then_unlock_with_code() {
    let sandbox = Sandbox::new();

    let added = sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["--reconstruct", "add", "mail", "bob"])
        .assert()
        .success();
    let passphrase = stdout_lines(added.get_output())[1].clone();

    let locked = sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .arg("--lock")
        .assert()
        .success();
    let lines = stdout_lines(locked.get_output());
    assert_eq!(lines.len(), 1);
    let code = lines[0].clone();
    assert_eq!(code.split_whitespace().count(), 4);
    assert!(sandbox.lock_exists());

    // Unlocking consumes the lock, and the session locks the cave again.
    let got = sandbox
        .sesame()
        .env("SESAME_CODE", &code)
        .args(["get", "mail"])
        .assert()
        .success();
    assert_eq!(stdout_lines(got.get_output()), vec![passphrase]);
    assert!(sandbox.lock_exists());

    sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["--expunge", "list"])
        .assert()
        .success();
    assert!(!sandbox.lock_exists());
}

#[test]
fn wrong_code_fails_and_keeps_the_lock() {
    let sandbox = Sandbox::new();

    sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["--reconstruct", "--lock"])
        .assert()
        .success();
    assert!(sandbox.lock_exists());

    sandbox
        .sesame()
        .env("SESAME_CODE", "not a real code")
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unrecognised word"));
    assert!(sandbox.lock_exists());
}

#[test]
fn delete_shows_the_retired_passphrase() {
    let sandbox = Sandbox::new();

    let added = sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["--reconstruct", "add", "bank", "carol"])
        .assert()
        .success();
    let passphrase = stdout_lines(added.get_output())[1].clone();

    let deleted = sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["delete", "bank"])
        .assert()
        .success();
    assert_eq!(stdout_lines(deleted.get_output()), vec![passphrase]);

    sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["get", "bank"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unable to find"));
}

#[test]
fn sentinel_cannot_be_read() {
    let sandbox = Sandbox::new();

    sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["--reconstruct", "list"])
        .assert()
        .success();

    sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["get", "sesame", "cave"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sesame service"));
}

#[test]
fn wrong_phrase_fails() {
    let sandbox = Sandbox::new();

    sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["--reconstruct", "list"])
        .assert()
        .success();

    sandbox
        .sesame()
        .env("SESAME_PHRASE", "zoo zoo zoo zoo zoo zoo zoo zoo")
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Decryption failed"));
}

#[test]
fn existing_cave_needs_a_command() {
    let sandbox = Sandbox::new();

    sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .arg("--reconstruct")
        .assert()
        .success();

    sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("specify a command"));

    sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["--reconstruct", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("reconstructing"));
}

#[test]
fn lock_and_expunge_conflict() {
    let sandbox = Sandbox::new();
    sandbox
        .sesame()
        .args(["--lock", "--expunge"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expunge"));
}

#[test]
fn expunge_without_a_lock_fails() {
    let sandbox = Sandbox::new();

    sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .arg("--reconstruct")
        .assert()
        .success();

    sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["--expunge", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn missing_directory_is_a_config_error() {
    let sandbox = Sandbox::new();
    let missing = sandbox.cave.path().join("nowhere");

    #[allow(deprecated)]
    Command::cargo_bin("sesame")
        .unwrap()
        .current_dir(sandbox.home.path())
        .env("HOME", sandbox.home.path())
        .arg("--path")
        .arg(&missing)
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn config_file_supplies_defaults() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.home.path().join(".sesame.toml"),
        "pow = 5\n",
    )
    .unwrap();

    // The flag overrides the out-of-range value from the file.
    sandbox
        .sesame()
        .env("SESAME_PHRASE", PHRASE)
        .args(["--reconstruct", "list"])
        .assert()
        .success();

    #[allow(deprecated)]
    Command::cargo_bin("sesame")
        .unwrap()
        .current_dir(sandbox.home.path())
        .env("HOME", sandbox.home.path())
        .env("SESAME_PHRASE", PHRASE)
        .env("SESAME_PATH", sandbox.cave.path())
        .args(["--quiet", "--echo", "list"])
        .arg("--lock-dir")
        .arg(sandbox.lock.path())
        .assert()
        .code(2);
}

#[cfg(target_os = "linux")]
#[test]
fn unshown_recovery_phrase_leaves_no_cave() {
    let sandbox = Sandbox::new();

    // Without --echo and without a display the phrase cannot be shown.
    #[allow(deprecated)]
    Command::cargo_bin("sesame")
        .unwrap()
        .current_dir(sandbox.home.path())
        .env("HOME", sandbox.home.path())
        .env_remove("SESAME_PATH")
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY")
        .arg("--path")
        .arg(sandbox.cave.path())
        .arg("--lock-dir")
        .arg(sandbox.lock.path())
        .args(["--pow", "20", "--quiet"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("clipboard"));

    assert!(!sandbox.cave.path().join("sesame.cave").exists());
}

#[test]
fn config_lock_dir_is_relative_to_the_working_dir() {
    let sandbox = Sandbox::new();
    std::fs::create_dir(sandbox.home.path().join("locks")).unwrap();
    std::fs::write(
        sandbox.home.path().join(".sesame.toml"),
        "pow = 20\nlock_dir = \"locks\"\n",
    )
    .unwrap();

    #[allow(deprecated)]
    Command::cargo_bin("sesame")
        .unwrap()
        .current_dir(sandbox.home.path())
        .env("HOME", sandbox.home.path())
        .env_remove("SESAME_CODE")
        .env("SESAME_PHRASE", PHRASE)
        .arg("--path")
        .arg(sandbox.cave.path())
        .args(["--quiet", "--echo", "--reconstruct", "--lock"])
        .assert()
        .success();

    assert!(sandbox.home.path().join("locks").join("sesame.lock").exists());
    assert!(!sandbox.lock_exists());
}
