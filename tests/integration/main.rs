//! Integration tests for bincache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn bincache() -> Command {
        cargo_bin_cmd!("bincache")
    }

    #[test]
    fn help_displays() {
        bincache()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Shared per-user cache of downloaded executables",
            ));
    }

    #[test]
    fn version_displays() {
        bincache()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("bincache"));
    }

    #[test]
    fn path_prints_entry_path() {
        let temp = TempDir::new().unwrap();
        bincache()
            .args(["--cache-dir"])
            .arg(temp.path())
            .args(["path", "shellcheck", "0.9.0"])
            .assert()
            .success()
            .stdout(predicate::str::contains("shellcheck/0.9.0/shellcheck"));
    }

    #[test]
    fn path_rejects_bad_identifier() {
        let temp = TempDir::new().unwrap();
        bincache()
            .args(["--cache-dir"])
            .arg(temp.path())
            .args(["path", "../escape", "0.1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid binary identifier"));
    }

    #[test]
    fn list_empty_cache() {
        let temp = TempDir::new().unwrap();
        bincache()
            .args(["--cache-dir"])
            .arg(temp.path())
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached binaries"));
    }

    #[test]
    fn list_empty_cache_json() {
        let temp = TempDir::new().unwrap();
        bincache()
            .args(["--cache-dir"])
            .arg(temp.path())
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn list_shows_seeded_entry() {
        let temp = TempDir::new().unwrap();
        let entry_dir = temp.path().join("tool").join("v2");
        std::fs::create_dir_all(&entry_dir).unwrap();
        std::fs::write(entry_dir.join("tool"), b"fake binary").unwrap();

        bincache()
            .args(["--cache-dir"])
            .arg(temp.path())
            .args(["list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("tool@v2"));
    }

    #[test]
    fn config_path() {
        bincache()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        bincache()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"));
    }

    #[test]
    fn run_missing_override_fails() {
        let temp = TempDir::new().unwrap();
        bincache()
            .args(["--cache-dir"])
            .arg(temp.path())
            .args(["run", "tool", "v1", "--bin-path", "/nonexistent/tool"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));
    }

    #[cfg(unix)]
    #[test]
    fn run_executes_cached_binary() {
        let temp = TempDir::new().unwrap();
        let entry_dir = temp.path().join("tool").join("v9");
        std::fs::create_dir_all(&entry_dir).unwrap();
        std::fs::write(entry_dir.join("tool"), b"#!/bin/sh\nexit 5\n").unwrap();

        // Warm-cache hit: no download, binary is made executable and run
        bincache()
            .args(["--cache-dir"])
            .arg(temp.path())
            .args(["run", "tool", "v9"])
            .assert()
            .code(5);
    }

    #[cfg(unix)]
    #[test]
    fn run_propagates_exit_code() {
        let temp = TempDir::new().unwrap();
        bincache()
            .args(["--cache-dir"])
            .arg(temp.path())
            .args(["run", "sh", "v1", "--bin-path", "/bin/sh", "--", "-c", "exit 3"])
            .assert()
            .code(3);
    }

    #[cfg(unix)]
    #[test]
    fn run_override_skips_cache_entirely() {
        let temp = TempDir::new().unwrap();
        bincache()
            .args(["--cache-dir"])
            .arg(temp.path())
            .args(["run", "true", "v1", "--bin-path", "/bin/sh", "--", "-c", "exit 0"])
            .assert()
            .success();

        // No cache entry and no lock was created for the overridden binary
        assert!(!temp.path().join("true").exists());
        assert!(!temp.path().join(".locks").exists());
    }
}
