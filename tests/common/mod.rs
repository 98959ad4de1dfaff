//! Shared helpers for the binary-level tests.
//!
//! Every test runs the `pip` binary in a scratch home directory with a clean
//! environment, so the developer's own configuration never leaks in.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug)]
pub struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.home.path()
    }

    /// Where failed runs are recorded.
    pub fn failure_log(&self) -> PathBuf {
        self.path().join("pip-log.txt")
    }

    /// A `pip` invocation inside the sandbox.
    pub fn pip(&self) -> Command {
        let mut cmd = Command::cargo_bin("pip").unwrap();
        cmd.env_clear()
            .env("HOME", self.path())
            .env("NO_COLOR", "1")
            .env("RUST_LOG", "off")
            .env("PIP_LOG_FILE", self.failure_log())
            .current_dir(self.path());
        cmd
    }

    /// Writes a configuration file and returns its path, for `PIP_CONFIG_FILE`.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.path().join("test-pip.cfg");
        fs::write(&path, content).unwrap();
        path
    }

    /// Standard output of a successful run.
    pub fn stdout_of(&self, cmd: &mut Command) -> String {
        let output = cmd.assert().success();
        String::from_utf8_lossy(&output.get_output().stdout).into_owned()
    }
}
