#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::TempDir;
use tokio::process::Command;

/// An isolated credentials file for one test.
pub struct Sandbox {
    _dir: TempDir,
    pub credentials: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let credentials = dir.path().join("credentials.json");
        Self {
            _dir: dir,
            credentials,
        }
    }

    /// Run the CLI binary against `base_url` with this sandbox's credentials.
    pub async fn run(&self, base_url: &str, args: &[&str]) -> Output {
        run_cli(&self.credentials, base_url, args).await
    }

    /// Run the CLI and expect success, returning stdout.
    pub async fn run_success(&self, base_url: &str, args: &[&str]) -> String {
        let output = self.run(base_url, args).await;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run the CLI and expect failure, returning stderr.
    pub async fn run_failure(&self, base_url: &str, args: &[&str]) -> String {
        let output = self.run(base_url, args).await;
        if output.status.success() {
            panic!("CLI command should have failed: {:?}", args);
        }
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}

async fn run_cli(credentials: &Path, base_url: &str, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_authwire"));
    cmd.args(args);
    cmd.env("AUTHWIRE_CREDENTIALS", credentials);
    cmd.env("AUTHWIRE_BASE_URL", base_url);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd.output().await.expect("Failed to execute CLI")
}
