//! The external bundler collaborator
//!
//! The bundler is a black box: it is started with a working directory and
//! optional port/target, and reports back an exit status and its stderr.
//! A build succeeds only on exit code 0 with nothing on stderr.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Environment variable carrying the requested port
pub const PORT_ENV: &str = "PORT";

/// Environment variable carrying the requested build target
pub const TARGET_ENV: &str = "REMIX_BUILD_TARGET";

/// Parameters passed to the build trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub cwd: PathBuf,
    pub port: Option<u16>,
    pub target: Option<String>,
}

impl BuildRequest {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            port: None,
            target: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// What the bundler reported back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStatus {
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl BuildStatus {
    pub fn success() -> Self {
        Self {
            exit_code: Some(0),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Exit code 0 and no stderr output
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0) && self.stderr.trim().is_empty()
    }
}

/// Starts the external build and waits for it to finish
#[async_trait]
pub trait BuildTrigger: Send + Sync {
    async fn trigger(&self, request: &BuildRequest) -> Result<BuildStatus>;
}

/// Runs the bundler as a subprocess
#[derive(Debug, Clone)]
pub struct ProcessBuildTrigger {
    program: String,
    args: Vec<String>,
}

impl ProcessBuildTrigger {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a command line of the form `[program, args...]`
    ///
    /// Returns `None` for an empty command.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl BuildTrigger for ProcessBuildTrigger {
    async fn trigger(&self, request: &BuildRequest) -> Result<BuildStatus> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&request.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(port) = request.port {
            command.env(PORT_ENV, port.to_string());
        }
        if let Some(target) = &request.target {
            command.env(TARGET_ENV, target);
        }

        tracing::debug!(program = %self.program, args = ?self.args, cwd = %request.cwd.display(), "Starting build command");
        let output = command.output().await.map_err(|source| Error::TriggerSpawn {
            program: self.program.clone(),
            source,
        })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            tracing::debug!(target: "remix_build::bundler", "{line}");
        }

        Ok(BuildStatus {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
