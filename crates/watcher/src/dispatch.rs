//! Command dispatch
//!
//! Runs the configured command through a shell with stdout and stderr
//! sharing a single pipe, then logs the outcome. Failures are reported,
//! never returned: a broken command must not stop the watcher.

use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;
use tracing::{info, warn};

/// Interpreter used for commands
pub const DEFAULT_SHELL: &str = "sh";

/// How a single execution ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Succeeded,
    /// Non-zero exit or spawn failure, with the reason
    Failed(String),
}

/// Result of one execution: outcome plus combined output
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub outcome: DispatchOutcome,
    pub output: String,
}

impl DispatchReport {
    pub fn succeeded(&self) -> bool {
        self.outcome == DispatchOutcome::Succeeded
    }

    /// Output that should reach the log
    ///
    /// Failure output is always surfaced; success output only when verbose.
    pub fn surfaced_output(&self, verbose: bool) -> Option<&str> {
        if self.output.is_empty() {
            return None;
        }
        match self.outcome {
            DispatchOutcome::Succeeded if !verbose => None,
            _ => Some(&self.output),
        }
    }
}

/// Executes one fixed command
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    shell: String,
    command: String,
    verbose: bool,
}

impl CommandDispatcher {
    pub fn new(command: impl Into<String>, verbose: bool) -> Self {
        Self::with_shell(DEFAULT_SHELL, command, verbose)
    }

    /// Use a specific interpreter instead of `sh`
    pub fn with_shell(shell: impl Into<String>, command: impl Into<String>, verbose: bool) -> Self {
        Self {
            shell: shell.into(),
            command: command.into(),
            verbose,
        }
    }

    /// Run the command on the blocking pool without waiting for it
    ///
    /// The returned task is detached; completion is only observable through
    /// the log. Must be called from within a tokio runtime.
    pub fn dispatch(self: &Arc<Self>) {
        let dispatcher = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            dispatcher.execute();
        });
    }

    /// Run the command to completion and log the outcome
    pub fn execute(&self) -> DispatchReport {
        info!("Executing: {}", self.command);

        let report = match self.run_shell() {
            Ok((status, output)) if status.success() => DispatchReport {
                outcome: DispatchOutcome::Succeeded,
                output,
            },
            Ok((status, output)) => DispatchReport {
                outcome: DispatchOutcome::Failed(status.to_string()),
                output,
            },
            Err(e) => DispatchReport {
                outcome: DispatchOutcome::Failed(e.to_string()),
                output: String::new(),
            },
        };

        self.log_report(&report);
        report
    }

    fn log_report(&self, report: &DispatchReport) {
        if self.verbose && !report.output.is_empty() {
            info!("Command output:\n{}", report.output);
        }

        match &report.outcome {
            DispatchOutcome::Succeeded => info!("Command executed successfully"),
            DispatchOutcome::Failed(reason) => {
                warn!("Command failed: {}", reason);
                if !self.verbose {
                    if let Some(output) = report.surfaced_output(false) {
                        warn!("Output:\n{}", output);
                    }
                }
            }
        }
    }

    /// Spawn `<shell> -c <command>` and collect combined output
    fn run_shell(&self) -> io::Result<(ExitStatus, String)> {
        let (mut reader, writer) = io::pipe()?;

        // The Command holds the parent's copies of the write end; it has to
        // be dropped before reading or the read never sees EOF.
        let mut child = {
            let mut command = Command::new(&self.shell);
            command
                .arg("-c")
                .arg(&self.command)
                .stdin(Stdio::null())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            command.spawn()?
        };

        let mut raw = Vec::new();
        let read = reader.read_to_end(&mut raw);
        let status = child.wait()?;
        read?;

        Ok((status, String::from_utf8_lossy(&raw).into_owned()))
    }
}
