//! Helpers for driving the `igotifier` binary
//!
//! One-shot invocations (`-version`, usage errors) go through
//! [`IgotifierCommand`]; long-running watchers through [`RunningWatcher`],
//! which collects stderr lines as they arrive.

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// CLI command builder with timing
pub struct IgotifierCommand {
    binary_path: PathBuf,
    working_dir: PathBuf,
    args: Vec<String>,
}

impl IgotifierCommand {
    /// Create a new command in the given working directory
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_igotifier")),
            working_dir: working_dir.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary_path);
        command.args(&self.args).current_dir(&self.working_dir);
        command
    }

    /// Execute command to completion
    pub fn execute(&self) -> Result<CommandResult> {
        let start = Instant::now();
        let output = self.command().output().context("Failed to execute command")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }

    /// Start a long-running watcher
    pub fn spawn(&self) -> Result<RunningWatcher> {
        let mut child = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn igotifier")?;

        let stderr = child.stderr.take().context("stderr not captured")?;
        let lines = Arc::new(Mutex::new(Vec::new()));
        let reader = {
            let lines = Arc::clone(&lines);
            thread::spawn(move || {
                for line in BufReader::new(stderr).lines().map_while(|l| l.ok()) {
                    lines.lock().unwrap().push(line);
                }
            })
        };

        Ok(RunningWatcher {
            child,
            lines,
            reader: Some(reader),
        })
    }
}

/// Command execution result with timing
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandResult {
    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// A watcher process whose stderr is being collected
pub struct RunningWatcher {
    child: Child,
    lines: Arc<Mutex<Vec<String>>>,
    reader: Option<thread::JoinHandle<()>>,
}

impl RunningWatcher {
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Snapshot of stderr lines so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Number of stderr lines containing `text`
    pub fn count(&self, text: &str) -> usize {
        self.lines().iter().filter(|l| l.contains(text)).count()
    }

    /// The line following the first line that contains `text`
    ///
    /// Multi-line log messages continue on the next stderr line.
    pub fn line_after(&self, text: &str) -> Option<String> {
        let lines = self.lines();
        let at = lines.iter().position(|l| l.contains(text))?;
        lines.get(at + 1).cloned()
    }

    /// Wait until at least `n` lines contain `text`
    pub fn wait_for(&self, text: &str, n: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.count(text) >= n {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        self.count(text) >= n
    }

    /// Wait for the process to exit on its own
    pub fn wait_exit(&mut self, timeout: Duration) -> Result<ExitStatus> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = self.child.try_wait()? {
                if let Some(reader) = self.reader.take() {
                    let _ = reader.join();
                }
                return Ok(status);
            }
            if Instant::now() >= deadline {
                anyhow::bail!("igotifier did not exit within {:?}", timeout);
            }
            thread::sleep(Duration::from_millis(20));
        }
    }
}

impl Drop for RunningWatcher {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Macro for convenient command construction
///
/// Usage:
/// ```ignore
/// igotifier!(dir, "-version").execute()?;
/// ```
#[macro_export]
macro_rules! igotifier {
    ($dir:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::IgotifierCommand::new($dir);
        cmd.args(&[$($arg),*]);
        cmd
    }};
}
