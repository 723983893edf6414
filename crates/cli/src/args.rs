//! Command line flags
//!
//! Flags are written Go-style (`-path=./src`). clap only knows `--long`
//! options, so known single-dash long flags are rewritten before parsing.

use clap::{ArgAction, CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use watcher::WatchConfig;

/// Long flags accepted with a single dash
const LONG_FLAGS: &[&str] = &["path", "exec", "verbose", "version", "help"];

const EXAMPLES: &str = "\
Examples:
  igotifier -path=\"/config/app.yaml\" -exec=\"app-reloader sighup --name=nginx\"
  igotifier -path=\"./src\" -exec=\"make test\" -verbose";

/// igotifier - File watcher that executes commands on change
#[derive(Parser, Debug)]
#[command(name = "igotifier")]
#[command(about, long_about = None, disable_version_flag = true)]
#[command(override_usage = "igotifier -path=<path> -exec=<command>")]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Path to watch (file or directory)
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Command to execute on file change
    #[arg(long, value_name = "COMMAND", allow_hyphen_values = true)]
    pub exec: Option<String>,

    /// Enable verbose logging
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub verbose: bool,

    /// Show version
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub version: bool,
}

impl Cli {
    /// Parse process arguments, accepting single-dash long flags
    pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// Build the watcher config, or `None` if a required flag is missing
    pub fn into_config(self) -> Option<WatchConfig> {
        let path = self.path.filter(|p| !p.is_empty()).map(PathBuf::from)?;
        let command = self.exec.filter(|c| !c.is_empty())?;
        Some(WatchConfig {
            path,
            command,
            verbose: self.verbose,
        })
    }
}

/// Full usage text, as printed on a usage error
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

/// Version line printed by `-version`
pub fn version_line() -> String {
    format!("igotifier version {}", env!("CARGO_PKG_VERSION"))
}

/// Rewrite `-flag` and `-flag=value` into `--flag` forms for known flags
///
/// The program name and values are left untouched, as is everything after
/// a bare `--`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for (i, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }

        let rewritten = arg.to_str().and_then(|s| {
            if s == "--" {
                return None;
            }
            let rest = s.strip_prefix('-').filter(|r| !r.starts_with('-'))?;
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            LONG_FLAGS.contains(&name).then(|| OsString::from(format!("-{s}")))
        });

        if arg == "--" {
            passthrough = true;
        }
        out.push(rewritten.unwrap_or(arg));
    }

    out
}
