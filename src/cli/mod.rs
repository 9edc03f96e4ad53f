//! CLI module: Clap argument parser, prompts, output helpers and the
//! command implementations.

pub mod commands;
pub mod output;

use std::path::{Component, Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::cave::CaveOptions;
use crate::config::Settings;
use crate::errors::{Result, SesameError};

/// Environment variable consulted before prompting for a recovery phrase.
pub const PHRASE_ENV: &str = "SESAME_PHRASE";

/// Environment variable consulted before prompting for an unlock code.
pub const CODE_ENV: &str = "SESAME_CODE";

/// Sesame CLI: deterministic passphrase vault.
#[derive(Parser)]
#[command(name = "sesame", about = "Deterministic passphrase vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the cave (default: .)
    #[arg(short, long, env = "SESAME_PATH", global = true)]
    pub path: Option<String>,

    /// Memory exponent for key derivation (default: 30)
    #[arg(long, global = true)]
    pub pow: Option<u32>,

    /// Directory for the lock file (default: the system temp dir)
    #[arg(long, global = true)]
    pub lock_dir: Option<String>,

    /// Print secrets instead of copying them to the clipboard
    #[arg(short, long, global = true)]
    pub echo: bool,

    /// Terse output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Lock the cave on exit instead of closing it
    #[arg(short, long, global = true)]
    pub lock: bool,

    /// Forget an existing lock, then close the cave on exit
    #[arg(short = 'x', long, global = true)]
    pub expunge: bool,

    /// Rebuild a cave from its recovery phrase
    #[arg(short, long, global = true)]
    pub reconstruct: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// List services, or the users of one service
    List {
        /// Service whose users to list
        service: Option<String>,
    },

    /// Add a service and user, showing its passphrase
    Add {
        service: String,
        user: String,
        /// Start at this index instead of 0
        #[arg(short, long)]
        offset: Option<i64>,
    },

    /// Show the passphrase for a service
    Get {
        service: String,
        /// Required when the service has more than one user
        user: Option<String>,
        /// Show the passphrase for this index instead of the stored one
        #[arg(short, long)]
        offset: Option<i64>,
    },

    /// Move a service to its next passphrase
    Next {
        service: String,
        /// Required when the service has more than one user
        user: Option<String>,
        /// Jump to this index instead of the next one
        #[arg(short, long)]
        offset: Option<i64>,
    },

    /// Remove a service or one of its users
    Delete {
        service: String,
        /// Required when the service has more than one user
        user: Option<String>,
    },
}

/// Command-line flags merged over `.sesame.toml`.
#[derive(Debug, Clone)]
pub struct Context {
    pub dir: PathBuf,
    pub options: CaveOptions,
    pub echo: bool,
    pub quiet: bool,
}

impl Context {
    /// Resolve the cave directory and options from the working directory.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let settings = Settings::load(&cwd)?;
        Self::from_parts(cli, &settings, &cwd)
    }

    /// Merge `cli` over `settings`.
    ///
    /// Flags win over the config file.  Relative paths from either source
    /// are taken from `cwd`, and the cave directory must already exist.
    pub fn from_parts(cli: &Cli, settings: &Settings, cwd: &Path) -> Result<Self> {
        let dir = absolute(cwd, Path::new(cli.path.as_deref().unwrap_or(&settings.path)));
        if !dir.is_dir() {
            return Err(SesameError::ConfigError(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let mut options = settings.cave_options();
        if let Some(pow) = cli.pow {
            options.pow = pow;
        }
        if let Some(lock_dir) = &cli.lock_dir {
            options.lock_dir = PathBuf::from(lock_dir);
        }
        options.lock_dir = absolute(cwd, &options.lock_dir);

        Ok(Self {
            dir,
            options,
            echo: cli.echo || settings.echo,
            quiet: cli.quiet || settings.quiet,
        })
    }
}

/// `path` made absolute against `cwd`, with `.` components removed.
fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    cwd.join(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get a secret, trying `env_var` first and then a hidden prompt.
///
/// Returns `Zeroizing<String>` so the secret is wiped from memory on drop.
pub fn prompt_secret(env_var: &str, prompt: &str) -> Result<Zeroizing<String>> {
    if let Ok(secret) = std::env::var(env_var) {
        if !secret.trim().is_empty() {
            return Ok(Zeroizing::new(secret));
        }
    }

    let secret = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| SesameError::CommandFailed(format!("prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Ask which user of `service` is meant.
pub fn prompt_user(service: &str) -> Result<String> {
    dialoguer::Input::<String>::new()
        .with_prompt(format!("User for {service}"))
        .interact_text()
        .map(|user| user.trim().to_lowercase())
        .map_err(|e| SesameError::CommandFailed(format!("prompt: {e}")))
}

/// Print a secret, or copy it to the clipboard unless `echo` is set.
pub fn show_secret(label: &str, secret: &str, ctx: &Context) -> Result<()> {
    if ctx.echo {
        if !ctx.quiet {
            output::info(label);
        }
        println!("{secret}");
        return Ok(());
    }

    arboard::Clipboard::new()
        .and_then(|mut clipboard| clipboard.set_text(secret.to_string()))
        .map_err(|e| SesameError::CommandFailed(format!("clipboard: {e}")))?;
    output::success(&format!("{label} copied to the clipboard"));
    Ok(())
}

/// Service and user names are case-insensitive on the command line.
pub fn normalise(name: &str) -> String {
    name.trim().to_lowercase()
}
