//! Configuration: env-file discovery and the resolved [`AppConfig`].
//!
//! Precedence, lowest first: env files < process environment < flags.
//! Env files are loaded into the process environment before the command line
//! is parsed, without overriding anything already set, so clap's `env`
//! fallbacks see them as ordinary environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use secrecy::SecretString;
use tracing::{debug, warn};

use xca_api::{TlsMode, TransportConfig};

use crate::cli::Cli;

/// Env file looked up in the working directory and the home directory.
pub const ENV_FILE_NAME: &str = ".xcaenv";

/// Older name still honoured in the home directory.
pub const LEGACY_HOME_ENV_FILE_NAME: &str = ".xmcenv";

/// Sent as `User-Agent` on every request.
pub const TOOL_ID: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// ── Env files ────────────────────────────────────────────────────────

/// Outcome of consulting one env-file source.
#[derive(Debug)]
pub enum EnvFileStatus {
    Loaded(PathBuf),
    Missing(PathBuf),
    Failed { path: PathBuf, error: dotenvy::Error },
}

/// Env-file sources in the order they are consulted.
///
/// Earlier sources win: a variable set by the working-directory file is not
/// overridden by one from the home directory.
pub fn env_file_sources(cwd: Option<&Path>, home: Option<&Path>) -> Vec<PathBuf> {
    let mut sources = Vec::with_capacity(3);
    if let Some(cwd) = cwd {
        sources.push(cwd.join(ENV_FILE_NAME));
    }
    if let Some(home) = home {
        sources.push(home.join(ENV_FILE_NAME));
        sources.push(home.join(LEGACY_HOME_ENV_FILE_NAME));
    }
    sources.dedup();
    sources
}

/// Sources for the current process: working directory, then home directory.
pub fn default_env_file_sources() -> Vec<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    env_file_sources(cwd.as_deref(), home.as_deref())
}

/// Load every existing source into the process environment.
///
/// Runs before logging is set up, so the outcome is returned for the
/// caller to report with [`log_env_files`].
pub fn load_env_files(sources: &[PathBuf]) -> Vec<EnvFileStatus> {
    sources
        .iter()
        .map(|path| {
            if !path.is_file() {
                return EnvFileStatus::Missing(path.clone());
            }
            match dotenvy::from_path(path) {
                Ok(()) => EnvFileStatus::Loaded(path.clone()),
                Err(error) => EnvFileStatus::Failed {
                    path: path.clone(),
                    error,
                },
            }
        })
        .collect()
}

pub fn log_env_files(statuses: &[EnvFileStatus]) {
    for status in statuses {
        match status {
            EnvFileStatus::Loaded(path) => debug!(path = %path.display(), "loaded env file"),
            EnvFileStatus::Missing(path) => debug!(path = %path.display(), "no env file"),
            EnvFileStatus::Failed { path, error } => {
                warn!(path = %path.display(), "could not load env file: {error}");
            }
        }
    }
}

// ── Resolved configuration ───────────────────────────────────────────

/// Finished configuration record handed to the session client.
#[derive(Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub user_id: String,
    pub secret: SecretString,
    pub tls: TlsMode,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let tls = match (&cli.ca_cert, cli.verify_tls) {
            (Some(path), _) => TlsMode::CustomCa(path.clone()),
            (None, true) => TlsMode::System,
            (None, false) => TlsMode::DangerAcceptInvalid,
        };

        Self {
            host: cli.host.trim().to_owned(),
            port: cli.port,
            timeout: Duration::from_secs(cli.timeout),
            user_id: cli.userid.clone(),
            secret: SecretString::from(cli.secret.clone()),
            tls,
        }
    }

    /// Transport settings: one timeout for every call, tool identifier as
    /// user agent.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
            ..TransportConfig::default()
        }
        .with_user_agent(TOOL_ID)
    }
}
