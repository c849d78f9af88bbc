//! Clap derive structures for `bssid-lister`.
//!
//! Every value flag can also come from an `XCA*` environment variable, which
//! in turn may be seeded from an env file (see [`crate::config`]). An explicit
//! flag always wins.
//!
//! Long flags may also be written with a single dash (`-host xca`,
//! `-port=5825`, `-version`); [`normalize_args`] rewrites those before
//! parsing.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};

const ENV_HELP: &str = "\
All options that take a value can be set via environment variables:
  XCAHOST           -->  --host
  XCAPORT           -->  --port
  XCATIMEOUT        -->  --timeout
  XCAUSERID         -->  --userid
  XCASECRET         -->  --secret
  XCACACERT         -->  --ca-cert

Environment variables can also be configured via a file called .xcaenv,
located in the current directory or in the home directory of the current
user (~/.xmcenv is read as well). Variables already present in the
environment are never overridden by a file.";

/// bssid-lister -- list access point BSSIDs and SSIDs from an ExtremeCloud Appliance
#[derive(Parser)]
#[command(
    name = "bssid-lister",
    version,
    about = "List access points and their (B)SSIDs from an ExtremeCloud Appliance as CSV",
    long_about = "Queries the XCA REST API, fetches the list of access points and the\n\
        BSSID/SSID pairs served by each radio, and prints them as CSV to stdout.",
    after_help = ENV_HELP
)]
pub struct Cli {
    /// XCA hostname or IP
    #[arg(long, env = "XCAHOST", default_value = "")]
    pub host: String,

    /// HTTP port where XCA is listening
    #[arg(long, env = "XCAPORT", default_value_t = 5825)]
    pub port: u16,

    /// Timeout for HTTP(S) connections, in seconds
    #[arg(
        long,
        env = "XCATIMEOUT",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Client ID for authentication
    #[arg(long, env = "XCAUSERID", default_value = "")]
    pub userid: String,

    /// Client secret for authentication
    #[arg(
        long,
        env = "XCASECRET",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub secret: String,

    /// Verify the appliance certificate against this PEM CA file
    #[arg(long, env = "XCACACERT", value_name = "PEM", conflicts_with = "verify_tls")]
    pub ca_cert: Option<PathBuf>,

    /// Verify the appliance certificate against the system trust store
    /// (by default any certificate is accepted)
    #[arg(long)]
    pub verify_tls: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .field("userid", &self.userid)
            .field("secret", &"[REDACTED]")
            .field("ca_cert", &self.ca_cert)
            .field("verify_tls", &self.verify_tls)
            .field("verbose", &self.verbose)
            .finish()
    }
}

/// Rewrite single-dash long flags (`-host`, `-port=443`) to their `--` form.
///
/// Only names of long flags are rewritten; short flags and clusters such as
/// `-vv` or `-V` pass through, as does everything after a `--` terminator.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Cli::command();
    let long_names: Vec<&str> = command
        .get_arguments()
        .filter_map(clap::Arg::get_long)
        .chain(["help", "version"])
        .collect();

    let mut terminated = false;
    args.into_iter()
        .map(Into::<OsString>::into)
        .map(|arg| {
            if terminated {
                return arg;
            }
            if arg == "--" {
                terminated = true;
                return arg;
            }
            let rewritten = arg.to_str().and_then(|s| {
                let rest = s.strip_prefix('-').filter(|r| !r.starts_with('-'))?;
                let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                long_names.contains(&name).then(|| format!("-{s}"))
            });
            rewritten.map_or(arg, OsString::from)
        })
        .collect()
}
