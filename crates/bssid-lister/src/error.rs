//! CLI error types with miette diagnostics.
//!
//! Each variant belongs to one phase of a run and carries that phase's exit
//! code. All query-stage failures from `xca_api` share a single code and are
//! told apart only by their message.

use miette::Diagnostic;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    /// Bad arguments, unusable TLS setup, or failure writing the output.
    pub const USAGE: i32 = 1;
    pub const AUTH: i32 = 10;
    pub const API_CALL: i32 = 11;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Setup ────────────────────────────────────────────────────────

    #[error("Could not set up HTTP(S) client: {source}")]
    #[diagnostic(
        code(bssid_lister::setup),
        help("Check the file given with --ca-cert (XCACACERT).")
    )]
    Setup {
        #[source]
        source: xca_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Could not authenticate: {source}")]
    #[diagnostic(
        code(bssid_lister::auth_failed),
        help(
            "Verify --userid and --secret (XCAUSERID / XCASECRET) and that the\n\
             appliance is reachable at {host}:{port}."
        )
    )]
    AuthFailed {
        host: String,
        port: u16,
        #[source]
        source: xca_api::Error,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Could not obtain AP list: {source}")]
    #[diagnostic(code(bssid_lister::api_call))]
    ApiCall {
        #[source]
        source: xca_api::Error,
        #[help]
        help: Option<String>,
    },

    // ── IO ───────────────────────────────────────────────────────────

    #[error("Could not write output: {0}")]
    #[diagnostic(code(bssid_lister::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Wrap a failure from the inventory query, with a hint where one helps.
    pub fn api_call(source: xca_api::Error) -> Self {
        let help = match &source {
            e if e.is_timeout() => {
                Some("Increase the timeout with --timeout or check the appliance's load.".into())
            }
            xca_api::Error::UnexpectedStatus { actual: 401 | 403, .. } => {
                Some("The account may lack permission to read the access point inventory.".into())
            }
            xca_api::Error::RequestConstruction { .. } => {
                Some("Check the value given with --host (XCAHOST).".into())
            }
            _ => None,
        };
        Self::ApiCall { source, help }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ApiCall { .. } => exit_code::API_CALL,
            Self::Setup { .. } | Self::Io(_) => exit_code::USAGE,
        }
    }
}
