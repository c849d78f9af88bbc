mod cli;
mod config;
mod error;
mod output;

use std::io::{self, Write};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use xca_api::{RestClient, fetch_inventory};

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::error::{CliError, exit_code};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Env files feed clap's `env` fallbacks, so they go in before parsing.
    let env_files = config::load_env_files(&config::default_env_file_sources());

    let cli = match Cli::try_parse_from(cli::normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                exit_code::USAGE
            } else {
                exit_code::SUCCESS
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose);
    config::log_env_files(&env_files);

    let verbose = cli.verbose;
    if let Err(err) = run(&cli).await {
        let code = err.exit_code();
        if verbose > 0 {
            eprintln!("{:?}", miette::Report::new(err));
        } else {
            eprintln!("{err}");
        }
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout carries the CSV; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = AppConfig::from_cli(cli);

    let mut client = RestClient::new(&config.host, config.port, &config.transport())
        .map_err(|source| CliError::Setup { source })?;

    let mut stdout = io::BufWriter::new(io::stdout());
    list_bssids(&mut client, &config, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}

/// Authenticate, fetch the inventory once, write it once.
///
/// Each phase runs only after the previous one succeeded; the first failure
/// ends the run and nothing has been written to `out` at that point.
async fn list_bssids<W: Write>(
    client: &mut RestClient,
    config: &AppConfig,
    out: &mut W,
) -> Result<(), CliError> {
    debug!(origin = client.origin(), user = %config.user_id, "authenticating");
    client
        .authenticate(&config.user_id, &config.secret)
        .await
        .map_err(|source| CliError::AuthFailed {
            host: config.host.clone(),
            port: config.port,
            source,
        })?;

    debug!("fetching access point inventory");
    let inventory = fetch_inventory(client).await.map_err(CliError::api_call)?;

    output::write_csv(out, &inventory)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn appliance(inventory: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/management/v1/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-abc",
                "token_type": "Bearer"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/management/v1/aps"))
            .respond_with(inventory)
            .mount(&server)
            .await;
        server
    }

    fn inventory_response(status: u16, body: &str) -> ResponseTemplate {
        ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), "application/json")
    }

    async fn list(server: &MockServer) -> (Result<(), CliError>, String) {
        let cli = Cli::try_parse_from(["bssid-lister", "--userid", "api", "--secret", "s3cret"])
            .unwrap();
        let config = AppConfig::from_cli(&cli);
        let mut client = RestClient::with_origin(server.uri(), &config.transport()).unwrap();

        let mut out: Vec<u8> = Vec::new();
        let result = list_bssids(&mut client, &config, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn inventory_is_written_as_csv() {
        let server = appliance(inventory_response(
            200,
            r#"[{"serialNumber":"AP1","radios":[{"radioIndex":0,"wlan":[{"bssid":"AA:BB:CC:00:11:22","ssid":"Corp"}]}]}]"#,
        ))
        .await;

        let (result, out) = list(&server).await;

        assert!(result.is_ok(), "got: {result:?}");
        assert_eq!(
            out,
            "\"serial\",\"radio\",\"bssid\",\"ssid\"\n\
             \"AP1\",\"0\",\"AA:BB:CC:00:11:22\",\"Corp\"\n"
        );
    }

    #[tokio::test]
    async fn malformed_inventory_writes_nothing() {
        let server = appliance(inventory_response(200, "[{")).await;

        let (result, out) = list(&server).await;

        let err = result.unwrap_err();
        assert!(
            matches!(
                err,
                CliError::ApiCall {
                    source: xca_api::Error::Deserialization { .. },
                    ..
                }
            ),
            "got: {err:?}"
        );
        assert_eq!(err.exit_code(), exit_code::API_CALL);
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn missing_endpoint_is_an_api_call_failure() {
        let server = appliance(inventory_response(404, "{}")).await;

        let (result, out) = list(&server).await;

        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), exit_code::API_CALL);
        assert_eq!(
            err.to_string(),
            "Could not obtain AP list: got status code 404 instead of 200"
        );
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn rejected_credentials_stop_before_the_inventory_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/management/v1/oauth2/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/management/v1/aps"))
            .respond_with(inventory_response(200, "[]"))
            .expect(0)
            .mount(&server)
            .await;

        let (result, out) = list(&server).await;

        assert_eq!(result.unwrap_err().exit_code(), exit_code::AUTH);
        assert_eq!(out, "");
    }
}
