// XCA REST session client
//
// Wraps `reqwest::Client` with the appliance's `/management/` URL layout and
// the OAuth2 password-grant token flow. Endpoint queries (see `inventory`)
// go through `build_request` + `perform` so this module stays focused on
// transport mechanics.

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Path segment every REST endpoint lives under.
const API_ROOT: &str = "management";

/// OAuth2 token endpoint, relative to [`API_ROOT`].
const TOKEN_PATH: &str = "v1/oauth2/token";

pub(crate) const JSON_MIME_TYPE: &str = "application/json";

/// Token endpoint response. Only `access_token` is required.
#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Authenticated HTTP session against an ExtremeCloud Appliance.
///
/// Holds the HTTP client (TLS, timeout, user agent), the appliance origin
/// and, once [`authenticate`](Self::authenticate) succeeded, the bearer
/// token attached to every request built afterwards.
pub struct RestClient {
    http: reqwest::Client,
    origin: String,
    access_token: Option<SecretString>,
}

impl RestClient {
    /// Create a client for `https://{host}:{port}`.
    ///
    /// The host is not validated here; a malformed host surfaces as
    /// [`Error::RequestConstruction`] when the first request is built.
    pub fn new(host: &str, port: u16, transport: &TransportConfig) -> Result<Self, Error> {
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        Self::with_origin(format!("https://{host}:{port}"), transport)
    }

    /// Create a client for an explicit `scheme://host[:port]` origin.
    pub fn with_origin(
        origin: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, origin))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, origin: impl Into<String>) -> Self {
        Self {
            http,
            origin: origin.into(),
            access_token: None,
        }
    }

    /// The appliance origin requests are sent to.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Whether a bearer token has been obtained.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Obtain a bearer token with the OAuth2 password grant.
    ///
    /// `POST /management/v1/oauth2/token` with
    /// `{"grantType": "password", "userId": ..., "password": ...}`.
    /// Anything other than `200 OK` with a non-empty `access_token` is an
    /// [`Error::Authentication`].
    pub async fn authenticate(
        &mut self,
        user_id: &str,
        secret: &SecretString,
    ) -> Result<(), Error> {
        let url = self.endpoint_url(TOKEN_PATH)?;
        debug!("requesting access token at {}", url);

        let body = json!({
            "grantType": "password",
            "userId": user_id,
            "password": secret.expose_secret(),
        });

        let resp = self
            .http
            .post(url)
            .header(ACCEPT, JSON_MIME_TYPE)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!(
                    "got status code {} instead of {}: {}",
                    status.as_u16(),
                    StatusCode::OK.as_u16(),
                    body.trim()
                ),
            });
        }

        let token: TokenResponse = resp.json().await.map_err(|e| Error::Authentication {
            message: format!("unreadable token response: {e}"),
        })?;

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| Error::Authentication {
                message: "token response carried no access_token".into(),
            })?;

        debug!(
            token_type = token.token_type.as_deref().unwrap_or("unknown"),
            expires_in = token.expires_in,
            "authenticated"
        );
        self.access_token = Some(access_token);
        Ok(())
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Build a GET request for `/management/{path}` with the given query pairs.
    ///
    /// Sets `Accept: application/json` and, when authenticated, the
    /// `Authorization: Bearer` header.
    pub fn build_request(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Request, Error> {
        let mut url = self.endpoint_url(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut builder = self.http.get(url).header(ACCEPT, JSON_MIME_TYPE);
        if let Some(ref token) = self.access_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        builder.build().map_err(|e| Error::RequestConstruction {
            message: e.to_string(),
        })
    }

    /// Send a previously built request.
    pub async fn perform(&self, request: reqwest::Request) -> Result<reqwest::Response, Error> {
        debug!("{} {}", request.method(), request.url());
        self.http.execute(request).await.map_err(Error::Transport)
    }

    /// Resolve `{origin}/management/{path}`.
    fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/{API_ROOT}/{}",
            self.origin.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&full).map_err(|e| Error::RequestConstruction {
            message: format!("invalid URL {full}: {e}"),
        })
    }
}
