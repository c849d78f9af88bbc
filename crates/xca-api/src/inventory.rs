// Access point inventory
//
// `GET /management/v1/aps?inventory=true` returns every access point with its
// radios and the WLANs (BSSID/SSID pairs) each radio serves. Field presence
// varies between appliance releases, so every field falls back to its zero
// value when it is missing or `null`.

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::client::{JSON_MIME_TYPE, RestClient};
use crate::error::Error;

// ── Query ────────────────────────────────────────────────────────────

/// The inventory listing request: `v1/aps` with `inventory=true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryQuery;

impl InventoryQuery {
    pub const PATH: &'static str = "v1/aps";
    pub const PARAMS: &'static [(&'static str, &'static str)] = &[("inventory", "true")];
}

// ── Models ───────────────────────────────────────────────────────────

/// One access point as reported by the appliance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPoint {
    #[serde(default, deserialize_with = "null_as_default")]
    pub serial_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub can_edit: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub can_delete: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub proxied: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub radios: Vec<Radio>,
}

/// A radio interface, indexed per access point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Radio {
    #[serde(default, deserialize_with = "null_as_default")]
    pub radio_index: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wlan: Vec<WlanEntry>,
}

/// A BSSID and the SSID broadcast on it. Neither value is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WlanEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bssid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ssid: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Fetch ────────────────────────────────────────────────────────────

/// Fetch the access point inventory.
///
/// The response must be `200 OK` with a `Content-Type` starting with
/// `application/json`; the body is then read in full and decoded. The
/// response is dropped on every early return, which releases its body.
pub async fn fetch_inventory(client: &RestClient) -> Result<Vec<AccessPoint>, Error> {
    let request = client.build_request(InventoryQuery::PATH, InventoryQuery::PARAMS)?;
    let resp = client.perform(request).await?;

    check_status(resp.status())?;
    check_content_type(resp.headers().get(CONTENT_TYPE))?;

    let body = resp.bytes().await.map_err(Error::BodyRead)?;
    let inventory = decode(&body)?;
    debug!(access_points = inventory.len(), "inventory received");
    Ok(inventory)
}

fn check_status(status: StatusCode) -> Result<(), Error> {
    if status == StatusCode::OK {
        return Ok(());
    }
    Err(Error::UnexpectedStatus {
        actual: status.as_u16(),
        expected: StatusCode::OK.as_u16(),
    })
}

fn check_content_type(value: Option<&HeaderValue>) -> Result<(), Error> {
    let actual = value
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();
    if actual.starts_with(JSON_MIME_TYPE) {
        return Ok(());
    }
    Err(Error::UnexpectedContentType {
        actual,
        expected: JSON_MIME_TYPE,
    })
}

/// Decode a response body. A JSON `null` is an empty inventory.
fn decode(body: &[u8]) -> Result<Vec<AccessPoint>, Error> {
    serde_json::from_slice::<Option<Vec<AccessPoint>>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
        })
}

// ── Flattening ───────────────────────────────────────────────────────

/// One WLAN leaf together with the identifiers of its radio and access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WlanRow<'a> {
    pub serial_number: &'a str,
    pub radio_index: u32,
    pub bssid: &'a str,
    pub ssid: &'a str,
}

/// Flatten the inventory into one row per WLAN entry.
///
/// Depth-first in input order: access points, then their radios, then
/// each radio's WLANs. Access points without radios and radios without
/// WLANs yield nothing.
pub fn rows(inventory: &[AccessPoint]) -> impl Iterator<Item = WlanRow<'_>> {
    inventory.iter().flat_map(|ap| {
        ap.radios.iter().flat_map(move |radio| {
            radio.wlan.iter().map(move |wlan| WlanRow {
                serial_number: &ap.serial_number,
                radio_index: radio.radio_index,
                bssid: &wlan.bssid,
                ssid: &wlan.ssid,
            })
        })
    })
}
