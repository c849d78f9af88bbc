// xca-api: Async Rust client for the ExtremeCloud Appliance REST API

pub mod client;
pub mod error;
pub mod inventory;
pub mod transport;

pub use client::RestClient;
pub use error::Error;
pub use inventory::{AccessPoint, InventoryQuery, Radio, WlanEntry, WlanRow, fetch_inventory, rows};
pub use transport::{TlsMode, TransportConfig};
