//! # solrack-client
//!
//! Client library for the local HTTP management API of residential PV
//! inverters.
//!
//! The interesting part is authentication: the inverter runs a
//! SCRAM-SHA-256-style challenge–response handshake and then expects the
//! issued bearer token back wrapped under AES-256-GCM, answering with a
//! long-lived session id. [`InverterClient::login`] drives the whole
//! exchange; afterwards the processdata and settings endpoints (and the
//! generic [`InverterClient::authorized_request`]) ride the session.
//!
//! ```no_run
//! use solrack_client::{ClientConfig, InverterClient};
//!
//! # async fn run() -> solrack_client::Result<()> {
//! let mut client =
//!     InverterClient::with_config(ClientConfig::new("http", "192.168.1.50", "secret"))?;
//! client.login().await?;
//! let modules = client.process_data().await?;
//! client.logout().await?;
//! # Ok(())
//! # }
//! ```
//!
//! The client never logs or exposes the password or any derived key, and
//! scrubs handshake secrets from memory as soon as each step completes.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

mod codec;
mod config;
mod error;
mod handshake;
mod processdata;
mod session;
mod settings;
mod transport;

pub use config::{ClientConfig, Scheme};
pub use error::{ClientError, Result};
pub use processdata::{ProcessDataIds, ProcessDataValue, ProcessDataValues};
pub use session::InverterClient;
pub use settings::{SettingData, SettingsData, SettingsValue};

// The data-endpoint layer and CLI pass methods through.
pub use reqwest::Method;
