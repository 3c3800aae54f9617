/*!
 * Command implementations
 */

pub mod me;
pub mod processdata;
pub mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use solrack_client::{ClientConfig, InverterClient};

/// Connection flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// IP address or FQDN of the inverter
    #[arg(short, long)]
    pub server: String,

    /// Password of the plant-owner account; prompted for when omitted
    #[arg(short, long)]
    pub password: Option<String>,

    /// Read the password from a file instead
    #[arg(long, value_name = "FILE", conflicts_with = "password")]
    pub password_file: Option<PathBuf>,

    /// URL scheme; only the exact value "https" enables TLS
    #[arg(long, default_value = "http")]
    pub scheme: String,
}

/// Output format flags for value-printing subcommands.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Set output to CSV format
    #[arg(short, long)]
    pub csv: bool,

    /// Set CSV delimiter
    #[arg(short, long, default_value = ",")]
    pub delimiter: String,
}

impl ConnectionArgs {
    fn resolve_password(&self) -> Result<String> {
        if let Some(password) = &self.password {
            return Ok(password.clone());
        }
        if let Some(path) = &self.password_file {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("could not read password file {}", path.display()))?;
            return Ok(contents.trim_end_matches(['\r', '\n']).to_string());
        }
        rpassword::prompt_password("Inverter password: ").context("could not read password")
    }
}

/// Build a client from the connection flags and log in.
pub async fn connect(args: &ConnectionArgs) -> Result<InverterClient> {
    let password = args.resolve_password()?;
    let mut client = InverterClient::with_config(ClientConfig::new(
        &args.scheme,
        args.server.clone(),
        password,
    ))?;
    client.login().await?;
    Ok(client)
}

/// End the session. Failures are logged, not propagated: the command's own
/// result is what the user cares about at this point.
pub async fn disconnect(client: &mut InverterClient) {
    if let Err(err) = client.logout().await {
        warn!(%err, "logout failed");
    }
}
