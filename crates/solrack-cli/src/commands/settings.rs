/*!
 * `settings` commands: device configuration values
 */

use anyhow::Result;
use clap::Subcommand;

use solrack_client::InverterClient;

use super::{connect, disconnect, ConnectionArgs, OutputArgs};
use crate::output;

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// List all modules with their settings identifiers
    List,

    /// Get all setting values of a module
    Module {
        /// Module id, e.g. devices:local
        module_id: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Get a single setting value
    Setting {
        module_id: String,
        setting_id: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Get selected setting values (comma-separated list of ids)
    Settings {
        module_id: String,
        setting_ids: String,
        #[command(flatten)]
        output: OutputArgs,
    },
}

pub async fn run(conn: &ConnectionArgs, cmd: SettingsCommand) -> Result<()> {
    let mut client = connect(conn).await?;
    let result = match &cmd {
        SettingsCommand::List => list(&client).await,
        SettingsCommand::Module { module_id, output } => {
            values(&client, module_id, None, output).await
        }
        SettingsCommand::Setting {
            module_id,
            setting_id,
            output,
        } => values(&client, module_id, Some(vec![setting_id.clone()]), output).await,
        SettingsCommand::Settings {
            module_id,
            setting_ids,
            output,
        } => {
            let ids = setting_ids.split(',').map(str::to_string).collect();
            values(&client, module_id, Some(ids), output).await
        }
    };
    disconnect(&mut client).await;
    result
}

async fn list(client: &InverterClient) -> Result<()> {
    let catalog = client.settings().await?;
    for module in &catalog {
        println!("{}", module.module_id);
        for setting in &module.settings {
            println!("\t{}", setting.id);
        }
    }
    Ok(())
}

async fn values(
    client: &InverterClient,
    module_id: &str,
    setting_ids: Option<Vec<String>>,
    output: &OutputArgs,
) -> Result<()> {
    let values = match setting_ids {
        Some(ids) => client.settings_module_settings(module_id, &ids).await?,
        None => client.settings_module(module_id).await?,
    };
    output::print_setting_values(&values, output);
    Ok(())
}
