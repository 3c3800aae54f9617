mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{me, processdata, settings, ConnectionArgs};

/// Talk to the local management API of a residential PV inverter.
#[derive(Parser, Debug)]
#[command(name = "solrack")]
#[command(version)]
#[command(about = "Read live values and settings from a PV inverter", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show information about the logged-in user
    Me,

    /// Read live measurement values
    #[command(subcommand)]
    Processdata(processdata::ProcessdataCommand),

    /// Read device settings
    #[command(subcommand)]
    Settings(settings::SettingsCommand),
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Me => me::show(&cli.connection).await,
        Commands::Processdata(cmd) => processdata::run(&cli.connection, cmd).await,
        Commands::Settings(cmd) => settings::run(&cli.connection, cmd).await,
    }
}

#[tokio::main]
async fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("An error occurred: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_processdata_get() {
        let cli = Cli::try_parse_from([
            "solrack",
            "--server",
            "192.168.1.50",
            "--password",
            "secret",
            "processdata",
            "get",
            "devices:local",
            "Dc_P",
            "Grid_P",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Processdata(processdata::ProcessdataCommand::Get { .. })
        ));
    }

    #[test]
    fn test_csv_flag_with_delimiter() {
        let cli = Cli::try_parse_from([
            "solrack",
            "-s",
            "inverter.local",
            "-p",
            "secret",
            "settings",
            "module",
            "devices:local",
            "--csv",
            "-d",
            ";",
        ])
        .unwrap();
        match cli.command {
            Commands::Settings(settings::SettingsCommand::Module { output, .. }) => {
                assert!(output.csv);
                assert_eq!(output.delimiter, ";");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
