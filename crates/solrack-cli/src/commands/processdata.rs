/*!
 * `processdata` commands: live measurement values
 */

use anyhow::{bail, Result};
use clap::Subcommand;

use solrack_client::{InverterClient, ProcessDataIds};

use super::{connect, disconnect, ConnectionArgs, OutputArgs};
use crate::output;

#[derive(Subcommand, Debug)]
pub enum ProcessdataCommand {
    /// List all available modules and processdata identifiers
    List,

    /// Get one module with one or more of its processdata values
    Get {
        /// Module id, e.g. devices:local
        module_id: String,
        /// One or more processdata ids
        #[arg(required = true)]
        processdata_ids: Vec<String>,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Get one or more modules with their processdata values.
    ///
    /// Accepts either "moduleid|pdid1,pdid2" arguments (one per module) or
    /// a single module id followed by a comma-separated list of ids.
    Mult {
        #[arg(required = true)]
        args: Vec<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

pub async fn run(conn: &ConnectionArgs, cmd: ProcessdataCommand) -> Result<()> {
    // Parse before logging in; bad arguments should not cost a session.
    let batch = match &cmd {
        ProcessdataCommand::Mult { args, .. } => Some(parse_mult_args(args)?),
        _ => None,
    };

    let mut client = connect(conn).await?;
    let result = match &cmd {
        ProcessdataCommand::List => list(&client).await,
        ProcessdataCommand::Get {
            module_id,
            processdata_ids,
            output,
        } => get(&client, module_id, processdata_ids, output).await,
        ProcessdataCommand::Mult { output, .. } => {
            mult(&client, &batch.unwrap_or_default(), output).await
        }
    };
    disconnect(&mut client).await;
    result
}

async fn list(client: &InverterClient) -> Result<()> {
    let modules = client.process_data().await?;
    for module in &modules {
        println!("ModuleId: {}", module.module_id);
        if module.processdata_ids.is_empty() {
            println!("No ProcessDataId found.");
        } else {
            println!("ProcessDataIds:");
            for id in &module.processdata_ids {
                println!("\t{id}");
            }
        }
    }
    Ok(())
}

async fn get(
    client: &InverterClient,
    module_id: &str,
    processdata_ids: &[String],
    output: &OutputArgs,
) -> Result<()> {
    let values = client
        .process_data_module_values(module_id, processdata_ids)
        .await?;
    output::print_process_data(&values, output);
    Ok(())
}

async fn mult(
    client: &InverterClient,
    batch: &[ProcessDataIds],
    output: &OutputArgs,
) -> Result<()> {
    let values = client.process_data_values(batch).await?;
    output::print_process_data(&values, output);
    Ok(())
}

/// Parse `mult` arguments into a batched request.
fn parse_mult_args(args: &[String]) -> Result<Vec<ProcessDataIds>> {
    if args[0].contains('|') {
        // One "moduleid|pdid1,pdid2" argument per module.
        let mut batch = Vec::with_capacity(args.len());
        for arg in args {
            let Some((module_id, ids)) = arg.split_once('|') else {
                bail!("wrong format of moduleid and processdataid values: {arg}");
            };
            if module_id.is_empty() || ids.is_empty() {
                bail!("wrong format of moduleid and processdataid values: {arg}");
            }
            batch.push(ProcessDataIds {
                module_id: module_id.to_string(),
                processdata_ids: ids.split(',').map(str::to_string).collect(),
            });
        }
        Ok(batch)
    } else if args.len() == 2 {
        // Module id and its processdata ids submitted separately.
        if args[0].contains(',') {
            bail!("please enter only one moduleid");
        }
        Ok(vec![ProcessDataIds {
            module_id: args[0].clone(),
            processdata_ids: args[1].split(',').map(str::to_string).collect(),
        }])
    } else {
        bail!("please submit module and processdata ids in an appropriate format");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_mult_piped_form() {
        let batch =
            parse_mult_args(&strings(&["devices:local|Dc_P,Grid_P", "scb:statistic|Yield"]))
                .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].module_id, "devices:local");
        assert_eq!(batch[0].processdata_ids, vec!["Dc_P", "Grid_P"]);
        assert_eq!(batch[1].processdata_ids, vec!["Yield"]);
    }

    #[test]
    fn test_parse_mult_separate_form() {
        let batch = parse_mult_args(&strings(&["devices:local", "Dc_P,Grid_P"])).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].processdata_ids, vec!["Dc_P", "Grid_P"]);
    }

    #[test]
    fn test_parse_mult_rejects_multiple_modules_in_separate_form() {
        assert!(parse_mult_args(&strings(&["a,b", "Dc_P"])).is_err());
    }

    #[test]
    fn test_parse_mult_rejects_malformed_pipe() {
        assert!(parse_mult_args(&strings(&["devices:local|"])).is_err());
    }

    #[test]
    fn test_parse_mult_rejects_wrong_arity() {
        assert!(parse_mult_args(&strings(&["devices:local"])).is_err());
        assert!(parse_mult_args(&strings(&["a", "b", "c"])).is_err());
    }
}
