//! `riser deployments`

use anyhow::{bail, Context as _};

use crate::commands::{api_client, confirm, resolve_namespace, CliArgs};
use crate::storage::settings::Settings;

pub async fn deployments(args: &CliArgs, settings: &Settings) -> anyhow::Result<()> {
    match args.positional.get(1).map(String::as_str) {
        Some("delete") => delete(args, settings).await,
        Some(other) => bail!("Unknown deployments command {:?}", other),
        None => bail!("Missing deployments command. Available: delete"),
    }
}

async fn delete(args: &CliArgs, settings: &Settings) -> anyhow::Result<()> {
    let deployment_name = args.arg(2, "deployment")?;
    let environment_name = args.arg(3, "environment")?;
    let namespace = resolve_namespace(args).await;

    if !args.has_flag("no-prompt") {
        let question = format!(
            "Are you sure you wish to delete the deployment {:?} in environment {:?}?",
            deployment_name, environment_name
        );
        if !confirm(&question).await? {
            return Ok(());
        }
    }

    let client = api_client(settings)?;
    let result = client
        .delete_deployment(deployment_name, &namespace, environment_name)
        .await
        .context("Error deleting deployment")?;
    println!("{}", result.message);
    Ok(())
}
