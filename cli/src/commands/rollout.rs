//! `riser rollout`

use crate::commands::{api_client, resolve_app, CliArgs};
use crate::errors::CliError;
use crate::storage::settings::Settings;

pub async fn rollout(args: &CliArgs, settings: &Settings) -> Result<(), CliError> {
    let environment_name = args.arg(1, "environment")?;
    let rules = &args.positional[2..];
    if rules.is_empty() {
        return Err(CliError::ValidationError(
            "At least one traffic rule is required, e.g. \"riser rollout prod 1:90 2:10\"".to_string(),
        ));
    }

    let app = resolve_app(args).await?;
    let deployment_name = args.flag("name").unwrap_or(&app.name);
    let client = api_client(settings)?;

    client
        .save_rollout(deployment_name, &app.namespace, environment_name, rules)
        .await?;
    println!("Rollout requested");
    Ok(())
}
