//! `riser status` and `riser describe`

use riser_api_models::App;

use crate::commands::{api_client, resolve_app, CliArgs};
use crate::errors::CliError;
use crate::storage::settings::Settings;
use crate::ui::status_view::{render_describe, render_status};
use crate::ui::{render_json, OutputFormat};

pub const DEFAULT_EXTERNAL_HOST: &str = "demo.riser";

pub async fn status(args: &CliArgs, settings: &Settings) -> Result<(), CliError> {
    let app = resolve_app(args).await?;
    let output = args.output_format()?;
    let client = api_client(settings)?;

    let status = client.get_app_status(&app.name, &app.namespace).await?;

    let rendered = match output {
        OutputFormat::Json => render_json(&status)?,
        OutputFormat::Human => render_status(&app.name, &status, args.has_flag("all")),
    };
    print!("{}", rendered);
    Ok(())
}

pub async fn describe(args: &CliArgs, settings: &Settings) -> Result<(), CliError> {
    let deployment_name = args.arg(1, "deployment")?;
    let environment_name = args.arg(2, "environment")?;
    let app_ref = resolve_app(args).await?;
    let client = api_client(settings)?;

    let app: App = client.get_app(&app_ref.name, &app_ref.namespace).await?;
    let status = client.get_app_status(&app_ref.name, &app_ref.namespace).await?;

    let external_host = args.flag("external-host").unwrap_or(DEFAULT_EXTERNAL_HOST);
    let rendered = render_describe(&app, &status, deployment_name, environment_name, external_host)?;
    print!("{}", rendered);
    Ok(())
}
