//! `riser secrets`

use anyhow::{bail, Context as _};
use riser_api_models::SecretMeta;

use crate::commands::{api_client, resolve_app, CliArgs};
use crate::storage::settings::Settings;
use crate::ui::resource_view::render_secrets;
use crate::ui::{render_json, OutputFormat};

pub async fn secrets(args: &CliArgs, settings: &Settings) -> anyhow::Result<()> {
    match args.positional.get(1).map(String::as_str) {
        Some("save") => save(args, settings).await,
        Some("list") => list(args, settings).await,
        Some(other) => bail!("Unknown secrets command {:?}", other),
        None => bail!("Missing secrets command. Available: save, list"),
    }
}

async fn save(args: &CliArgs, settings: &Settings) -> anyhow::Result<()> {
    let environment_name = args.arg(2, "environment")?;
    let secret_name = args.arg(3, "name")?;
    let plain_text = args.arg(4, "plaintextsecret")?;
    let app = resolve_app(args).await?;
    let client = api_client(settings)?;

    let meta = SecretMeta {
        app_name: app.name.clone(),
        namespace: app.namespace,
        environment: environment_name.to_string(),
        name: secret_name.to_string(),
    };
    client
        .save_secret(meta, plain_text)
        .await
        .context("Error saving secret")?;

    println!(
        "Secret {:?} saved. New values take effect the next time {:?} in environment {:?} is deployed",
        secret_name, app.name, environment_name
    );
    Ok(())
}

async fn list(args: &CliArgs, settings: &Settings) -> anyhow::Result<()> {
    let environment_name = args.arg(2, "environment")?;
    let output = args.output_format()?;
    let app = resolve_app(args).await?;
    let client = api_client(settings)?;

    let secrets = client
        .list_secrets(&app.name, &app.namespace, environment_name)
        .await
        .context("Error listing secrets")?;

    let rendered = match output {
        OutputFormat::Json => render_json(&secrets)?,
        OutputFormat::Human => render_secrets(&secrets),
    };
    print!("{}", rendered);
    Ok(())
}
