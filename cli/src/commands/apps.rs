//! `riser apps`

use anyhow::{bail, Context as _};
use riser_api_models::NewApp;

use crate::commands::{api_client, CliArgs, DEFAULT_NAMESPACE};
use crate::storage::settings::Settings;
use crate::ui::resource_view::render_apps;
use crate::ui::{render_json, OutputFormat};

pub async fn apps(args: &CliArgs, settings: &Settings) -> anyhow::Result<()> {
    let subcommand = args.positional.get(1).map(String::as_str).unwrap_or("list");
    let client = api_client(settings)?;

    match subcommand {
        "list" => {
            let output = args.output_format()?;
            let apps = client.list_apps().await.context("Error listing apps")?;
            let rendered = match output {
                OutputFormat::Json => render_json(&apps)?,
                OutputFormat::Human => render_apps(&apps),
            };
            print!("{}", rendered);
        }
        "new" => {
            let new_app = NewApp {
                name: args.arg(2, "app name")?.to_string(),
                namespace: args.flag("namespace").unwrap_or(DEFAULT_NAMESPACE).to_string(),
            };
            let app = client.create_app(&new_app).await.context("Error creating app")?;
            println!(
                "App {} created in namespace {}. Add the following id to your app file: {}",
                app.name, app.namespace, app.id
            );
        }
        other => bail!("Unknown apps command {:?}", other),
    }

    Ok(())
}
