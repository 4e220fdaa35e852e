//! `riser namespaces` and `riser environments`

use anyhow::{bail, Context as _};

use crate::commands::{api_client, CliArgs};
use crate::storage::settings::Settings;
use crate::ui::resource_view::{render_environments, render_namespaces};
use crate::ui::{render_json, OutputFormat};

pub async fn namespaces(args: &CliArgs, settings: &Settings) -> anyhow::Result<()> {
    let subcommand = args.positional.get(1).map(String::as_str).unwrap_or("list");
    let client = api_client(settings)?;

    match subcommand {
        "create" => {
            let name = args.arg(2, "namespace name")?;
            client
                .create_namespace(name)
                .await
                .context("Error creating namespace")?;
            println!("Namespace {:?} created", name);
        }
        "list" => {
            let output = args.output_format()?;
            let namespaces = client
                .list_namespaces()
                .await
                .context("Error listing namespaces")?;
            let rendered = match output {
                OutputFormat::Json => render_json(&namespaces)?,
                OutputFormat::Human => render_namespaces(&namespaces),
            };
            print!("{}", rendered);
        }
        other => bail!("Unknown namespaces command {:?}", other),
    }

    Ok(())
}

pub async fn environments(args: &CliArgs, settings: &Settings) -> anyhow::Result<()> {
    match args.positional.get(1).map(String::as_str).unwrap_or("list") {
        "list" => {
            let output = args.output_format()?;
            let client = api_client(settings)?;
            let environments = client
                .list_environments()
                .await
                .context("Error listing environments")?;
            let rendered = match output {
                OutputFormat::Json => render_json(&environments)?,
                OutputFormat::Human => render_environments(&environments),
            };
            print!("{}", rendered);
            Ok(())
        }
        other => bail!("Unknown environments command {:?}", other),
    }
}
