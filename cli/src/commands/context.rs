//! `riser context`

use std::sync::Arc;

use anyhow::{bail, Context as _};
use secrecy::SecretString;

use crate::commands::CliArgs;
use crate::notify::Notifier;
use crate::storage::layout::StorageLayout;
use crate::storage::settings::{Context, Settings};
use crate::ui::table::{Cell, Table};

pub async fn context(
    args: &CliArgs,
    layout: &StorageLayout,
    mut settings: Settings,
    notifier: Arc<dyn Notifier>,
) -> anyhow::Result<()> {
    let subcommand = args.positional.get(1).map(String::as_str).unwrap_or("list");

    match subcommand {
        "save" => {
            let name = args.arg(2, "contextName")?;
            let server_url = args
                .flag("server-url")
                .context("--server-url is required")?;
            url::Url::parse(server_url).context("--server-url must be a valid URL")?;
            let apikey = args.flag("apikey").context("--apikey is required")?;

            settings.save_context(Context {
                name: name.to_string(),
                server_url: server_url.to_string(),
                apikey: SecretString::from(apikey.to_string()),
                secure: args.flag("secure") != Some("false"),
            });
            layout
                .save_settings(&settings)
                .await
                .context("Error saving settings")?;
            notifier.info(&format!("Context {:?} saved and set as current", name));
        }
        "current" => match args.positional.get(2) {
            Some(name) => {
                settings.set_current_context(name)?;
                layout
                    .save_settings(&settings)
                    .await
                    .context("Error saving settings")?;
                notifier.info(&format!("Current context set to {:?}", name));
            }
            None => {
                let current = settings.current_context()?;
                println!("{}", current.name);
            }
        },
        "remove" => {
            let name = args.arg(2, "contextName")?;
            settings.remove_context(name).context("Error removing context")?;
            layout
                .save_settings(&settings)
                .await
                .context("Error saving settings")?;
            notifier.info(&format!("Context {:?} removed", name));
        }
        "list" => {
            print!("{}", render_contexts(&settings));
        }
        other => bail!("Unknown context command {:?}", other),
    }

    Ok(())
}

fn render_contexts(settings: &Settings) -> String {
    if settings.contexts.is_empty() {
        return "No contexts saved. Use \"riser context save\" to add one.\n".to_string();
    }

    let mut table = Table::new(["Current", "Name", "Server URL", "Secure"]);
    for context in &settings.contexts {
        let current = settings.current_context.as_deref() == Some(context.name.as_str());
        table.add_row(vec![
            Cell::new(if current { "*" } else { "" }),
            Cell::new(context.name.as_str()),
            Cell::new(context.server_url.as_str()),
            Cell::new(context.secure.to_string()),
        ]);
    }
    format!("{}\n", table.render())
}
