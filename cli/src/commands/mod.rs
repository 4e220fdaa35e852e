//! Command dispatch

pub mod apps;
pub mod context;
pub mod demo;
pub mod deploy;
pub mod deployments;
pub mod namespaces;
pub mod ops;
pub mod rollout;
pub mod secrets;
pub mod status;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::errors::CliError;
use crate::http::client::ApiClient;
use crate::notify::{Notifier, ScreenNotifier};
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;
use crate::ui::OutputFormat;
use crate::utils::version_info;

pub const DEFAULT_NAMESPACE: &str = "apps";
pub const DEFAULT_APP_FILE: &str = "app.json";

/// Parsed command line: `--key=value` flags, `--flag` switches and positional arguments
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub flags: HashMap<String, String>,
    pub positional: Vec<String>,
}

impl CliArgs {
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = CliArgs::default();

        for arg in args.into_iter().map(Into::into) {
            if !arg.starts_with('-') {
                parsed.positional.push(arg);
            } else if let Some((key, value)) = arg.split_once('=') {
                let clean_key = key.trim_start_matches('-');
                parsed.flags.insert(clean_key.to_string(), value.to_string());
            } else {
                let clean_key = arg.trim_start_matches('-');
                parsed.flags.insert(clean_key.to_string(), "true".to_string());
            }
        }

        parsed
    }

    pub fn flag(&self, key: &str) -> Option<&str> {
        self.flags.get(key).map(String::as_str)
    }

    pub fn has_flag(&self, key: &str) -> bool {
        matches!(self.flag(key), Some(value) if value != "false")
    }

    /// Positional argument `index`, after the command words
    pub fn arg(&self, index: usize, name: &str) -> Result<&str, CliError> {
        self.positional
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| CliError::ValidationError(format!("Missing argument ({})", name)))
    }

    pub fn output_format(&self) -> Result<OutputFormat, CliError> {
        self.flag("output").unwrap_or("human").parse()
    }
}

/// Name and namespace of the app a command targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRef {
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Deserialize)]
struct AppFileHeader {
    name: Option<String>,
    namespace: Option<String>,
}

/// Resolve the app from `--app`/`--namespace`, falling back to the app file
pub async fn resolve_app(args: &CliArgs) -> Result<AppRef, CliError> {
    let (name, file_namespace) = match args.flag("app") {
        Some(name) => (name.to_string(), None),
        None => {
            let header: AppFileHeader = serde_json::from_value(load_app_file(args).await?)?;
            (header.name.unwrap_or_default(), header.namespace)
        }
    };

    let namespace = args
        .flag("namespace")
        .map(str::to_string)
        .or(file_namespace)
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

    Ok(AppRef { name, namespace })
}

/// Namespace from `--namespace`, else the app file, else the default.
///
/// A missing or invalid app file is not an error here.
pub async fn resolve_namespace(args: &CliArgs) -> String {
    if let Some(namespace) = args.flag("namespace") {
        return namespace.to_string();
    }

    let header = match load_app_file(args).await {
        Ok(value) => serde_json::from_value::<AppFileHeader>(value).ok(),
        Err(e) => {
            debug!("No namespace from the app file: {}", e);
            None
        }
    };
    header
        .and_then(|header| header.namespace)
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
}

/// Ask a yes/no question on the terminal; anything but yes is no
pub async fn confirm(question: &str) -> Result<bool, CliError> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{} [y/N] ", question).as_bytes()).await?;
    stdout.flush().await?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut answer).await?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Load the app config named by `--app-file` (default `app.json`)
pub async fn load_app_file(args: &CliArgs) -> Result<serde_json::Value, CliError> {
    let path = PathBuf::from(args.flag("app-file").unwrap_or(DEFAULT_APP_FILE));
    let file = crate::filesys::file::File::new(path);
    let value: serde_json::Value = file.read_json().await?;

    let header: AppFileHeader = serde_json::from_value(value.clone())?;
    if header.name.as_deref().unwrap_or_default().is_empty() {
        return Err(CliError::ValidationError(format!(
            "The app file {} must specify a name",
            file.path().display()
        )));
    }

    Ok(value)
}

/// API client for the current context
pub fn api_client(settings: &Settings) -> Result<Arc<ApiClient>, CliError> {
    let context = settings.current_context()?;
    let apikey = SecretString::from(context.apikey.expose_secret().to_string());
    let client = if context.secure {
        ApiClient::new(&context.server_url, apikey)?
    } else {
        ApiClient::insecure(&context.server_url, apikey)?
    };
    Ok(Arc::new(client))
}

/// Run the command named by the first positional arguments
pub async fn run(args: CliArgs, layout: StorageLayout, settings: Settings) -> anyhow::Result<()> {
    let verbose = args.has_flag("verbose") || settings.verbose;
    let notifier: Arc<dyn Notifier> = Arc::new(ScreenNotifier::new(verbose));

    let command = args.positional.first().cloned().unwrap_or_default();
    match command.as_str() {
        "status" => status::status(&args, &settings).await.context("Error getting status"),
        "describe" => status::describe(&args, &settings)
            .await
            .context("Error describing deployment"),
        "deploy" => deploy::deploy(&args, &settings, notifier).await,
        "rollout" => rollout::rollout(&args, &settings)
            .await
            .context("Error requesting rollout"),
        "context" => context::context(&args, &layout, settings, notifier).await,
        "apps" => apps::apps(&args, &settings).await,
        "deployments" => deployments::deployments(&args, &settings).await,
        "secrets" => secrets::secrets(&args, &settings).await,
        "namespaces" => namespaces::namespaces(&args, &settings).await,
        "environments" => namespaces::environments(&args, &settings).await,
        "ops" => ops::ops(&args),
        "demo-install" => demo::install(&args, &layout, notifier).await,
        "demo-status" => demo::status(&args, &layout, notifier).await,
        "version" => {
            println!("{}", serde_json::to_string_pretty(&version_info())?);
            Ok(())
        }
        "" | "help" => {
            print_usage();
            Ok(())
        }
        other => bail!("Unknown command {:?}. Use \"riser help\" to list commands", other),
    }
}

pub fn print_usage() {
    println!(
        "riser: deploy and operate apps on the riser platform

Usage:
  riser status [--app=<name>] [--namespace=<ns>] [--all] [--output=json]
  riser describe <deployment> <env> [--app=<name>] [--namespace=<ns>] [--external-host=<host>]
  riser deploy <docker tag> <env> [--app-file=app.json] [--name=<deployment>] [--wait] [--wait-seconds=60] [--manual-rollout] [--dry-run]
  riser rollout <env> <rev:percent>... [--name=<deployment>] [--namespace=<ns>]
  riser context save <name> --server-url=<url> --apikey=<key> [--secure=false]
  riser context current [<name>]
  riser context list
  riser context remove <name>
  riser apps list [--output=json]
  riser apps new <name> [--namespace=<ns>]
  riser deployments delete <deployment> <env> [--namespace=<ns>] [--no-prompt]
  riser secrets save <env> <name> <plaintext> [--app=<name>]
  riser secrets list <env> [--app=<name>] [--output=json]
  riser namespaces create <name>
  riser namespaces list [--output=json]
  riser environments list [--output=json]
  riser ops generate-apikey
  riser demo-install --git-url=<url> --assets=<dir> [--environment=Demo]
  riser demo-status [--environment=Demo]
  riser --version

Flags:
  --verbose        Show verbose output
  --log-level=X    Log level (trace, debug, info, warn, error)"
    );
}
