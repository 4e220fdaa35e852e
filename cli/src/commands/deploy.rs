//! `riser deploy`

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use riser_api_models::{App, DeploymentDocker, DeploymentRequest};

use crate::commands::{api_client, load_app_file, CliArgs};
use crate::deploy::wait::{wait_for_ready, StatusSource};
use crate::errors::CliError;
use crate::notify::Notifier;
use crate::storage::settings::Settings;
use crate::ui::deploy_view::render_deploy_result;
use crate::ui::{render_json, OutputFormat};

/// Parsed `riser deploy` options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    pub docker_tag: String,
    pub environment_name: String,
    pub deployment_name: Option<String>,
    pub manual_rollout: bool,
    pub dry_run: bool,
    pub wait: bool,
    pub wait_seconds: u64,
}

impl DeployOptions {
    pub fn from_args(args: &CliArgs, settings: &Settings) -> Result<Self, CliError> {
        let wait_seconds = match args.flag("wait-seconds") {
            Some(value) => value.parse().map_err(|_| {
                CliError::ValidationError(format!("Invalid --wait-seconds {:?}", value))
            })?,
            None => settings.wait_seconds,
        };

        let options = Self {
            docker_tag: args.arg(1, "docker tag")?.to_string(),
            environment_name: args.arg(2, "targetEnvironment")?.to_string(),
            deployment_name: args.flag("name").map(str::to_string),
            manual_rollout: args.has_flag("manual-rollout"),
            dry_run: args.has_flag("dry-run"),
            wait: args.has_flag("wait"),
            wait_seconds,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), CliError> {
        if self.manual_rollout && self.wait {
            return Err(CliError::ValidationError(
                "You cannot specify both \"--wait\" and \"--manual-rollout\"".to_string(),
            ));
        }
        Ok(())
    }
}

pub async fn deploy(
    args: &CliArgs,
    settings: &Settings,
    notifier: Arc<dyn Notifier>,
) -> anyhow::Result<()> {
    let options = DeployOptions::from_args(args, settings)?;
    let output = args.output_format()?;

    let app_config = load_app_file(args).await.context("Error loading app config")?;
    let app = App {
        id: app_config["id"].as_str().unwrap_or_default().to_string(),
        name: app_config["name"].as_str().unwrap_or_default().to_string(),
        namespace: app_config["namespace"]
            .as_str()
            .unwrap_or(crate::commands::DEFAULT_NAMESPACE)
            .to_string(),
    };
    let deployment_name = options
        .deployment_name
        .clone()
        .unwrap_or_else(|| app.name.clone());

    let request = DeploymentRequest {
        name: deployment_name.clone(),
        environment: options.environment_name.clone(),
        docker: DeploymentDocker {
            tag: options.docker_tag.clone(),
        },
        manual_rollout: options.manual_rollout,
        app: app_config,
    };

    let client = api_client(settings)?;
    let result = client.save_deployment(&request, options.dry_run).await?;

    if options.wait && !options.dry_run {
        notifier.info(&result.message);
        notifier.verbose(&format!(
            "Waiting up to {}s for revision {} to become ready",
            options.wait_seconds, result.riser_revision
        ));

        let source: Arc<dyn StatusSource> = client;
        wait_for_ready(
            source,
            &app,
            &deployment_name,
            &options.environment_name,
            result.riser_revision,
            Duration::from_secs(options.wait_seconds),
        )
        .await?;

        notifier.info(&format!("Revision {} is ready", result.riser_revision));
        return Ok(());
    }

    let rendered = match output {
        OutputFormat::Json => render_json(&result)?,
        OutputFormat::Human => {
            render_deploy_result(&result, options.manual_rollout, options.dry_run)
        }
    };
    print!("{}", rendered);
    Ok(())
}
