//! `riser demo-install` and `riser demo-status`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use colored::Colorize;
use url::Url;

use crate::commands::status::DEFAULT_EXTERNAL_HOST;
use crate::commands::{CliArgs, DEFAULT_NAMESPACE};
use crate::errors::CliError;
use crate::installer::bootstrap::{
    bootstrap, validate_assets_dir, BootstrapOptions, BOOTSTRAP_SERVER_URL, DEFAULT_ENVIRONMENT_NAME,
};
use crate::installer::status::{wait_for_ingress_ip, wait_for_server};
use crate::notify::Notifier;
use crate::steps::StepRunner;
use crate::storage::layout::StorageLayout;

const SERVER_TIPS: &str = "Tips:
• On slower systems this can take longer than expected. You may try running \"riser demo-status\" again.
• Ensure that your kubernetes context is set to the cluster with the demo installed.
• Ensure that the riser demo is installed using \"riser demo-install\".
• Check the pod logs for pods in the \"riser-system\" namespace.";

const INGRESS_TIPS: &str = "Tips:
• If you're using minikube be sure that \"minikube tunnel\" is running.
• Ensure that your kubernetes context is set to the cluster with the demo installed.
• Ensure that the riser demo is installed using \"riser demo-install\".
• Check the service status and pod logs for \"istio-ingressgateway\" in the \"istio-system\" namespace.";

pub async fn install(
    args: &CliArgs,
    layout: &StorageLayout,
    notifier: Arc<dyn Notifier>,
) -> anyhow::Result<()> {
    let git_url = args
        .flag("git-url")
        .ok_or_else(|| CliError::ValidationError("--git-url is required".to_string()))?;
    let git_url = Url::parse(git_url).context("--git-url must be a valid URL")?;

    let assets_dir = PathBuf::from(
        args.flag("assets")
            .ok_or_else(|| CliError::ValidationError("--assets is required".to_string()))?,
    );
    validate_assets_dir(&assets_dir)?;

    let mut options = BootstrapOptions::new(git_url, assets_dir);
    if let Some(environment_name) = args.flag("environment") {
        options.environment_name = environment_name.to_string();
    }

    notifier.warn(
        "The riser demo installs infrastructure that may collide with existing infrastructure (e.g. istio). \
         Install it to an empty cluster.",
    );
    bootstrap(&options, layout, notifier.clone())
        .await
        .context("Error installing riser")?;

    notifier.info(&"Installation complete!".green().to_string());
    notifier.info("Executing \"riser demo-status\"...");
    demo_status(&options.environment_name, layout, notifier).await
}

pub async fn status(
    args: &CliArgs,
    layout: &StorageLayout,
    notifier: Arc<dyn Notifier>,
) -> anyhow::Result<()> {
    let environment_name = args.flag("environment").unwrap_or(DEFAULT_ENVIRONMENT_NAME);
    demo_status(environment_name, layout, notifier).await
}

async fn demo_status(
    environment_name: &str,
    layout: &StorageLayout,
    notifier: Arc<dyn Notifier>,
) -> anyhow::Result<()> {
    notifier.warn("If you're using minikube be sure that \"minikube tunnel\" is running.");

    let mut settings = layout.load_settings().await?;
    settings
        .set_current_context(environment_name)
        .context("Error loading demo config. Please run \"riser demo-install\".")?;

    let runner = StepRunner::new(notifier.clone());
    if let Err(e) = wait_for_server(&runner, notifier.clone()).await {
        notifier.error(&e.to_string());
        bail!(SERVER_TIPS);
    }

    let ingress_ip = match wait_for_ingress_ip(&runner, notifier.clone()).await {
        Ok(ip) => ip,
        Err(e) => {
            notifier.error(&e.to_string());
            bail!(INGRESS_TIPS);
        }
    };

    let api_host = Url::parse(BOOTSTRAP_SERVER_URL)?
        .host_str()
        .unwrap_or_default()
        .to_string();
    notifier.info(&render_instructions(&ingress_ip, &api_host));
    Ok(())
}

/// Host setup instructions for reaching the demo through the ingress gateway
fn render_instructions(ingress_ip: &str, api_host: &str) -> String {
    let apps_host = format!("*.{}.{}", DEFAULT_NAMESPACE, DEFAULT_EXTERNAL_HOST);
    let app_host = format!("<YOUR-APP>.{}.{}", DEFAULT_NAMESPACE, DEFAULT_EXTERNAL_HOST);

    let lines = vec![
        String::new(),
        "Everything checks out!".green().to_string(),
        String::new(),
        format!("Gateway IP:\t{}", ingress_ip.bold()),
        format!("API Host:\t{}", api_host.bold()),
        format!("Apps host:\t{}", apps_host.bold()),
        String::new(),
        "Instructions:".to_string(),
        format!(
            "• In your hosts file (e.g. /etc/hosts) or local DNS server set the IP for the host {} to the ingress IP: {}",
            api_host.bold(),
            ingress_ip.bold()
        ),
        format!(
            "  Example /etc/hosts entry:\n  {}",
            format!("{} {}", ingress_ip, api_host).bright_black()
        ),
        format!(
            "• For easier access to your apps, add host entries using the format {} to the same ingress IP, or create a wildcard DNS record for {}.",
            app_host, apps_host
        ),
        "• You may also access your apps by passing a host header. For example, with curl:".to_string(),
        format!(
            "  curl -k -H \"Host: {}\" https://{}",
            app_host, ingress_ip
        )
        .bright_black()
        .to_string(),
        String::new(),
        "Execute \"riser demo-status\" to see this message again.".to_string(),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_instructions() {
        colored::control::set_override(false);

        let out = render_instructions("10.1.2.3", "riser-server.riser-system.demo.riser");

        assert!(out.contains("Gateway IP:\t10.1.2.3"));
        assert!(out.contains("Apps host:\t*.apps.demo.riser"));
        assert!(out.contains("  10.1.2.3 riser-server.riser-system.demo.riser"));
        assert!(out.contains("curl -k -H \"Host: <YOUR-APP>.apps.demo.riser\" https://10.1.2.3"));
    }
}
