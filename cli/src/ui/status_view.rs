//! App status and deployment describe views

use colored::{Color, Colorize};
use riser_api_models::{
    App, AppStatus, DeploymentStatus, DeploymentTrafficStatus, EnvironmentStatus, RevisionStatus,
};

use crate::errors::CliError;
use crate::status::revisions::{get_revision_status, get_revision_status_with_pending};
use crate::ui::table::{Cell, Table};

/// Number of revisions listed by the describe view
pub const DESCRIBE_MAX_REVISIONS: usize = 5;

const UNOBSERVED_FOOTNOTE: &str = "* This deployment has changes that have not yet been observed.";

/// Render the status of every deployment of an app.
///
/// Only active revisions are listed unless `all_revisions` is set.
pub fn render_status(app_name: &str, status: &AppStatus, all_revisions: bool) -> String {
    if status.deployments.is_empty() {
        return format!(
            "There are no deployments for the app {:?}. Use \"riser deploy\" to make your first deployment.\n",
            app_name
        );
    }

    let mut table = Table::new([
        "Deployment",
        "Env",
        "Traffic",
        "Rev",
        "Docker Tag",
        "Pods",
        "Status",
        "Reason",
    ]);
    let mut pending_observation = false;

    for deployment in &status.deployments {
        if !deployment.is_observed() {
            pending_observation = true;
        }

        let revisions = get_revision_status_with_pending(deployment, !all_revisions);
        for (i, revision) in revisions.iter().enumerate() {
            let (name, env) = if i == 0 {
                (
                    format_deployment_name(deployment),
                    Cell::new(deployment.environment_name.as_str()),
                )
            } else {
                (Cell::new(""), Cell::new(""))
            };

            table.add_row(vec![
                name,
                env,
                Cell::new(format_traffic(&revision.traffic)),
                Cell::new(revision.riser_revision.to_string()),
                format_docker_tag(&revision.docker_image),
                Cell::new(revision.available_replicas.to_string()),
                format_revision_status(revision.revision_status),
                Cell::new(revision.revision_status_reason.as_str()),
            ]);
        }
    }

    let mut out = table.render();
    out.push_str("\n\n");

    if pending_observation {
        out.push_str(&format!("{}\n", UNOBSERVED_FOOTNOTE.bright_cyan()));
    }
    for environment in &status.environments {
        if !environment.healthy {
            out.push_str(&format!("{}\n", environment_warning(environment).bright_yellow()));
        }
    }

    out
}

/// Render one deployment in one environment
pub fn render_describe(
    app: &App,
    status: &AppStatus,
    deployment_name: &str,
    environment_name: &str,
    external_host: &str,
) -> Result<String, CliError> {
    let deployments: Vec<&DeploymentStatus> = status
        .deployments
        .iter()
        .filter(|d| d.deployment_name == deployment_name && d.environment_name == environment_name)
        .collect();
    if deployments.is_empty() {
        return Err(CliError::NotFound(format!(
            "The environment {:?} does not contain the deployment {:?} in the {:?} namespace",
            environment_name, deployment_name, app.namespace
        )));
    }

    let mut out = String::new();
    out.push_str(&format!("Name: {}\n", deployment_name));
    out.push_str(&format!("Namespace: {}\n", app.namespace));
    out.push_str(&format!("Environment: {}\n", environment_name));
    out.push_str(&format!("App: {} ({})\n", app.name, app.id));

    out.push_str("\nIngress URLs:\n");
    out.push_str(&format!(
        "  External: {}\n",
        external_url(deployment_name, &app.namespace, external_host)
    ));
    out.push_str(&format!(
        "  Cluster: {}\n",
        cluster_local_url(deployment_name, &app.namespace)
    ));

    out.push_str(&format!("\nRecent {} Revisions:\n", DESCRIBE_MAX_REVISIONS));
    let mut table = Table::new(["Traffic", "Rev", "Docker Tag", "Status", "Reason"]);
    for deployment in deployments {
        for revision in get_revision_status(deployment, false)
            .iter()
            .take(DESCRIBE_MAX_REVISIONS)
        {
            table.add_row(vec![
                Cell::new(format_traffic(&revision.traffic)),
                Cell::new(revision.riser_revision.to_string()),
                format_docker_tag(&revision.docker_image),
                format_revision_status(revision.revision_status),
                Cell::new(revision.revision_status_reason.as_str()),
            ]);
        }
    }
    out.push_str(&table.render());
    out.push_str("\n\n");

    let unhealthy = status
        .environments
        .iter()
        .find(|e| e.environment_name == environment_name && !e.healthy);
    if let Some(environment) = unhealthy {
        out.push_str(&format!("{}\n", environment_warning(environment).bright_yellow()));
    }

    Ok(out)
}

pub fn external_url(deployment_name: &str, namespace: &str, external_host: &str) -> String {
    format!("https://{}.{}.{}", deployment_name, namespace, external_host)
}

pub fn cluster_local_url(deployment_name: &str, namespace: &str) -> String {
    format!("http://{}.{}.svc.cluster.local", deployment_name, namespace)
}

/// `"<n>%"`, or `"0%"` when the server sent no percentage
pub fn format_traffic(traffic: &DeploymentTrafficStatus) -> String {
    format!("{}%", traffic.percent.unwrap_or(0))
}

/// The tag part of `image:tag`
pub fn format_docker_tag(docker_image: &str) -> Cell {
    match docker_image.split_once(':') {
        Some((_, tag)) => Cell::new(tag),
        None => Cell::colored("Unknown", Color::BrightYellow),
    }
}

pub fn format_revision_status(status: RevisionStatus) -> Cell {
    let color = match status {
        RevisionStatus::Ready => Color::BrightGreen,
        RevisionStatus::Waiting => Color::BrightCyan,
        RevisionStatus::Unhealthy => Color::BrightRed,
        RevisionStatus::Unknown => Color::BrightYellow,
    };
    Cell::colored(status.as_str(), color)
}

fn format_deployment_name(deployment: &DeploymentStatus) -> Cell {
    if deployment.is_observed() {
        Cell::new(deployment.deployment_name.as_str())
    } else {
        Cell::colored(format!("*{}", deployment.deployment_name), Color::BrightCyan)
    }
}

fn environment_warning(environment: &EnvironmentStatus) -> String {
    format!(
        "Warning: environment {:?} is not healthy. {}",
        environment.environment_name, environment.reason
    )
}
