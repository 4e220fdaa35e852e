//! Tables for apps, namespaces, environments and secrets

use chrono::{DateTime, Local, Utc};
use riser_api_models::{App, EnvironmentMeta, Namespace, SecretMetaStatus};

use crate::ui::table::{Cell, Table};

pub fn render_apps(apps: &[App]) -> String {
    let mut table = Table::new(["Name", "Namespace", "Id"]);
    for app in apps {
        table.add_row(vec![
            Cell::new(app.name.as_str()),
            Cell::new(app.namespace.as_str()),
            Cell::new(app.id.as_str()),
        ]);
    }
    format!("{}\n", table.render())
}

pub fn render_namespaces(namespaces: &[Namespace]) -> String {
    render_names(namespaces.iter().map(|namespace| namespace.name.as_str()))
}

pub fn render_environments(environments: &[EnvironmentMeta]) -> String {
    render_names(environments.iter().map(|environment| environment.name.as_str()))
}

pub fn render_secrets(secrets: &[SecretMetaStatus]) -> String {
    let mut table = Table::new(["Name", "Revision", "Last Updated"]);
    for secret in secrets {
        table.add_row(vec![
            Cell::new(secret.name.as_str()),
            Cell::new(secret.revision.to_string()),
            Cell::new(format_last_updated(&secret.last_updated)),
        ]);
    }
    format!("{}\n", table.render())
}

/// RFC 1123 in the local timezone
fn format_last_updated(last_updated: &DateTime<Utc>) -> String {
    last_updated
        .with_timezone(&Local)
        .format("%a, %d %b %Y %H:%M:%S %Z")
        .to_string()
}

fn render_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let mut table = Table::new(["Name"]);
    for name in names {
        table.add_row(vec![Cell::new(name)]);
    }
    format!("{}\n", table.render())
}
