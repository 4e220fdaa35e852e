//! Result of saving a deployment

use colored::Colorize;
use riser_api_models::DeploymentResponse;

pub fn render_deploy_result(result: &DeploymentResponse, manual_rollout: bool, dry_run: bool) -> String {
    let mut out = format!("{}\n", result.message);

    if manual_rollout {
        out.push_str(&format!(
            "{}\n",
            "Manual rollout specified. You must use \"riser rollout\" to route traffic to the new deployment"
                .bright_cyan()
        ));
    }

    if dry_run {
        for commit in result.dry_run_commits.iter().flatten() {
            out.push_str(&format!("{}\n", format!("Commit: {}", commit.message).bright_cyan()));
            for file in &commit.files {
                out.push_str(&format!("{}\n", format!("File: {}", file.name).bright_white()));
                out.push_str(&format!("{}\n", file.contents.bright_black()));
            }
        }
    }

    out
}
