//! Revision and traffic resolution
//!
//! The server reports revisions and traffic assignments as two loosely ordered
//! lists. These functions pair them up into a stable, newest-first view.

use std::ops::Deref;

use riser_api_models::{
    DeploymentRevisionStatus, DeploymentStatus, DeploymentTrafficStatus, RevisionStatus,
};
use serde::Serialize;

/// Reason shown for a revision the controller has not reconciled yet
pub const UNOBSERVED_REVISION_REASON: &str = "This revision has not yet been observed";

/// A revision paired with the traffic routed to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionStatusWithTraffic {
    #[serde(flatten)]
    pub revision: DeploymentRevisionStatus,
    /// Zero-valued when the revision has no traffic
    pub traffic: DeploymentTrafficStatus,
}

impl Deref for RevisionStatusWithTraffic {
    type Target = DeploymentRevisionStatus;

    fn deref(&self) -> &Self::Target {
        &self.revision
    }
}

/// Resolve the revisions of a deployment together with their traffic, newest first.
///
/// A revision is emitted once per traffic entry that routes traffic to it. A
/// revision without traffic is emitted once with zero-valued traffic, unless
/// `active_only` is set and it is not the latest created revision.
pub fn get_revision_status(
    status: &DeploymentStatus,
    active_only: bool,
) -> Vec<RevisionStatusWithTraffic> {
    let mut resolved = Vec::new();

    for revision in &status.revisions {
        let mut has_traffic = false;
        for traffic in &status.traffic {
            if traffic.revision_name == revision.name && traffic.has_traffic() {
                has_traffic = true;
                resolved.push(RevisionStatusWithTraffic {
                    revision: revision.clone(),
                    traffic: traffic.clone(),
                });
            }
        }

        if !has_traffic && (!active_only || revision.name == status.latest_created_revision_name) {
            resolved.push(RevisionStatusWithTraffic {
                revision: revision.clone(),
                traffic: DeploymentTrafficStatus::default(),
            });
        }
    }

    sort_newest_first(&mut resolved);
    resolved
}

/// Like [`get_revision_status`], with a synthetic `Waiting` revision in front
/// when the requested revision has not been observed yet.
pub fn get_revision_status_with_pending(
    status: &DeploymentStatus,
    active_only: bool,
) -> Vec<RevisionStatusWithTraffic> {
    let mut resolved = get_revision_status(status, active_only);

    let already_listed = resolved
        .iter()
        .any(|r| r.riser_revision == status.riser_revision);
    if !status.is_observed() && !already_listed {
        resolved.push(RevisionStatusWithTraffic {
            revision: DeploymentRevisionStatus {
                riser_revision: status.riser_revision,
                revision_status: RevisionStatus::Waiting,
                revision_status_reason: UNOBSERVED_REVISION_REASON.to_string(),
                ..Default::default()
            },
            traffic: DeploymentTrafficStatus::default(),
        });
        sort_newest_first(&mut resolved);
    }

    resolved
}

/// The revision named as latest ready, if the server reported it
pub fn get_latest_ready_revision(status: &DeploymentStatus) -> Option<&DeploymentRevisionStatus> {
    status
        .revisions
        .iter()
        .find(|revision| revision.name == status.latest_ready_revision_name)
}

fn sort_newest_first(revisions: &mut [RevisionStatusWithTraffic]) {
    revisions.sort_by(|a, b| b.riser_revision.cmp(&a.riser_revision));
}
