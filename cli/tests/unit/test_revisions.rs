//! Revision and traffic resolution tests

use riser::status::revisions::{
    get_revision_status, get_revision_status_with_pending, UNOBSERVED_REVISION_REASON,
};
use riser_api_models::{
    DeploymentRevisionStatus, DeploymentStatus, DeploymentTrafficStatus, RevisionStatus,
};

fn revision(name: &str, riser_revision: i64) -> DeploymentRevisionStatus {
    DeploymentRevisionStatus {
        name: name.to_string(),
        riser_revision,
        revision_status: RevisionStatus::Ready,
        ..Default::default()
    }
}

fn traffic(revision_name: &str, percent: Option<i64>) -> DeploymentTrafficStatus {
    DeploymentTrafficStatus {
        revision_name: revision_name.to_string(),
        percent,
    }
}

fn revisions_of(result: &[riser::status::revisions::RevisionStatusWithTraffic]) -> Vec<i64> {
    result.iter().map(|r| r.riser_revision).collect()
}

#[test]
fn test_sorted_newest_first() {
    let status = DeploymentStatus {
        revisions: vec![revision("rev1", 1), revision("rev3", 3), revision("rev2", 2)],
        ..Default::default()
    };

    let result = get_revision_status(&status, false);

    assert_eq!(revisions_of(&result), vec![3, 2, 1]);
}

#[test]
fn test_all_revisions_listed_when_not_active_only() {
    let status = DeploymentStatus {
        revisions: vec![revision("rev1", 1), revision("rev2", 2), revision("rev3", 3)],
        traffic: vec![traffic("rev2", Some(100))],
        latest_created_revision_name: "rev3".to_string(),
        ..Default::default()
    };

    let result = get_revision_status(&status, false);

    assert_eq!(revisions_of(&result), vec![3, 2, 1]);
    assert_eq!(result[1].traffic.percent, Some(100));
    assert_eq!(result[0].traffic, DeploymentTrafficStatus::default());
    assert_eq!(result[2].traffic, DeploymentTrafficStatus::default());
}

#[test]
fn test_active_only_keeps_traffic_and_latest_created() {
    let status = DeploymentStatus {
        revisions: vec![revision("rev1", 1), revision("rev2", 2), revision("rev3", 3)],
        traffic: vec![traffic("rev1", Some(100))],
        latest_created_revision_name: "rev3".to_string(),
        ..Default::default()
    };

    let result = get_revision_status(&status, true);

    assert_eq!(revisions_of(&result), vec![3, 1]);
}

#[test]
fn test_traffic_split_between_two_revisions() {
    let status = DeploymentStatus {
        revisions: vec![revision("rev1", 1), revision("rev2", 2)],
        traffic: vec![traffic("rev1", Some(90)), traffic("rev2", Some(10))],
        ..Default::default()
    };

    let result = get_revision_status(&status, true);

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].name, "rev2");
    assert_eq!(result[0].traffic, traffic("rev2", Some(10)));
    assert_eq!(result[1].name, "rev1");
    assert_eq!(result[1].traffic, traffic("rev1", Some(90)));
}

#[test]
fn test_zero_or_missing_percent_is_not_traffic() {
    let status = DeploymentStatus {
        revisions: vec![revision("rev1", 1), revision("rev2", 2)],
        traffic: vec![traffic("rev1", Some(0)), traffic("rev2", None)],
        latest_created_revision_name: "rev2".to_string(),
        ..Default::default()
    };

    let result = get_revision_status(&status, true);

    assert_eq!(revisions_of(&result), vec![2]);
    assert_eq!(result[0].traffic, DeploymentTrafficStatus::default());
}

#[test]
fn test_revision_repeated_per_traffic_entry() {
    let status = DeploymentStatus {
        revisions: vec![revision("rev1", 1)],
        traffic: vec![traffic("rev1", Some(60)), traffic("rev1", Some(40))],
        ..Default::default()
    };

    let result = get_revision_status(&status, true);

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].traffic.percent, Some(60));
    assert_eq!(result[1].traffic.percent, Some(40));
}

#[test]
fn test_traffic_for_unknown_revision_is_ignored() {
    let status = DeploymentStatus {
        revisions: vec![revision("rev1", 1)],
        traffic: vec![traffic("rev9", Some(100))],
        latest_created_revision_name: "rev1".to_string(),
        ..Default::default()
    };

    let result = get_revision_status(&status, true);

    assert_eq!(revisions_of(&result), vec![1]);
    assert_eq!(result[0].traffic.percent, None);
}

#[test]
fn test_no_revisions() {
    let status = DeploymentStatus {
        traffic: vec![traffic("rev1", Some(100))],
        ..Default::default()
    };

    assert!(get_revision_status(&status, false).is_empty());
}

#[test]
fn test_pending_revision_added_when_unobserved() {
    let status = DeploymentStatus {
        riser_revision: 3,
        observed_riser_revision: 2,
        revisions: vec![revision("rev1", 1), revision("rev2", 2)],
        traffic: vec![traffic("rev2", Some(100))],
        latest_created_revision_name: "rev2".to_string(),
        ..Default::default()
    };

    let result = get_revision_status_with_pending(&status, true);

    assert_eq!(revisions_of(&result), vec![3, 2]);
    assert_eq!(result[0].revision_status, RevisionStatus::Waiting);
    assert_eq!(result[0].revision_status_reason, UNOBSERVED_REVISION_REASON);
    assert_eq!(result[0].traffic, DeploymentTrafficStatus::default());
}

#[test]
fn test_resolved_json_is_flattened() {
    let status = DeploymentStatus {
        revisions: vec![revision("rev1", 1)],
        traffic: vec![traffic("rev1", Some(100))],
        ..Default::default()
    };

    let result = get_revision_status(&status, false);
    let json = serde_json::to_value(&result[0]).unwrap();

    assert_eq!(json["riserRevision"], 1);
    assert_eq!(json["traffic"]["percent"], 100);
}
