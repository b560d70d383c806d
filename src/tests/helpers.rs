// Shared fixtures for the integration tests. Every test seeds rows with
// unique names so parallel tests never see each other's data, and removes
// its rows afterwards.
use crate::models::{GroupingState, GroupingStatus, Team, TeamGrouping, TeamMember};
use crate::utils::{fs_utils, grouping_storage, jwt, team_storage};
use chrono::{DateTime, Utc};
use std::fs;
use uuid::Uuid;

pub struct TeamFixture {
    pub team_id: String,
    pub team_name: String,
    pub grouping: String,
    pub teacher_email: String,
    pub member_email: String,
    pub token: String,
    grouping_row_id: String,
}

// Seed one team with a single grouping membership and return a session
// token for its teacher contact.
pub fn seed_team(category: &str) -> TeamFixture {
    let suffix = Uuid::new_v4().to_string();
    let team_id = format!("team-{}", suffix);
    let team_name = format!("Team {}", suffix);
    let grouping = format!("Stage-{}", suffix);
    let teacher_email = format!("teacher-{}@example.com", suffix);
    let member_email = format!("parent-{}@example.com", suffix);

    let team = Team {
        id: team_id.clone(),
        team_name: team_name.clone(),
        category: category.to_string(),
        teacher_email: teacher_email.clone(),
        teacher_name: "Test Teacher".to_string(),
        team_members: vec![TeamMember {
            name: "Test Member".to_string(),
            parent_email: member_email.clone(),
        }],
        created_at: Utc::now(),
    };
    team_storage::save_team(&team).unwrap();

    let grouping_row_id = Uuid::new_v4().to_string();
    grouping_storage::save_team_grouping(&TeamGrouping {
        id: grouping_row_id.clone(),
        team_name: team_name.clone(),
        grouping: grouping.clone(),
    })
    .unwrap();

    let token = jwt::issue_token("test-user", &teacher_email).unwrap();

    TeamFixture {
        team_id,
        team_name,
        grouping,
        teacher_email,
        member_email,
        token,
        grouping_row_id,
    }
}

// Write a status row for a grouping
pub fn set_status(
    grouping: &str,
    state: GroupingState,
    updated_at: DateTime<Utc>,
    target_time: Option<i64>,
    penalty: bool,
) {
    grouping_storage::save_grouping_status(&GroupingStatus {
        grouping: grouping.to_string(),
        status: state,
        updated_at,
        target_time,
        penalty,
    })
    .unwrap();
}

pub fn remove_status(grouping: &str) {
    let path = fs_utils::collection_dir("grouping_status").join(format!("{}.json", grouping));
    let _ = fs::remove_file(path);
}

pub fn cleanup_team(fixture: &TeamFixture) {
    let _ = fs::remove_file(
        fs_utils::collection_dir("teams").join(format!("{}.json", fixture.team_id)),
    );
    let _ = fs::remove_file(
        fs_utils::collection_dir("team_groupings")
            .join(format!("{}.json", fixture.grouping_row_id)),
    );
    remove_status(&fixture.grouping);

    // Blobs written on behalf of the team
    for bucket in [
        "bug_screenshots",
        "enhancement_screenshots",
        "brainstorm_maps",
        "project_files",
    ] {
        let _ = fs::remove_dir_all(
            fs_utils::collection_dir("blobs")
                .join(bucket)
                .join(&fixture.team_id),
        );
    }
}

pub fn remove_row(collection: &str, id: &str) {
    let _ = fs::remove_file(fs_utils::collection_dir(collection).join(format!("{}.json", id)));
}
