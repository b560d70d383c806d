// heimdall-service/src/utils/grouping_storage.rs
use crate::models::{GroupingState, GroupingStatus, ServiceError, TeamGrouping};
use crate::utils::fs_utils;
use log::{error, warn};
use std::fs;

const MEMBERSHIPS_COLLECTION: &str = "team_groupings";
const STATUS_COLLECTION: &str = "grouping_status";

// Save a membership row. Memberships are provisioned externally; tests and
// ops tooling seed through this.
pub fn save_team_grouping(row: &TeamGrouping) -> Result<(), ServiceError> {
    let dir = fs_utils::collection_dir(MEMBERSHIPS_COLLECTION);
    fs::create_dir_all(&dir).map_err(|e| {
        error!("Failed to create team groupings directory: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let row_path = dir.join(format!("{}.json", row.id));
    let row_json = serde_json::to_string_pretty(row).map_err(|e| {
        error!("Failed to serialize team grouping: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(&row_path, row_json).map_err(|e| {
        error!("Failed to save team grouping: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(())
}

// Save a status row, keyed by grouping name. Flipped by the competition
// operators while a session runs.
pub fn save_grouping_status(status: &GroupingStatus) -> Result<(), ServiceError> {
    let dir = fs_utils::collection_dir(STATUS_COLLECTION);
    fs::create_dir_all(&dir).map_err(|e| {
        error!("Failed to create grouping status directory: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let status_path = dir.join(format!("{}.json", status.grouping));
    let status_json = serde_json::to_string_pretty(status).map_err(|e| {
        error!("Failed to serialize grouping status: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(&status_path, status_json).map_err(|e| {
        error!("Failed to save grouping status: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(())
}

// All grouping names a team belongs to
pub fn get_groupings_for_team(team_name: &str) -> Result<Vec<String>, ServiceError> {
    let dir = fs_utils::collection_dir(MEMBERSHIPS_COLLECTION);

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut groupings = Vec::new();

    for entry_result in fs::read_dir(&dir).map_err(|e| {
        error!("Failed to read team groupings directory: {:?}", e);
        ServiceError::InternalServerError
    })? {
        let entry = entry_result.map_err(|e| {
            error!("Failed to read directory entry: {:?}", e);
            ServiceError::InternalServerError
        })?;

        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            // A row deleted mid-scan is not an error
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read team grouping file: {:?}", e);
                    continue;
                }
            };

            let row: TeamGrouping = match serde_json::from_str(&content) {
                Ok(row) => row,
                Err(e) => {
                    warn!("Failed to parse team grouping JSON: {:?}", e);
                    continue;
                }
            };

            if row.team_name == team_name {
                groupings.push(row.grouping);
            }
        }
    }

    Ok(groupings)
}

// Status rows whose grouping name is in the given set and whose state
// matches. This is the select the oracle issues for "active" rows.
pub fn find_statuses_for(
    grouping_names: &[String],
    state: GroupingState,
) -> Result<Vec<GroupingStatus>, ServiceError> {
    let dir = fs_utils::collection_dir(STATUS_COLLECTION);

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut statuses = Vec::new();

    for entry_result in fs::read_dir(&dir).map_err(|e| {
        error!("Failed to read grouping status directory: {:?}", e);
        ServiceError::InternalServerError
    })? {
        let entry = entry_result.map_err(|e| {
            error!("Failed to read directory entry: {:?}", e);
            ServiceError::InternalServerError
        })?;

        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read grouping status file: {:?}", e);
                    continue;
                }
            };

            let status: GroupingStatus = match serde_json::from_str(&content) {
                Ok(status) => status,
                Err(e) => {
                    warn!("Failed to parse grouping status JSON: {:?}", e);
                    continue;
                }
            };

            if status.status == state && grouping_names.contains(&status.grouping) {
                statuses.push(status);
            }
        }
    }

    Ok(statuses)
}
