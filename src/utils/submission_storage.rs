// heimdall-service/src/utils/submission_storage.rs
use crate::models::{ServiceError, Submission, SubmissionKind};
use crate::utils::fs_utils;
use log::{error, info, warn};
use std::fs;

// Insert one submission row. Rows are immutable after this point.
pub fn insert_submission(kind: SubmissionKind, submission: &Submission) -> Result<(), ServiceError> {
    let dir = fs_utils::collection_dir(kind.collection());
    fs::create_dir_all(&dir).map_err(|e| {
        error!("Failed to create {} directory: {:?}", kind.collection(), e);
        ServiceError::Write(e.to_string())
    })?;

    let row_json = serde_json::to_string_pretty(submission).map_err(|e| {
        error!("Failed to serialize submission: {:?}", e);
        ServiceError::Write(e.to_string())
    })?;

    fs::write(dir.join(format!("{}.json", submission.id)), row_json).map_err(|e| {
        error!("Failed to save submission: {:?}", e);
        ServiceError::Write(e.to_string())
    })?;

    info!("✅ Saved {} row: {}", kind.collection(), submission.id);
    Ok(())
}

// All of a team's rows in one collection
pub fn find_submissions_for_team(
    kind: SubmissionKind,
    team_id: &str,
) -> Result<Vec<Submission>, ServiceError> {
    let dir = fs_utils::collection_dir(kind.collection());

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut submissions = Vec::new();

    for entry_result in fs::read_dir(&dir).map_err(|e| {
        error!("Failed to read {} directory: {:?}", kind.collection(), e);
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
                    warn!("Failed to read submission file: {:?}", e);
                    continue;
                }
            };

            let submission: Submission = match serde_json::from_str(&content) {
                Ok(submission) => submission,
                Err(e) => {
                    warn!("Failed to parse submission JSON: {:?}", e);
                    continue;
                }
            };

            if submission.team_id == team_id {
                submissions.push(submission);
            }
        }
    }

    Ok(submissions)
}

// Hard delete of one row by identifier. No soft-delete, no audit trail.
pub fn delete_submission(kind: SubmissionKind, id: &str) -> Result<bool, ServiceError> {
    let row_path = fs_utils::collection_dir(kind.collection()).join(format!("{}.json", id));

    if !row_path.exists() {
        return Ok(false);
    }

    fs::remove_file(&row_path).map_err(|e| {
        error!("Failed to delete submission file: {:?}", e);
        ServiceError::Write(e.to_string())
    })?;

    info!("✅ Deleted {} row: {}", kind.collection(), id);
    Ok(true)
}
