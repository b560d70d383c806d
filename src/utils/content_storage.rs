// heimdall-service/src/utils/content_storage.rs
//
// Operator-authored content: stages and the material scoped to them.
// Everything here is read-only from the dashboard's point of view; the
// save functions exist for seeding.
use crate::models::{BugContent, MissionPack, ServiceError, Stage, StageUpdate};
use crate::utils::fs_utils;
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;

const STAGES_COLLECTION: &str = "stages";
const BUGS_COLLECTION: &str = "bugs";
const MISSION_PACKS_COLLECTION: &str = "mission_packs";
const UPDATES_COLLECTION: &str = "updates";

fn save_row<T: Serialize>(collection: &str, id: &str, row: &T) -> Result<(), ServiceError> {
    let dir = fs_utils::collection_dir(collection);
    fs::create_dir_all(&dir).map_err(|e| {
        error!("Failed to create {} directory: {:?}", collection, e);
        ServiceError::InternalServerError
    })?;

    let row_json = serde_json::to_string_pretty(row).map_err(|e| {
        error!("Failed to serialize {} row: {:?}", collection, e);
        ServiceError::InternalServerError
    })?;

    fs::write(dir.join(format!("{}.json", id)), row_json).map_err(|e| {
        error!("Failed to save {} row: {:?}", collection, e);
        ServiceError::InternalServerError
    })?;

    Ok(())
}

fn load_rows<T: DeserializeOwned>(collection: &str) -> Result<Vec<T>, ServiceError> {
    let dir = fs_utils::collection_dir(collection);

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();

    for entry_result in fs::read_dir(&dir).map_err(|e| {
        error!("Failed to read {} directory: {:?}", collection, e);
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
                    warn!("Failed to read {} file: {:?}", collection, e);
                    continue;
                }
            };

            match serde_json::from_str(&content) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!("Failed to parse {} JSON: {:?}", collection, e);
                    continue;
                }
            }
        }
    }

    Ok(rows)
}

pub fn save_stage(stage: &Stage) -> Result<(), ServiceError> {
    save_row(STAGES_COLLECTION, &stage.stage_id, stage)
}

pub fn save_bug(bug: &BugContent) -> Result<(), ServiceError> {
    save_row(BUGS_COLLECTION, &bug.id, bug)
}

pub fn save_mission_pack(pack: &MissionPack) -> Result<(), ServiceError> {
    save_row(MISSION_PACKS_COLLECTION, &pack.id, pack)
}

pub fn save_update(update: &StageUpdate) -> Result<(), ServiceError> {
    save_row(UPDATES_COLLECTION, &update.id, update)
}

// Stage whose name matches a grouping name exactly
pub fn find_stage_by_name(stage_name: &str) -> Result<Option<Stage>, ServiceError> {
    let stages: Vec<Stage> = load_rows(STAGES_COLLECTION)?;
    Ok(stages.into_iter().find(|s| s.stage_name == stage_name))
}

// Stages for all of a team's grouping names
pub fn find_stages_in(stage_names: &[String]) -> Result<Vec<Stage>, ServiceError> {
    let stages: Vec<Stage> = load_rows(STAGES_COLLECTION)?;
    Ok(stages
        .into_iter()
        .filter(|s| stage_names.contains(&s.stage_name))
        .collect())
}

pub fn find_bug(
    stage_id: &str,
    bug_number: u32,
    category: &str,
) -> Result<Option<BugContent>, ServiceError> {
    let bugs: Vec<BugContent> = load_rows(BUGS_COLLECTION)?;
    Ok(bugs.into_iter().find(|b| {
        b.stage_id == stage_id && b.bug_number == bug_number && b.category == category
    }))
}

pub fn find_mission_pack(
    stage_id: &str,
    category: &str,
) -> Result<Option<MissionPack>, ServiceError> {
    let packs: Vec<MissionPack> = load_rows(MISSION_PACKS_COLLECTION)?;
    Ok(packs
        .into_iter()
        .find(|p| p.stage_id == stage_id && p.category == category))
}

pub fn find_updates_for_stages(
    stage_ids: &[String],
    category: &str,
) -> Result<Vec<StageUpdate>, ServiceError> {
    let updates: Vec<StageUpdate> = load_rows(UPDATES_COLLECTION)?;
    Ok(updates
        .into_iter()
        .filter(|u| stage_ids.contains(&u.stage_id) && u.category == category)
        .collect())
}
