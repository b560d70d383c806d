// heimdall-service/src/utils/team_storage.rs
use crate::models::{ServiceError, Team, TeamDetails};
use crate::utils::fs_utils;
use log::{error, info, warn};
use std::fs;

const TEAMS_COLLECTION: &str = "teams";

// Save a team row. Teams are provisioned by registration tooling; the
// service itself only reads them, but tests and ops scripts seed through
// this.
pub fn save_team(team: &Team) -> Result<(), ServiceError> {
    let dir = fs_utils::collection_dir(TEAMS_COLLECTION);
    fs::create_dir_all(&dir).map_err(|e| {
        error!("Failed to create teams directory: {:?}", e);
        ServiceError::InternalServerError
    })?;

    let team_path = dir.join(format!("{}.json", team.id));
    let team_json = serde_json::to_string_pretty(team).map_err(|e| {
        error!("Failed to serialize team: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(&team_path, team_json).map_err(|e| {
        error!("Failed to save team: {:?}", e);
        ServiceError::InternalServerError
    })?;

    Ok(())
}

fn load_all_teams() -> Result<Vec<Team>, ServiceError> {
    let dir = fs_utils::collection_dir(TEAMS_COLLECTION);

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut teams = Vec::new();

    for entry_result in fs::read_dir(&dir).map_err(|e| {
        error!("Failed to read teams directory: {:?}", e);
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
                    warn!("Failed to read team file: {:?}", e);
                    continue;
                }
            };

            let team: Team = match serde_json::from_str(&content) {
                Ok(team) => team,
                Err(e) => {
                    warn!("Failed to parse team JSON: {:?}", e);
                    continue;
                }
            };

            teams.push(team);
        }
    }

    Ok(teams)
}

// Resolve the team a signed-in email belongs to. The teacher contact is
// checked across all teams before any member contact, and the first match
// wins; an email bound to more than one team is not detected.
pub fn find_team_for_email(email: &str) -> Result<Option<TeamDetails>, ServiceError> {
    info!("🔍 Fetching team details for: {}", email);

    let teams = load_all_teams()?;

    // First, check if the user is a teacher
    for team in &teams {
        if team.teacher_email == email {
            info!("✅ User is a TEACHER in team: {}", team.team_name);
            return Ok(Some(TeamDetails {
                team_id: team.id.clone(),
                team_name: team.team_name.clone(),
                author_name: team.teacher_name.clone(),
                category: team.category.clone(),
            }));
        }
    }

    // Then check team member contacts
    for team in &teams {
        if let Some(member) = team.team_members.iter().find(|m| m.parent_email == email) {
            info!("✅ User is a TEAM MEMBER in team: {}", team.team_name);
            return Ok(Some(TeamDetails {
                team_id: team.id.clone(),
                team_name: team.team_name.clone(),
                author_name: member.name.clone(),
                category: team.category.clone(),
            }));
        }
    }

    warn!("⚠️ No matching team found for user: {}", email);
    Ok(None)
}
