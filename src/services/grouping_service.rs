// heimdall-service/src/services/grouping_service.rs
//
// The single gating service every route goes through. Grouping state is
// never cached here: each question triggers a fresh storage query, so a
// window that closed between page load and submit is always seen.
use crate::models::{ActiveStatus, GroupingState, GroupingStatus, ServiceError};
use crate::utils::grouping_storage;
use log::{info, warn};

// All grouping names a team belongs to. An empty result gates the whole
// dashboard off.
pub fn get_team_groupings(team_name: &str) -> Result<Vec<String>, ServiceError> {
    info!("📊 Fetching all groupings for team: {}", team_name);

    let groupings = grouping_storage::get_groupings_for_team(team_name)?;

    if groupings.is_empty() {
        warn!("⚠️ No team groupings found.");
    } else {
        info!("🏆 Team belongs to groupings: {:?}", groupings);
    }

    Ok(groupings)
}

// Pick the canonical session anchor from a set of status rows: the active
// row with the earliest update instant. Equal instants fall back to the
// grouping name so the result does not depend on storage scan order.
pub fn select_active_status(mut rows: Vec<GroupingStatus>) -> Option<ActiveStatus> {
    rows.retain(|row| row.status == GroupingState::Active);

    rows.into_iter()
        .min_by(|a, b| {
            a.updated_at
                .cmp(&b.updated_at)
                .then_with(|| a.grouping.cmp(&b.grouping))
        })
        .map(|row| ActiveStatus {
            grouping: row.grouping,
            updated_at: row.updated_at,
            target_time: row.target_time,
            penalty: row.penalty,
        })
}

// The oracle: which of the team's groupings (if any) is currently the
// active session anchor.
pub fn get_active_status(grouping_names: &[String]) -> Result<Option<ActiveStatus>, ServiceError> {
    if grouping_names.is_empty() {
        return Ok(None);
    }

    info!("📊 Checking if any of these groupings are active: {:?}", grouping_names);

    let rows = grouping_storage::find_statuses_for(grouping_names, GroupingState::Active)?;

    if rows.is_empty() {
        warn!("❌ No active groupings found.");
        return Ok(None);
    }

    let status = select_active_status(rows);
    if let Some(ref status) = status {
        info!("🔥 Active grouping anchor: {}", status.grouping);
    }

    Ok(status)
}

pub fn is_any_grouping_active(grouping_names: &[String]) -> Result<bool, ServiceError> {
    Ok(get_active_status(grouping_names)?.is_some())
}

// Guard for every submission write. Re-resolves the oracle immediately
// before the write so a countdown that expired after page load still
// blocks the attempt; the caller gets SubmissionClosed and the client is
// told to reload. The write closure never runs when the gate is shut.
pub fn guarded_write<T, F>(team_name: &str, write_fn: F) -> Result<T, ServiceError>
where
    F: FnOnce(&ActiveStatus) -> Result<T, ServiceError>,
{
    let groupings = get_team_groupings(team_name)?;

    let status = match get_active_status(&groupings)? {
        Some(status) => status,
        None => {
            warn!("❌ Submission blocked for team {}: no active grouping", team_name);
            return Err(ServiceError::SubmissionClosed);
        }
    };

    write_fn(&status)
}
