// heimdall-service/src/routes/dashboard_routes.rs
//
// Read-only dashboard content. Misses degrade to empty placeholders; the
// only hard failures here are authentication and storage errors.
use crate::models::ServiceError;
use crate::services::{countdown, grouping_service};
use crate::utils::{blob_storage, content_storage, get_email_from_request, team_storage};
use actix_web::{get, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{info, warn};
use serde_json::json;

// Gating check used by the dashboard layout: may this team see gated
// content right now?
#[get("/dashboard/status")]
async fn dashboard_status(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let email = get_email_from_request(&req)?;

    let team = match team_storage::find_team_for_email(&email)? {
        Some(team) => team,
        None => return Ok(HttpResponse::Ok().json(json!({ "allowed": false }))),
    };

    let groupings = grouping_service::get_team_groupings(&team.team_name)?;
    let allowed = grouping_service::is_any_grouping_active(&groupings)?;

    Ok(HttpResponse::Ok().json(json!({
        "allowed": allowed,
        "team_name": team.team_name,
    })))
}

// Countdown snapshot, recomputed from a fresh oracle query on every call
#[get("/dashboard/countdown")]
async fn dashboard_countdown(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let email = get_email_from_request(&req)?;

    let team = match team_storage::find_team_for_email(&email)? {
        Some(team) => team,
        None => return Ok(HttpResponse::Ok().json(json!({ "active": false }))),
    };

    let groupings = grouping_service::get_team_groupings(&team.team_name)?;
    let status = match grouping_service::get_active_status(&groupings)? {
        Some(status) => status,
        None => return Ok(HttpResponse::Ok().json(json!({ "active": false }))),
    };

    let deadline = countdown::compute_deadline(status.updated_at, status.target_time);
    let time_left = countdown::time_left(deadline, Utc::now());

    Ok(HttpResponse::Ok().json(json!({
        "active": true,
        "grouping": status.grouping,
        "deadline": deadline,
        "time_left": time_left,
        "expired": time_left.is_none(),
    })))
}

// Announcements for every stage the team's groupings map to
#[get("/dashboard/updates")]
async fn dashboard_updates(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let email = get_email_from_request(&req)?;

    let team = match team_storage::find_team_for_email(&email)? {
        Some(team) => team,
        None => return Ok(HttpResponse::Ok().json(Vec::<serde_json::Value>::new())),
    };

    let groupings = grouping_service::get_team_groupings(&team.team_name)?;
    let stages = content_storage::find_stages_in(&groupings)?;

    if stages.is_empty() {
        warn!("⚠️ No stages found for groupings: {:?}", groupings);
        return Ok(HttpResponse::Ok().json(Vec::<serde_json::Value>::new()));
    }

    let stage_ids: Vec<String> = stages.iter().map(|s| s.stage_id.clone()).collect();
    let updates = content_storage::find_updates_for_stages(&stage_ids, &team.category)?;

    info!("✅ Found {} updates for team: {}", updates.len(), team.team_name);

    // Map stage ids back to stage names for display
    let response: Vec<serde_json::Value> = updates
        .into_iter()
        .map(|update| {
            let stage_name = stages
                .iter()
                .find(|s| s.stage_id == update.stage_id)
                .map(|s| s.stage_name.as_str())
                .unwrap_or("Unknown");
            json!({
                "stage_name": stage_name,
                "description": update.description,
                "content": update.content,
                "category": update.category,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

// Mission pack for the currently active stage, in the team's category
#[get("/dashboard/mission-pack")]
async fn dashboard_mission_pack(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let email = get_email_from_request(&req)?;

    let team = match team_storage::find_team_for_email(&email)? {
        Some(team) => team,
        None => return Ok(HttpResponse::Ok().json(json!({ "content": null }))),
    };

    let groupings = grouping_service::get_team_groupings(&team.team_name)?;
    let status = match grouping_service::get_active_status(&groupings)? {
        Some(status) => status,
        None => return Ok(HttpResponse::Ok().json(json!({ "content": null }))),
    };

    let stage = match content_storage::find_stage_by_name(&status.grouping)? {
        Some(stage) => stage,
        None => {
            warn!("⚠️ Stage not found for grouping: {}", status.grouping);
            return Ok(HttpResponse::Ok().json(json!({ "content": null })));
        }
    };

    let pack = content_storage::find_mission_pack(&stage.stage_id, &team.category)?;

    Ok(HttpResponse::Ok().json(json!({
        "content": pack.map(|p| p.content),
    })))
}

// Details of one bug in the active stage, with public image URLs
#[get("/dashboard/bugs/{bug_number}")]
async fn dashboard_bug(
    req: HttpRequest,
    path: web::Path<u32>,
) -> Result<HttpResponse, ServiceError> {
    let email = get_email_from_request(&req)?;
    let bug_number = path.into_inner();

    let team = team_storage::find_team_for_email(&email)?.ok_or(ServiceError::NotFound)?;

    let groupings = grouping_service::get_team_groupings(&team.team_name)?;
    let status = grouping_service::get_active_status(&groupings)?.ok_or(ServiceError::NotFound)?;

    let stage = match content_storage::find_stage_by_name(&status.grouping)? {
        Some(stage) => stage,
        None => {
            warn!("⚠️ Stage not found for grouping: {}", status.grouping);
            return Err(ServiceError::NotFound);
        }
    };

    let bug = match content_storage::find_bug(&stage.stage_id, bug_number, &team.category)? {
        Some(bug) => bug,
        None => {
            warn!(
                "⚠️ Bug #{} not found for stage {} in category {}",
                bug_number, stage.stage_name, team.category
            );
            return Err(ServiceError::NotFound);
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "bug_number": bug.bug_number,
        "description": bug.description,
        "bug_image": blob_storage::public_url_for_path(&bug.bug_image),
        "expected_behavior_image": blob_storage::public_url_for_path(&bug.expected_behavior_image),
    })))
}

// Register all dashboard routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard_status)
        .service(dashboard_countdown)
        .service(dashboard_updates)
        .service(dashboard_mission_pack)
        .service(dashboard_bug);
}
