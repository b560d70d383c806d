use crate::models::ServiceError;
use crate::utils::{get_claims_from_request, team_storage};
use actix_web::{get, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

// Get current principal info (requires authentication)
#[get("/auth/me")]
async fn me(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let claims = get_claims_from_request(&req)?;

    info!("👤 Get principal info for: {}", claims.email);

    let team = team_storage::find_team_for_email(&claims.email)?;

    Ok(HttpResponse::Ok().json(json!({
        "user_id": claims.sub,
        "email": claims.email,
        "team_name": team.map(|t| t.team_name),
    })))
}

// Resolve the full team details for the signed-in email
#[get("/team")]
async fn get_team(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let claims = get_claims_from_request(&req)?;

    info!("🔍 Resolving team for user: {}", claims.email);

    let team = match team_storage::find_team_for_email(&claims.email)? {
        Some(team) => team,
        None => {
            error!("❌ No team found for user: {}", claims.email);
            return Err(ServiceError::NotFound);
        }
    };

    info!("✅ Resolved team: {} for user: {}", team.team_name, claims.email);

    Ok(HttpResponse::Ok().json(team))
}

// Register all team routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(me).service(get_team);
}
