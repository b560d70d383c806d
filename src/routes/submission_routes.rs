// heimdall-service/src/routes/submission_routes.rs
//
// The write side of the dashboard. Every POST runs the same sequence:
// resolve the team, validate attachments, then pass a write closure
// through the submission gate so the grouping window is re-checked at the
// moment of the write.
use crate::models::{
    AttachmentUpload, BrainstormMapRequest, BugFixRequest, EnhancementRequest, EnhancementType,
    PresentationRequest, ProjectRequest, ServiceError, Submission, SubmissionDetails,
    SubmissionKind, SubmissionSummary, TeamDetails,
};
use crate::services::{countdown, grouping_service};
use crate::utils::{blob_storage, get_email_from_request, submission_storage, team_storage};
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use chrono::Utc;
use lazy_static::lazy_static;
use log::{error, info};
use regex::Regex;
use serde_json::json;
use uuid::Uuid;

const MAX_FILES: usize = 4;
const MAX_FILE_SIZE: usize = 3 * 1024 * 1024; // 3 MiB

const BUG_SCREENSHOTS_BUCKET: &str = "bug_screenshots";
const ENHANCEMENT_SCREENSHOTS_BUCKET: &str = "enhancement_screenshots";
const BRAINSTORM_MAPS_BUCKET: &str = "brainstorm_maps";
const PROJECT_FILES_BUCKET: &str = "project_files";

lazy_static! {
    static ref LINK_RE: Regex = Regex::new(r"^https?://\S+$").unwrap();
}

struct DecodedFile {
    file_name: String,
    bytes: Vec<u8>,
}

// Decode base64 attachment bodies up front so size checks see real bytes
fn decode_attachments(files: &[AttachmentUpload]) -> Result<Vec<DecodedFile>, ServiceError> {
    files
        .iter()
        .map(|file| {
            let bytes = base64::decode(&file.content).map_err(|_| {
                ServiceError::Validation(format!("{} is not valid base64.", file.file_name))
            })?;
            Ok(DecodedFile {
                file_name: file.file_name.clone(),
                bytes,
            })
        })
        .collect()
}

// All attachment checks run before any storage write
fn validate_attachments(
    files: &[DecodedFile],
    allowed_extensions: Option<&[&str]>,
) -> Result<(), ServiceError> {
    if files.is_empty() {
        return Err(ServiceError::Validation(
            "At least one file is required.".to_string(),
        ));
    }

    if files.len() > MAX_FILES {
        return Err(ServiceError::Validation(format!(
            "Maximum of {} files allowed.",
            MAX_FILES
        )));
    }

    for file in files {
        // File names become blob path segments
        if file.file_name.is_empty()
            || file.file_name.contains('/')
            || file.file_name.contains("..")
        {
            return Err(ServiceError::Validation(format!(
                "Invalid file name: {}",
                file.file_name
            )));
        }

        if file.bytes.len() > MAX_FILE_SIZE {
            return Err(ServiceError::Validation(format!(
                "{} exceeds 3MB limit.",
                file.file_name
            )));
        }

        if let Some(allowed) = allowed_extensions {
            let extension = file
                .file_name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_lowercase());

            let ok = extension
                .as_deref()
                .map_or(false, |ext| allowed.contains(&ext));
            if !ok {
                return Err(ServiceError::Validation(format!(
                    "{} must be one of: {}",
                    file.file_name,
                    allowed.join(", ")
                )));
            }
        }
    }

    Ok(())
}

fn validate_link(link: &str) -> Result<(), ServiceError> {
    if !LINK_RE.is_match(link) {
        return Err(ServiceError::Validation(format!("Invalid link: {}", link)));
    }
    Ok(())
}

// Upload attachments one by one under a millisecond-stamped path. The
// first failure aborts the batch; blobs already written stay where they
// are and the pending row insert never happens.
fn upload_files(
    bucket: &str,
    prefix: &str,
    files: &[DecodedFile],
) -> Result<Vec<String>, ServiceError> {
    let mut urls = Vec::new();

    for file in files {
        let path = format!(
            "{}/{}-{}",
            prefix,
            Utc::now().timestamp_millis(),
            file.file_name
        );
        blob_storage::save_blob(bucket, &path, &file.bytes)?;
        urls.push(blob_storage::public_url(bucket, &path));
    }

    Ok(urls)
}

fn resolve_team(email: &str) -> Result<TeamDetails, ServiceError> {
    match team_storage::find_team_for_email(email)? {
        Some(team) => Ok(team),
        None => {
            error!("❌ No team information found for: {}", email);
            Err(ServiceError::NotFound)
        }
    }
}

// Submit a bug fix: description plus 1..4 code screenshots
#[post("/submissions/bugs/{bug_number}")]
async fn submit_bug_fix(
    req: HttpRequest,
    path: web::Path<u32>,
    body: web::Json<BugFixRequest>,
) -> Result<HttpResponse, ServiceError> {
    let email = get_email_from_request(&req)?;
    let bug_number = path.into_inner();

    info!("📝 Bug #{} fix submission from: {}", bug_number, email);

    let team = resolve_team(&email)?;

    let files = decode_attachments(&body.screenshots)?;
    validate_attachments(&files, None)?;

    let submission = grouping_service::guarded_write(&team.team_name, |status| {
        let prefix = format!("{}/{}", team.team_id, bug_number);
        let screenshots = upload_files(BUG_SCREENSHOTS_BUCKET, &prefix, &files)?;

        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            team_id: team.team_id.clone(),
            author_name: team.author_name.clone(),
            created_at: Utc::now(),
            stage: Some(status.grouping.clone()),
            penalty: status.penalty,
            details: SubmissionDetails::BugFix {
                bug_number,
                description: body.description.clone(),
                screenshots,
            },
        };

        submission_storage::insert_submission(SubmissionKind::BugFix, &submission)?;
        Ok(submission)
    })?;

    info!("✅ Bug fix submitted: {}", submission.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Your bug fix has been submitted for review.",
        "submission_id": submission.id,
    })))
}

// Submit an enhancement: type, description, justification, 1..4 screenshots
#[post("/submissions/enhancement")]
async fn submit_enhancement(
    req: HttpRequest,
    body: web::Json<EnhancementRequest>,
) -> Result<HttpResponse, ServiceError> {
    let email = get_email_from_request(&req)?;

    info!("📝 Enhancement submission from: {}", email);

    let team = resolve_team(&email)?;

    let files = decode_attachments(&body.screenshots)?;
    validate_attachments(&files, None)?;

    let submission = grouping_service::guarded_write(&team.team_name, |status| {
        let screenshots = upload_files(ENHANCEMENT_SCREENSHOTS_BUCKET, &team.team_id, &files)?;

        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            team_id: team.team_id.clone(),
            author_name: team.author_name.clone(),
            created_at: Utc::now(),
            stage: Some(status.grouping.clone()),
            penalty: status.penalty,
            details: SubmissionDetails::Enhancement {
                enhancement_type: body.enhancement_type,
                description: body.description.clone(),
                justification: body.justification.clone(),
                screenshots,
            },
        };

        submission_storage::insert_submission(SubmissionKind::Enhancement, &submission)?;
        Ok(submission)
    })?;

    info!("✅ Enhancement submitted: {}", submission.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Your enhancement has been submitted successfully.",
        "submission_id": submission.id,
    })))
}

// Submit a brainstorm map: a single PDF
#[post("/submissions/brainstorm-map")]
async fn submit_brainstorm_map(
    req: HttpRequest,
    body: web::Json<BrainstormMapRequest>,
) -> Result<HttpResponse, ServiceError> {
    let email = get_email_from_request(&req)?;

    info!("📝 Brainstorm map submission from: {}", email);

    let team = resolve_team(&email)?;

    let files = decode_attachments(std::slice::from_ref(&body.file))?;
    validate_attachments(&files, Some(&["pdf"]))?;

    let submission = grouping_service::guarded_write(&team.team_name, |status| {
        let urls = upload_files(BRAINSTORM_MAPS_BUCKET, &team.team_id, &files)?;

        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            team_id: team.team_id.clone(),
            author_name: team.author_name.clone(),
            created_at: Utc::now(),
            stage: Some(status.grouping.clone()),
            penalty: status.penalty,
            details: SubmissionDetails::BrainstormMap {
                file_url: urls.into_iter().next().unwrap_or_default(),
            },
        };

        submission_storage::insert_submission(SubmissionKind::BrainstormMap, &submission)?;
        Ok(submission)
    })?;

    info!("✅ Brainstorm map submitted: {}", submission.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Your brainstorm map has been submitted successfully.",
        "submission_id": submission.id,
    })))
}

// Submit a presentation: an external video link
#[post("/submissions/presentation")]
async fn submit_presentation(
    req: HttpRequest,
    body: web::Json<PresentationRequest>,
) -> Result<HttpResponse, ServiceError> {
    let email = get_email_from_request(&req)?;

    info!("📝 Presentation submission from: {}", email);

    let team = resolve_team(&email)?;

    validate_link(&body.video_link)?;

    let submission = grouping_service::guarded_write(&team.team_name, |status| {
        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            team_id: team.team_id.clone(),
            author_name: team.author_name.clone(),
            created_at: Utc::now(),
            stage: Some(status.grouping.clone()),
            penalty: status.penalty,
            details: SubmissionDetails::Presentation {
                video_link: body.video_link.clone(),
            },
        };

        submission_storage::insert_submission(SubmissionKind::Presentation, &submission)?;
        Ok(submission)
    })?;

    info!("✅ Presentation submitted: {}", submission.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Your presentation video link has been submitted successfully.",
        "submission_id": submission.id,
    })))
}

// Submit project files: an external link or one uploaded .sb3 archive
#[post("/submissions/project")]
async fn submit_project(
    req: HttpRequest,
    body: web::Json<ProjectRequest>,
) -> Result<HttpResponse, ServiceError> {
    let email = get_email_from_request(&req)?;

    info!("📝 Project submission from: {}", email);

    let team = resolve_team(&email)?;

    let files = match (&body.project_link, &body.archive) {
        (Some(link), None) => {
            validate_link(link)?;
            Vec::new()
        }
        (None, Some(archive)) => {
            let files = decode_attachments(std::slice::from_ref(archive))?;
            validate_attachments(&files, Some(&["sb3"]))?;
            files
        }
        _ => {
            return Err(ServiceError::BadRequest(
                "Provide either a project link or a project archive.".to_string(),
            ));
        }
    };

    let submission = grouping_service::guarded_write(&team.team_name, |status| {
        let archive_url = if files.is_empty() {
            None
        } else {
            upload_files(PROJECT_FILES_BUCKET, &team.team_id, &files)?
                .into_iter()
                .next()
        };

        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            team_id: team.team_id.clone(),
            author_name: team.author_name.clone(),
            created_at: Utc::now(),
            stage: Some(status.grouping.clone()),
            penalty: status.penalty,
            details: SubmissionDetails::Project {
                project_link: body.project_link.clone(),
                archive_url,
            },
        };

        submission_storage::insert_submission(SubmissionKind::Project, &submission)?;
        Ok(submission)
    })?;

    info!("✅ Project submitted: {}", submission.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Your project has been submitted successfully.",
        "submission_id": submission.id,
    })))
}

fn label_for(details: &SubmissionDetails) -> String {
    match details {
        SubmissionDetails::BugFix { bug_number, .. } => format!("Bug #{}", bug_number),
        SubmissionDetails::Enhancement {
            enhancement_type, ..
        } => match enhancement_type {
            EnhancementType::Advanced => "Advanced Enhancement".to_string(),
            EnhancementType::Basic => "Basic Enhancement".to_string(),
        },
        SubmissionDetails::BrainstormMap { .. } => "Brainstorm Map".to_string(),
        SubmissionDetails::Presentation { .. } => "Presentation".to_string(),
        SubmissionDetails::Project { .. } => "Project".to_string(),
    }
}

// All of the team's submissions across every collection, newest first
// within each stage/type group
#[get("/submissions/history")]
async fn submission_history(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let email = get_email_from_request(&req)?;

    info!("📋 Fetching submission history for: {}", email);

    let team = match team_storage::find_team_for_email(&email)? {
        Some(team) => team,
        None => return Ok(HttpResponse::Ok().json(Vec::<SubmissionSummary>::new())),
    };

    let mut rows: Vec<(SubmissionKind, Submission)> = Vec::new();
    for kind in SubmissionKind::ALL {
        for submission in submission_storage::find_submissions_for_team(kind, &team.team_id)? {
            rows.push((kind, submission));
        }
    }

    // Sort by stage, then type label, then most recent first
    rows.sort_by(|(_, a), (_, b)| {
        let stage_a = a.stage.as_deref().unwrap_or("N/A");
        let stage_b = b.stage.as_deref().unwrap_or("N/A");
        stage_a
            .cmp(stage_b)
            .then_with(|| label_for(&a.details).cmp(&label_for(&b.details)))
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    let summaries: Vec<SubmissionSummary> = rows
        .into_iter()
        .map(|(kind, submission)| SubmissionSummary {
            id: submission.id,
            collection: kind.collection().to_string(),
            label: label_for(&submission.details),
            submitted_by: submission.author_name,
            submission_date: countdown::regional_display(submission.created_at),
            stage: submission.stage,
            penalty: submission.penalty,
            details: submission.details,
        })
        .collect();

    info!("✅ Found {} submissions for team: {}", summaries.len(), team.team_name);

    Ok(HttpResponse::Ok().json(summaries))
}

// Hard delete of one submission row
#[delete("/submissions/{collection}/{id}")]
async fn delete_submission(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let email = get_email_from_request(&req)?;
    let (collection, id) = path.into_inner();

    info!("🗑️ Delete submission {}/{} requested by: {}", collection, id, email);

    let kind = SubmissionKind::from_collection(&collection).ok_or_else(|| {
        ServiceError::BadRequest(format!("Unknown collection: {}", collection))
    })?;

    if !submission_storage::delete_submission(kind, &id)? {
        return Err(ServiceError::NotFound);
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "The submission has been removed successfully.",
    })))
}

// Register all submission routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_bug_fix)
        .service(submit_enhancement)
        .service(submit_brainstorm_map)
        .service(submit_presentation)
        .service(submit_project)
        .service(submission_history)
        .service(delete_submission);
}
