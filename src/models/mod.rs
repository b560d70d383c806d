// heimdall-service/src/models/mod.rs
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

// Team and membership models
pub mod team;
pub use team::*;

// Grouping, status and stage models
pub mod grouping;
pub use grouping::*;

// Submission variants
pub mod submission;
pub use submission::*;

// Stage-scoped dashboard content
pub mod content;
pub use content::*;

// JWT claims structure for authentication.
// Tokens are issued by the external auth collaborator; this service only
// verifies the signature and trusts the email claim.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String,  // Subject (user ID at the auth provider)
    pub email: String,
    pub exp: usize,   // Expiration time
    pub iat: usize,   // Issued at
}

// Custom error types
#[derive(Debug)]
pub enum ServiceError {
    InternalServerError,
    BadRequest(String),
    Unauthorized,
    NotFound,
    // Gate rejected a write: no grouping is currently active
    SubmissionClosed,
    // Attachment count/size/extension checks failed before any storage write
    Validation(String),
    // Blob store rejected or failed a file
    Upload(String),
    // Row insert/delete failed
    Write(String),
}

// Implement Display for ServiceError
impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::InternalServerError => write!(f, "Internal Server Error"),
            ServiceError::BadRequest(msg) => write!(f, "BadRequest: {}", msg),
            ServiceError::Unauthorized => write!(f, "Unauthorized"),
            ServiceError::NotFound => write!(f, "Not Found"),
            ServiceError::SubmissionClosed => write!(f, "Submission Closed"),
            ServiceError::Validation(msg) => write!(f, "Validation: {}", msg),
            ServiceError::Upload(msg) => write!(f, "Upload: {}", msg),
            ServiceError::Write(msg) => write!(f, "Write: {}", msg),
        }
    }
}

// Implement std::error::Error for ServiceError
impl std::error::Error for ServiceError {}

// Implement ResponseError for ServiceError
impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InternalServerError =>
                HttpResponse::InternalServerError().json("Internal Server Error"),
            ServiceError::BadRequest(ref message) =>
                HttpResponse::BadRequest().json(message),
            ServiceError::Unauthorized =>
                HttpResponse::Unauthorized().json("Unauthorized"),
            ServiceError::NotFound =>
                HttpResponse::NotFound().json("Not Found"),
            // The client is expected to reload and re-derive its gating
            // state instead of trusting a stale in-memory flag.
            ServiceError::SubmissionClosed =>
                HttpResponse::Conflict().json(json!({
                    "message": "The grouping is no longer active. Reload the page.",
                    "reload": true
                })),
            ServiceError::Validation(ref message) =>
                HttpResponse::BadRequest().json(json!({
                    "message": message,
                    "kind": "validation"
                })),
            ServiceError::Upload(ref message) =>
                HttpResponse::InternalServerError().json(json!({
                    "message": format!("Upload failed: {}", message),
                    "kind": "upload"
                })),
            ServiceError::Write(ref message) =>
                HttpResponse::InternalServerError().json(json!({
                    "message": format!("Write failed: {}", message),
                    "kind": "write"
                })),
        }
    }
}
