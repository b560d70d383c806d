use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// File attached to a submission request. Content travels base64-encoded
// inside the JSON body and is decoded before validation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementType {
    Basic,
    Advanced,
}

// Request payloads, one per submission variant
#[derive(Serialize, Deserialize, Debug)]
pub struct BugFixRequest {
    pub description: String,
    pub screenshots: Vec<AttachmentUpload>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct EnhancementRequest {
    pub enhancement_type: EnhancementType,
    pub description: String,
    pub justification: String,
    pub screenshots: Vec<AttachmentUpload>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BrainstormMapRequest {
    pub file: AttachmentUpload,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PresentationRequest {
    pub video_link: String,
}

// Exactly one of `project_link` / `archive` must be present.
#[derive(Serialize, Deserialize, Debug)]
pub struct ProjectRequest {
    pub project_link: Option<String>,
    pub archive: Option<AttachmentUpload>,
}

// A stored submission row. Created once, never updated; deletable by the
// owning team. `stage` is the active grouping name at submission time and
// `penalty` is the penalty-window flag from the same gate snapshot.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Submission {
    pub id: String,
    pub team_id: String,
    pub author_name: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    pub stage: Option<String>,
    pub penalty: bool,
    #[serde(flatten)]
    pub details: SubmissionDetails,
}

// Variant payloads, one case per submission type. Attachment fields hold
// resolved public URLs, stamped at insert time.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionDetails {
    BugFix {
        bug_number: u32,
        description: String,
        screenshots: Vec<String>,
    },
    Enhancement {
        enhancement_type: EnhancementType,
        description: String,
        justification: String,
        screenshots: Vec<String>,
    },
    BrainstormMap {
        file_url: String,
    },
    Presentation {
        video_link: String,
    },
    Project {
        project_link: Option<String>,
        archive_url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    BugFix,
    Enhancement,
    BrainstormMap,
    Presentation,
    Project,
}

impl SubmissionKind {
    pub const ALL: [SubmissionKind; 5] = [
        SubmissionKind::BugFix,
        SubmissionKind::Enhancement,
        SubmissionKind::BrainstormMap,
        SubmissionKind::Presentation,
        SubmissionKind::Project,
    ];

    // Storage collection each variant lives in
    pub fn collection(&self) -> &'static str {
        match self {
            SubmissionKind::BugFix => "bug_submissions",
            SubmissionKind::Enhancement => "enhancements",
            SubmissionKind::BrainstormMap => "brainstorm_maps",
            SubmissionKind::Presentation => "presentations",
            SubmissionKind::Project => "projects",
        }
    }

    pub fn from_collection(name: &str) -> Option<SubmissionKind> {
        SubmissionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.collection() == name)
    }
}

// One line of the history table: a submission from any collection,
// flattened for display.
#[derive(Serialize, Debug)]
pub struct SubmissionSummary {
    pub id: String,
    pub collection: String,
    pub label: String,
    pub submitted_by: String,
    // Rendered in the fixed regional (+8h) wall clock
    pub submission_date: String,
    pub stage: Option<String>,
    pub penalty: bool,
    pub details: SubmissionDetails,
}
