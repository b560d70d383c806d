use serde::{Deserialize, Serialize};

// Stage-scoped dashboard content. All of these rows are authored by the
// competition operators; the service only reads and displays them.

// A bug teams are asked to fix. Image fields are blob-store paths; public
// URLs are derived at read time from the configured base.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BugContent {
    pub id: String,
    pub stage_id: String,
    pub bug_number: u32,
    pub category: String,
    pub description: String,
    pub bug_image: String,
    pub expected_behavior_image: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MissionPack {
    pub id: String,
    pub stage_id: String,
    pub category: String,
    pub content: String,
}

// An announcement shown on the dashboard landing page
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StageUpdate {
    pub id: String,
    pub stage_id: String,
    pub category: String,
    pub description: String,
    pub content: String,
}
