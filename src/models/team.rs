use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// A competition team row. Provisioned by the registration process;
// read-only to this service.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Team {
    pub id: String,
    pub team_name: String,
    // Contest category tag, e.g. "Senior-Scratch". Content queries filter
    // on this so teams only see material for their own category.
    pub category: String,
    pub teacher_email: String,
    pub teacher_name: String,
    pub team_members: Vec<TeamMember>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TeamMember {
    pub name: String,
    pub parent_email: String,
}

// Resolved identity for a signed-in email: which team it belongs to and
// the display name to stamp on submissions.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TeamDetails {
    pub team_id: String,
    pub team_name: String,
    pub author_name: String,
    pub category: String,
}
