use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// A (team, grouping) membership row. Teams can belong to several contest
// tracks at once. Created by external provisioning; read-only here.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TeamGrouping {
    pub id: String,
    pub team_name: String,
    pub grouping: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GroupingState {
    Active,
    Inactive,
    Ended,
}

// Status row for one grouping, keyed by grouping name. Flipped by the
// competition operators, never by this service. `updated_at` is the moment
// the operator last touched the row; for an active grouping that is the
// session start used to anchor the countdown.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GroupingStatus {
    pub grouping: String,
    pub status: GroupingState,
    pub updated_at: DateTime<Utc>,
    // Submission window length in seconds. Absent means the window is
    // already over as far as the countdown is concerned.
    pub target_time: Option<i64>,
    // Penalty window: submissions still accepted but flagged for scoring
    #[serde(default)]
    pub penalty: bool,
}

// The oracle's answer when at least one of a team's groupings is active:
// the earliest-updated active row, carried as the shared session anchor.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ActiveStatus {
    pub grouping: String,
    pub updated_at: DateTime<Utc>,
    pub target_time: Option<i64>,
    pub penalty: bool,
}

// A named competition phase. Stage names map 1:1 to grouping names at
// lookup time; the opaque id scopes content rows (bugs, mission packs,
// updates).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Stage {
    pub stage_id: String,
    pub stage_name: String,
}
