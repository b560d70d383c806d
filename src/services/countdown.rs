// heimdall-service/src/services/countdown.rs
//
// Session countdown. The deadline is derived from the oracle's anchor
// timestamp on every query; nothing survives a restart.
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

// All wall-clock displays apply a fixed +8h regional offset to the stored
// UTC instants. Hard-coded competition policy, not configuration.
pub const REGIONAL_UTC_OFFSET_HOURS: i64 = 8;

// Recomputation cadence for live countdown displays
pub const TICK_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

pub fn regional_offset() -> Duration {
    Duration::hours(REGIONAL_UTC_OFFSET_HOURS)
}

// Deadline for a session anchored at `anchor_utc`. The window length comes
// from the status row alone; a missing target_time means the window is
// already over, not some implicit default length.
pub fn compute_deadline(anchor_utc: DateTime<Utc>, target_time: Option<i64>) -> DateTime<Utc> {
    anchor_utc + regional_offset() + Duration::seconds(target_time.unwrap_or(0))
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLeft {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

// Remaining time at `now`, split for display. None once the deadline has
// passed.
pub fn time_left(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Option<TimeLeft> {
    let difference = deadline.signed_duration_since(now).num_seconds();

    if difference > 0 {
        return Some(TimeLeft {
            hours: difference / 3600,
            minutes: (difference / 60) % 60,
            seconds: difference % 60,
        });
    }

    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    // Counting down
    Running(TimeLeft),
    // The deadline passed since the previous tick; reported once
    Expired,
    // Every tick after expiry: the display stays frozen at zero
    Frozen,
}

// Periodic 1 Hz countdown over a fixed deadline. Expiry is signalled on
// exactly one tick so side effects are not re-triggered; afterwards the
// clock freezes at zero rather than forcing a reload.
#[derive(Debug)]
pub struct CountdownClock {
    deadline: DateTime<Utc>,
    expiry_signalled: bool,
}

impl CountdownClock {
    pub fn new(deadline: DateTime<Utc>) -> CountdownClock {
        CountdownClock {
            deadline,
            expiry_signalled: false,
        }
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        match time_left(self.deadline, now) {
            Some(left) => Tick::Running(left),
            None => {
                if self.expiry_signalled {
                    Tick::Frozen
                } else {
                    self.expiry_signalled = true;
                    Tick::Expired
                }
            }
        }
    }
}

// Render a stored UTC instant in the regional wall clock, as shown in the
// submission history table.
pub fn regional_display(instant: DateTime<Utc>) -> String {
    (instant + regional_offset())
        .format("%d/%m/%Y, %H:%M:%S")
        .to_string()
}
