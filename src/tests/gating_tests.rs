// Oracle, countdown and gate behavior. These run against the real storage
// layer with uniquely-named rows, plus the pure selection and deadline
// functions directly.
use crate::models::{
    GroupingState, GroupingStatus, ServiceError, Team, TeamMember,
};
use crate::services::countdown::{self, CountdownClock, Tick};
use crate::services::grouping_service;
use crate::tests::helpers;
use crate::utils::team_storage;
use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

fn status_row(
    grouping: &str,
    state: GroupingState,
    updated_at: chrono::DateTime<Utc>,
    target_time: Option<i64>,
    penalty: bool,
) -> GroupingStatus {
    GroupingStatus {
        grouping: grouping.to_string(),
        status: state,
        updated_at,
        target_time,
        penalty,
    }
}

#[test]
fn oracle_ignores_non_active_rows() {
    let t = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    let rows = vec![
        status_row("StageA", GroupingState::Inactive, t, Some(7200), false),
        status_row("StageB", GroupingState::Ended, t, Some(7200), false),
    ];

    assert!(grouping_service::select_active_status(rows).is_none());
}

#[test]
fn oracle_returns_single_active_row_unchanged() {
    let t = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    let rows = vec![
        status_row("StageA", GroupingState::Inactive, t - Duration::hours(1), None, false),
        status_row("StageB", GroupingState::Active, t, Some(5400), true),
    ];

    let status = grouping_service::select_active_status(rows).unwrap();
    assert_eq!(status.grouping, "StageB");
    assert_eq!(status.updated_at, t);
    assert_eq!(status.target_time, Some(5400));
    assert!(status.penalty);
}

#[test]
fn oracle_anchors_on_earliest_update_regardless_of_order() {
    let t1 = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    let t2 = t1 + Duration::minutes(20);

    let rows = vec![
        status_row("StageB", GroupingState::Active, t2, Some(3600), false),
        status_row("StageA", GroupingState::Active, t1, Some(7200), false),
    ];
    let reversed: Vec<GroupingStatus> = rows.iter().cloned().rev().collect();

    let status = grouping_service::select_active_status(rows).unwrap();
    assert_eq!(status.grouping, "StageA");
    assert_eq!(status.updated_at, t1);
    assert_eq!(status.target_time, Some(7200));

    let status = grouping_service::select_active_status(reversed).unwrap();
    assert_eq!(status.grouping, "StageA");
}

#[test]
fn oracle_breaks_anchor_ties_by_grouping_name() {
    let t = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    let rows = vec![
        status_row("StageZ", GroupingState::Active, t, None, false),
        status_row("StageA", GroupingState::Active, t, None, false),
    ];

    let status = grouping_service::select_active_status(rows).unwrap();
    assert_eq!(status.grouping, "StageA");
}

#[test]
fn oracle_returns_none_for_zero_memberships() {
    assert!(grouping_service::get_active_status(&[]).unwrap().is_none());
}

#[test]
fn oracle_returns_none_when_no_membership_is_active() {
    let fixture = helpers::seed_team("Senior-Scratch");
    helpers::set_status(
        &fixture.grouping,
        GroupingState::Inactive,
        Utc::now(),
        Some(7200),
        false,
    );

    let groupings = grouping_service::get_team_groupings(&fixture.team_name).unwrap();
    assert_eq!(groupings, vec![fixture.grouping.clone()]);
    assert!(grouping_service::get_active_status(&groupings).unwrap().is_none());

    helpers::cleanup_team(&fixture);
}

// Team "Alpha" scenario: two groupings, both active, the one updated
// earlier carries the anchor.
#[test]
fn oracle_prefers_earliest_of_the_teams_active_groupings() {
    let fixture = helpers::seed_team("Senior-Scratch");
    let second_grouping = format!("{}-second", fixture.grouping);
    let second_row_id = Uuid::new_v4().to_string();
    crate::utils::grouping_storage::save_team_grouping(&crate::models::TeamGrouping {
        id: second_row_id.clone(),
        team_name: fixture.team_name.clone(),
        grouping: second_grouping.clone(),
    })
    .unwrap();

    let t1 = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    let t2 = t1 + Duration::minutes(5);
    helpers::set_status(&fixture.grouping, GroupingState::Active, t1, Some(7200), false);
    helpers::set_status(&second_grouping, GroupingState::Active, t2, Some(7200), false);

    let groupings = grouping_service::get_team_groupings(&fixture.team_name).unwrap();
    assert_eq!(groupings.len(), 2);

    let status = grouping_service::get_active_status(&groupings).unwrap().unwrap();
    assert_eq!(status.grouping, fixture.grouping);
    assert_eq!(status.updated_at, t1);
    assert_eq!(status.target_time, Some(7200));

    helpers::remove_status(&second_grouping);
    helpers::remove_row("team_groupings", &second_row_id);
    helpers::cleanup_team(&fixture);
}

#[test]
fn countdown_remaining_decreases_to_the_second() {
    let anchor = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    let duration = 7200;
    let deadline = countdown::compute_deadline(anchor, Some(duration));

    // The deadline sits the regional offset plus the window length past
    // the anchor
    assert_eq!(
        deadline,
        anchor + Duration::hours(countdown::REGIONAL_UTC_OFFSET_HOURS) + Duration::seconds(duration)
    );

    let window_start = anchor + countdown::regional_offset();
    let mut previous = duration + 1;
    for elapsed in [0, 1, 59, 60, 3599, 7199] {
        let left = countdown::time_left(deadline, window_start + Duration::seconds(elapsed))
            .unwrap_or_else(|| panic!("expected time left at {}s", elapsed));
        let total = left.hours * 3600 + left.minutes * 60 + left.seconds;
        assert_eq!(total, duration - elapsed);
        assert!(total < previous);
        previous = total;
    }

    // At and past the deadline there is nothing left
    assert!(countdown::time_left(deadline, deadline).is_none());
    assert!(countdown::time_left(deadline, deadline + Duration::seconds(1)).is_none());
}

#[test]
fn countdown_with_no_target_time_is_already_over() {
    let anchor = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    let deadline = countdown::compute_deadline(anchor, None);

    assert_eq!(deadline, anchor + countdown::regional_offset());
    assert!(countdown::time_left(deadline, anchor + countdown::regional_offset()).is_none());
}

#[test]
fn countdown_clock_signals_expiry_exactly_once() {
    let anchor = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    let deadline = countdown::compute_deadline(anchor, Some(2));
    let mut clock = CountdownClock::new(deadline);

    assert_eq!(countdown::TICK_INTERVAL.as_secs(), 1);
    assert_eq!(clock.deadline(), deadline);

    match clock.tick(deadline - Duration::seconds(1)) {
        Tick::Running(left) => assert_eq!((left.hours, left.minutes, left.seconds), (0, 0, 1)),
        other => panic!("expected a running tick, got {:?}", other),
    }

    assert_eq!(clock.tick(deadline), Tick::Expired);
    assert_eq!(clock.tick(deadline + Duration::seconds(1)), Tick::Frozen);
    assert_eq!(clock.tick(deadline + Duration::seconds(2)), Tick::Frozen);
}

#[test]
fn gate_blocks_and_skips_the_write_when_nothing_is_active() {
    let fixture = helpers::seed_team("Senior-Scratch");
    helpers::set_status(
        &fixture.grouping,
        GroupingState::Inactive,
        Utc::now(),
        Some(7200),
        false,
    );

    let mut called = false;
    let result = grouping_service::guarded_write::<(), _>(&fixture.team_name, |_| {
        called = true;
        Ok(())
    });

    assert!(matches!(result, Err(ServiceError::SubmissionClosed)));
    assert!(!called);

    helpers::cleanup_team(&fixture);
}

#[test]
fn gate_passes_the_fresh_snapshot_to_the_write() {
    let fixture = helpers::seed_team("Senior-Scratch");
    helpers::set_status(
        &fixture.grouping,
        GroupingState::Active,
        Utc::now(),
        Some(7200),
        true,
    );

    let grouping = grouping_service::guarded_write(&fixture.team_name, |status| {
        assert!(status.penalty);
        Ok(status.grouping.clone())
    })
    .unwrap();
    assert_eq!(grouping, fixture.grouping);

    helpers::cleanup_team(&fixture);
}

// Identity resolution: the teacher contact wins over a member contact on
// another team, regardless of scan order.
#[test]
fn identity_prefers_teacher_match_over_member_match() {
    let suffix = Uuid::new_v4().to_string();
    let shared_email = format!("both-{}@example.com", suffix);

    let member_team = Team {
        id: format!("team-m-{}", suffix),
        team_name: format!("Member Team {}", suffix),
        category: "Senior-Scratch".to_string(),
        teacher_email: format!("other-{}@example.com", suffix),
        teacher_name: "Someone Else".to_string(),
        team_members: vec![TeamMember {
            name: "Shared Person".to_string(),
            parent_email: shared_email.clone(),
        }],
        created_at: Utc::now(),
    };
    let teacher_team = Team {
        id: format!("team-t-{}", suffix),
        team_name: format!("Teacher Team {}", suffix),
        category: "Senior-Scratch".to_string(),
        teacher_email: shared_email.clone(),
        teacher_name: "Shared Person".to_string(),
        team_members: Vec::new(),
        created_at: Utc::now(),
    };
    team_storage::save_team(&member_team).unwrap();
    team_storage::save_team(&teacher_team).unwrap();

    let details = team_storage::find_team_for_email(&shared_email)
        .unwrap()
        .unwrap();
    assert_eq!(details.team_id, teacher_team.id);
    assert_eq!(details.author_name, "Shared Person");

    helpers::remove_row("teams", &member_team.id);
    helpers::remove_row("teams", &teacher_team.id);
}

#[test]
fn identity_resolves_member_contact_to_member_name() {
    let fixture = helpers::seed_team("Senior-Scratch");

    let details = team_storage::find_team_for_email(&fixture.member_email)
        .unwrap()
        .unwrap();
    assert_eq!(details.team_id, fixture.team_id);
    assert_eq!(details.author_name, "Test Member");

    let details = team_storage::find_team_for_email(&fixture.teacher_email)
        .unwrap()
        .unwrap();
    assert_eq!(details.author_name, "Test Teacher");

    helpers::cleanup_team(&fixture);
}

#[test]
fn unknown_email_resolves_to_no_team() {
    let email = format!("nobody-{}@example.com", Uuid::new_v4());
    assert!(team_storage::find_team_for_email(&email).unwrap().is_none());
}
