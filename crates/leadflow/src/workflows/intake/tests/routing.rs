use super::common::*;
use crate::workflows::intake::domain::{
    AssignmentOutcome, Availability, FactorScores, MemberId, Priority, Qualification, ResponseSla,
    ScoredLead,
};
use crate::workflows::intake::roster::RosterError;
use crate::workflows::intake::routing::RoutingError;

fn scored_lead(case_type: &str, message: &str) -> ScoredLead {
    scorer().score(submission_with(case_type, message))
}

fn assigned_member(decision_outcome: &AssignmentOutcome) -> &MemberId {
    decision_outcome
        .member_id()
        .expect("decision names a member")
}

#[test]
fn resolves_primary_team_and_alternatives() {
    let roster = MemoryRoster::default();
    seed_standard_teams(&roster);

    let decision = engine()
        .route(&scorer().score(injury_submission()), &roster)
        .expect("routes");

    assert_eq!(decision.team, "personal-injury");
    assert_eq!(
        decision.alternatives,
        vec!["intake".to_string(), "business-law".to_string()]
    );
    assert_eq!(decision.estimated_response, ResponseSla::Minutes15);
}

#[test]
fn unmapped_case_type_routes_to_default_team() {
    let roster = MemoryRoster::default();
    seed_standard_teams(&roster);

    let decision = engine()
        .route(&scored_lead("Maritime Salvage", "hello"), &roster)
        .expect("routes");

    assert_eq!(decision.team, "intake");
    assert!(matches!(decision.outcome, AssignmentOutcome::Assigned { .. }));
}

#[test]
fn specialist_wins_when_language_matches() {
    // Specialist at 90% load: 40 + 30 + 3 = 73. Fresh generalist: 0 + 30 + 30 = 60.
    let roster = MemoryRoster::default();
    roster.insert_team(
        "personal-injury",
        vec![
            member("specialist", &["personal injury"], &["en"], 9, 10, Availability::Available),
            member("generalist", &[], &["en"], 0, 10, Availability::Available),
        ],
    );

    let mut submission = injury_submission();
    submission.language = Some("en".to_string());
    let lead = scorer().score(submission);

    let decision = engine().route(&lead, &roster).expect("routes");
    assert_eq!(assigned_member(&decision.outcome).0, "specialist");
    assert_eq!(
        roster.member(&MemberId("specialist".to_string())).unwrap().current_load,
        10
    );
}

#[test]
fn loaded_specialist_loses_on_language_mismatch() {
    // Specialist misses the language: 40 + 0 + 3 = 43. Generalist: 0 + 30 + 30 = 60.
    let roster = MemoryRoster::default();
    roster.insert_team(
        "personal-injury",
        vec![
            member("specialist", &["personal injury"], &["en"], 9, 10, Availability::Available),
            member("generalist", &[], &["es"], 0, 10, Availability::Available),
        ],
    );

    let mut submission = injury_submission();
    submission.language = Some("es".to_string());
    let lead = scorer().score(submission);

    let decision = engine().route(&lead, &roster).expect("routes");
    assert_eq!(assigned_member(&decision.outcome).0, "generalist");
}

#[test]
fn equal_fit_ties_break_toward_lower_load() {
    // Both members score 30 + 30·0.5 = 45; the absolute load differs.
    let roster = MemoryRoster::default();
    roster.insert_team(
        "intake",
        vec![
            member("heavier", &[], &["en"], 2, 4, Availability::Available),
            member("lighter", &[], &["en"], 1, 2, Availability::Available),
        ],
    );

    let decision = engine()
        .route(&scored_lead("General Inquiry", "hi"), &roster)
        .expect("routes");

    assert_eq!(assigned_member(&decision.outcome).0, "lighter");
}

#[test]
fn hot_lead_widens_to_busy_members() {
    let roster = MemoryRoster::default();
    roster.insert_team(
        "personal-injury",
        vec![member("busy-1", &["personal injury"], &["en"], 2, 8, Availability::Busy)],
    );

    let decision = engine()
        .route(&scorer().score(injury_submission()), &roster)
        .expect("routes");

    assert!(matches!(decision.outcome, AssignmentOutcome::Assigned { .. }));
    assert!(decision.reason.contains("widened to busy members"));
    assert_eq!(
        roster.member(&MemberId("busy-1".to_string())).unwrap().current_load,
        3
    );
}

#[test]
fn warm_lead_does_not_widen_to_busy_members() {
    let roster = MemoryRoster::default();
    roster.insert_team(
        "family-law",
        vec![member("fl-1", &["family law"], &["en"], 2, 8, Availability::Busy)],
    );

    let lead = scored_lead("Family Law", "thinking about updating our parenting plan");
    assert_eq!(lead.qualification, Qualification::Warm);

    let decision = engine().route(&lead, &roster).expect("routes");
    assert!(decision.outcome.is_degraded());
    assert_eq!(
        roster.member(&MemberId("fl-1".to_string())).unwrap().current_load,
        2,
        "degraded assignment must not reserve capacity"
    );
}

#[test]
fn saturated_offline_team_still_yields_a_decision() {
    let roster = MemoryRoster::default();
    roster.insert_team(
        "personal-injury",
        vec![
            member("full-1", &["personal injury"], &["en"], 8, 8, Availability::Offline),
            member("full-2", &["personal injury"], &["en"], 3, 6, Availability::Offline),
        ],
    );

    let decision = engine()
        .route(&scorer().score(injury_submission()), &roster)
        .expect("never errors on saturation");

    // Lowest load ratio wins the overflow fallback: 3/6 < 8/8.
    assert_eq!(assigned_member(&decision.outcome).0, "full-2");
    assert!(decision.outcome.is_degraded());
    assert!(decision.reason.contains("soft overflow"));
    assert_eq!(roster.total_load(), 11, "no capacity reserved past saturation");
}

#[test]
fn empty_team_queues_at_team_level() {
    let roster = MemoryRoster::default();
    roster.insert_team("intake", Vec::new());

    let decision = engine()
        .route(&scored_lead("General Inquiry", "hi"), &roster)
        .expect("routes");

    assert_eq!(decision.outcome, AssignmentOutcome::QueuedAtTeamLevel);
    assert!(decision.reason.contains("queued at team level"));
}

#[test]
fn lost_reservation_race_reselects_another_member() {
    let inner = MemoryRoster::default();
    inner.insert_team(
        "personal-injury",
        vec![
            member("first-choice", &["personal injury"], &["en"], 0, 5, Availability::Available),
            member("second-choice", &[], &["en"], 0, 5, Availability::Available),
        ],
    );
    let roster = RejectFirstRoster::new(inner.clone());

    let decision = engine()
        .route(&scorer().score(injury_submission()), &roster)
        .expect("recovers from the lost race");

    assert_eq!(assigned_member(&decision.outcome).0, "second-choice");
    assert_eq!(
        inner.member(&MemberId("second-choice".to_string())).unwrap().current_load,
        1
    );
    assert_eq!(
        inner.member(&MemberId("first-choice".to_string())).unwrap().current_load,
        0
    );
}

#[test]
fn roster_unavailability_is_surfaced() {
    let result = engine().route(&scorer().score(injury_submission()), &UnavailableRoster);
    assert!(matches!(
        result,
        Err(RoutingError::Roster(RosterError::Unavailable(_)))
    ));
}

#[test]
fn priority_follows_ordered_rules() {
    let roster = MemoryRoster::default();
    seed_standard_teams(&roster);
    let engine = engine();

    let route_with = |factors: FactorScores, aggregate: u8, qualification: Qualification| {
        let lead = ScoredLead {
            submission: submission_with("General Inquiry", "hi"),
            factors,
            aggregate,
            qualification,
            estimated_value: 1_500,
            response_sla: ResponseSla::Hour1,
        };
        engine.route(&lead, &roster).expect("routes").priority
    };

    let base = FactorScores {
        urgency: 50,
        case_value: 50,
        completeness: 40,
        engagement: 30,
        timing: 60,
    };

    assert_eq!(
        route_with(FactorScores { urgency: 92, ..base }, 55, Qualification::Warm),
        Priority::Urgent
    );
    assert_eq!(route_with(base, 72, Qualification::Warm), Priority::High);
    assert_eq!(
        route_with(FactorScores { case_value: 85, ..base }, 55, Qualification::Warm),
        Priority::High
    );
    assert_eq!(route_with(base, 30, Qualification::Cold), Priority::Low);
    assert_eq!(route_with(base, 45, Qualification::Warm), Priority::Normal);
}

#[test]
fn reason_documents_fired_rules() {
    let roster = MemoryRoster::default();
    seed_standard_teams(&roster);

    let decision = engine()
        .route(&scorer().score(injury_submission()), &roster)
        .expect("routes");

    assert!(decision.reason.contains("HOT lead"));
    assert!(decision.reason.contains("specialty match"));
    assert!(decision.reason.contains("% load"));
    assert!(decision.reason.contains("high-value case type"));
}
