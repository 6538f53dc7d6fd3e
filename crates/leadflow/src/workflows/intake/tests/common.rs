use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Local, TimeZone};
use serde_json::Value;

use crate::workflows::intake::clock::Clock;
use crate::workflows::intake::domain::{
    Availability, LeadSubmission, MemberId, TeamMember,
};
use crate::workflows::intake::repository::{
    LeadId, LeadRecord, LeadRepository, NotificationError, NotificationSink, RepositoryError,
    RoutingNotification,
};
use crate::workflows::intake::roster::{RosterError, RosterStore};
use crate::workflows::intake::routing::{RoutingConfig, RoutingEngine};
use crate::workflows::intake::scoring::{LeadScorer, ScoringConfig};
use crate::workflows::intake::service::LeadIntakeService;

#[derive(Debug, Clone, Copy)]
pub(super) struct FixedClock(pub(super) DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

pub(super) fn clock_at(year: i32, month: u32, day: u32, hour: u32) -> FixedClock {
    FixedClock(
        Local
            .with_ymd_and_hms(year, month, day, hour, 0, 0)
            .single()
            .expect("valid fixture time"),
    )
}

/// Wednesday, mid-morning.
pub(super) fn weekday_business_clock() -> FixedClock {
    clock_at(2026, 3, 4, 10)
}

pub(super) fn late_night_clock() -> FixedClock {
    clock_at(2026, 3, 4, 3)
}

pub(super) fn scorer() -> LeadScorer<FixedClock> {
    scorer_at(weekday_business_clock())
}

pub(super) fn scorer_at(clock: FixedClock) -> LeadScorer<FixedClock> {
    LeadScorer::with_clock(ScoringConfig::standard(), clock)
}

pub(super) fn engine() -> RoutingEngine {
    RoutingEngine::new(RoutingConfig::standard())
}

pub(super) fn injury_submission() -> LeadSubmission {
    LeadSubmission {
        name: "Jordan Avery".to_string(),
        email: "jordan.avery@example.com".to_string(),
        phone: Some("515-555-0100".to_string()),
        case_type: "Personal Injury".to_string(),
        message: "car accident, injured, hospital".to_string(),
        preferred_contact: None,
        location: Some("Des Moines, IA".to_string()),
        language: None,
    }
}

pub(super) fn inquiry_submission() -> LeadSubmission {
    LeadSubmission {
        name: "Sam Lowe".to_string(),
        email: "sam.lowe@example.com".to_string(),
        phone: None,
        case_type: "General Inquiry".to_string(),
        message: "just curious about your services".to_string(),
        preferred_contact: None,
        location: None,
        language: None,
    }
}

pub(super) fn submission_with(case_type: &str, message: &str) -> LeadSubmission {
    LeadSubmission {
        name: "Test Lead".to_string(),
        email: "lead@example.com".to_string(),
        phone: None,
        case_type: case_type.to_string(),
        message: message.to_string(),
        preferred_contact: None,
        location: None,
        language: None,
    }
}

pub(super) fn member(
    id: &str,
    specialties: &[&str],
    languages: &[&str],
    current_load: u32,
    max_load: u32,
    availability: Availability,
) -> TeamMember {
    TeamMember {
        id: MemberId(id.to_string()),
        name: format!("Agent {id}"),
        specialties: to_set(specialties),
        languages: to_set(languages),
        current_load,
        max_load,
        availability,
    }
}

fn to_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryRoster {
    inner: Arc<Mutex<RosterInner>>,
}

#[derive(Default)]
struct RosterInner {
    teams: HashMap<String, Vec<MemberId>>,
    members: HashMap<MemberId, TeamMember>,
}

impl MemoryRoster {
    pub(super) fn insert_team(&self, team: &str, members: Vec<TeamMember>) {
        let mut inner = self.inner.lock().expect("roster mutex poisoned");
        let ids: Vec<MemberId> = members.iter().map(|member| member.id.clone()).collect();
        inner.teams.insert(team.to_string(), ids);
        for member in members {
            inner.members.insert(member.id.clone(), member);
        }
    }

    pub(super) fn member(&self, id: &MemberId) -> Option<TeamMember> {
        let inner = self.inner.lock().expect("roster mutex poisoned");
        inner.members.get(id).cloned()
    }

    pub(super) fn total_load(&self) -> u32 {
        let inner = self.inner.lock().expect("roster mutex poisoned");
        inner.members.values().map(|member| member.current_load).sum()
    }
}

impl RosterStore for MemoryRoster {
    fn team_members(&self, team: &str) -> Result<Vec<TeamMember>, RosterError> {
        let inner = self.inner.lock().expect("roster mutex poisoned");
        let members = inner
            .teams
            .get(team)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.members.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(members)
    }

    fn reserve_capacity(&self, member: &MemberId) -> Result<bool, RosterError> {
        let mut inner = self.inner.lock().expect("roster mutex poisoned");
        let record = inner
            .members
            .get_mut(member)
            .ok_or_else(|| RosterError::UnknownMember(member.0.clone()))?;
        if record.current_load < record.max_load {
            record.current_load += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn release_capacity(&self, member: &MemberId) -> Result<(), RosterError> {
        let mut inner = self.inner.lock().expect("roster mutex poisoned");
        let record = inner
            .members
            .get_mut(member)
            .ok_or_else(|| RosterError::UnknownMember(member.0.clone()))?;
        record.current_load = record.current_load.saturating_sub(1);
        Ok(())
    }
}

pub(super) struct UnavailableRoster;

impl RosterStore for UnavailableRoster {
    fn team_members(&self, _team: &str) -> Result<Vec<TeamMember>, RosterError> {
        Err(RosterError::Unavailable("roster offline".to_string()))
    }

    fn reserve_capacity(&self, _member: &MemberId) -> Result<bool, RosterError> {
        Err(RosterError::Unavailable("roster offline".to_string()))
    }

    fn release_capacity(&self, _member: &MemberId) -> Result<(), RosterError> {
        Err(RosterError::Unavailable("roster offline".to_string()))
    }
}

/// Rejects the first reservation attempt, simulating a concurrent caller
/// winning the slot between selection and reservation.
pub(super) struct RejectFirstRoster {
    inner: MemoryRoster,
    rejected: AtomicBool,
}

impl RejectFirstRoster {
    pub(super) fn new(inner: MemoryRoster) -> Self {
        Self {
            inner,
            rejected: AtomicBool::new(false),
        }
    }
}

impl RosterStore for RejectFirstRoster {
    fn team_members(&self, team: &str) -> Result<Vec<TeamMember>, RosterError> {
        self.inner.team_members(team)
    }

    fn reserve_capacity(&self, member: &MemberId) -> Result<bool, RosterError> {
        if !self.rejected.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }
        self.inner.reserve_capacity(member)
    }

    fn release_capacity(&self, member: &MemberId) -> Result<(), RosterError> {
        self.inner.release_capacity(member)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLeadRepository {
    records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
}

impl LeadRepository for MemoryLeadRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.lead_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.lead_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.lead_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().take(limit).cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<RoutingNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<RoutingNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationSink for MemoryNotifications {
    fn publish(&self, notification: RoutingNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) type TestService =
    LeadIntakeService<MemoryRoster, MemoryLeadRepository, MemoryNotifications, FixedClock>;

pub(super) fn build_service() -> (TestService, MemoryRoster, MemoryLeadRepository, MemoryNotifications)
{
    let roster = MemoryRoster::default();
    seed_standard_teams(&roster);
    let repository = MemoryLeadRepository::default();
    let notifications = MemoryNotifications::default();
    let service = LeadIntakeService::with_clock(
        Arc::new(roster.clone()),
        Arc::new(repository.clone()),
        Arc::new(notifications.clone()),
        ScoringConfig::standard(),
        RoutingConfig::standard(),
        weekday_business_clock(),
    );
    (service, roster, repository, notifications)
}

pub(super) fn seed_standard_teams(roster: &MemoryRoster) {
    roster.insert_team(
        "personal-injury",
        vec![
            member(
                "pi-1",
                &["personal injury", "car accident"],
                &["en", "es"],
                0,
                8,
                Availability::Available,
            ),
            member("pi-2", &["personal injury"], &["en"], 0, 6, Availability::Available),
        ],
    );
    roster.insert_team(
        "criminal-defense",
        vec![member(
            "cd-1",
            &["criminal defense"],
            &["en"],
            0,
            6,
            Availability::Available,
        )],
    );
    roster.insert_team(
        "intake",
        vec![member("intake-1", &[], &["en", "es"], 0, 10, Availability::Available)],
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
