use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use leadflow::workflows::intake::{
    Availability, LeadId, LeadRecord, LeadRepository, MemberId, NotificationError,
    NotificationSink, RepositoryError, RosterError, RosterStore, RoutingNotification, TeamMember,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Single-mutex roster: the reservation check and increment run under one
/// lock, which is the atomicity the routing engine's contract requires.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRoster {
    inner: Arc<Mutex<RosterInner>>,
}

#[derive(Default)]
struct RosterInner {
    teams: HashMap<String, Vec<MemberId>>,
    members: HashMap<MemberId, TeamMember>,
}

impl InMemoryRoster {
    pub(crate) fn insert_team(&self, team: &str, members: Vec<TeamMember>) {
        let mut inner = self.inner.lock().expect("roster mutex poisoned");
        let ids: Vec<MemberId> = members.iter().map(|member| member.id.clone()).collect();
        inner.teams.insert(team.to_string(), ids);
        for member in members {
            inner.members.insert(member.id.clone(), member);
        }
    }

    /// Team snapshots ordered by team name, for demo and ops output.
    pub(crate) fn snapshot(&self) -> Vec<(String, Vec<TeamMember>)> {
        let inner = self.inner.lock().expect("roster mutex poisoned");
        let mut teams: Vec<(String, Vec<TeamMember>)> = inner
            .teams
            .iter()
            .map(|(team, ids)| {
                let members = ids
                    .iter()
                    .filter_map(|id| inner.members.get(id).cloned())
                    .collect();
                (team.clone(), members)
            })
            .collect();
        teams.sort_by(|a, b| a.0.cmp(&b.0));
        teams
    }
}

impl RosterStore for InMemoryRoster {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
}

impl LeadRepository for InMemoryLeadRepository {
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
        if guard.contains_key(&record.lead_id) {
            guard.insert(record.lead_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<LeadRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| b.lead_id.0.cmp(&a.lead_id.0));
        records.truncate(limit);
        Ok(records)
    }
}

/// Log-only sink standing in for the CRM/call-placement adapters that
/// subscribe to routed leads in production.
#[derive(Default, Clone)]
pub(crate) struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn publish(&self, notification: RoutingNotification) -> Result<(), NotificationError> {
        info!(
            template = %notification.template,
            lead = %notification.lead_id.0,
            team = notification.details.get("team").map(String::as_str).unwrap_or("-"),
            "routing notification"
        );
        Ok(())
    }
}

pub(crate) fn standard_roster() -> InMemoryRoster {
    let roster = InMemoryRoster::default();
    roster.insert_team(
        "personal-injury",
        vec![
            agent("maya-torres", "Maya Torres", &["personal injury", "car accident"], &["en", "es"], 8),
            agent("dan-whitfield", "Dan Whitfield", &["personal injury"], &["en"], 6),
        ],
    );
    roster.insert_team(
        "criminal-defense",
        vec![
            agent("lena-ortiz", "Lena Ortiz", &["criminal defense"], &["en", "es"], 6),
            agent("rob-calder", "Rob Calder", &["criminal defense"], &["en"], 6),
        ],
    );
    roster.insert_team(
        "family-law",
        vec![agent("ivy-nakamura", "Ivy Nakamura", &["family law"], &["en"], 7)],
    );
    roster.insert_team(
        "immigration",
        vec![agent("karim-haddad", "Karim Haddad", &["immigration"], &["en", "es", "ar"], 7)],
    );
    roster.insert_team(
        "business-law",
        vec![agent("june-park", "June Park", &["business law"], &["en"], 5)],
    );
    roster.insert_team(
        "estate-planning",
        vec![agent("olive-brandt", "Olive Brandt", &["estate planning"], &["en"], 5)],
    );
    roster.insert_team(
        "intake",
        vec![
            agent("sasha-reed", "Sasha Reed", &[], &["en", "es"], 12),
            agent("tom-ellis", "Tom Ellis", &[], &["en"], 12),
        ],
    );
    roster
}

fn agent(
    id: &str,
    name: &str,
    specialties: &[&str],
    languages: &[&str],
    max_load: u32,
) -> TeamMember {
    TeamMember {
        id: MemberId(id.to_string()),
        name: name.to_string(),
        specialties: to_set(specialties),
        languages: to_set(languages),
        current_load: 0,
        max_load,
        availability: Availability::Available,
    }
}

fn to_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}
