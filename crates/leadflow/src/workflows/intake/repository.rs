use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{LeadSubmission, RoutingDecision, ScoredLead};

/// Identifier wrapper for stored leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// Lifecycle status tracked for a stored lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    Received,
    Routed,
    Queued,
    Cancelled,
}

impl LeadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeadStatus::Received => "received",
            LeadStatus::Routed => "routed",
            LeadStatus::Queued => "queued",
            LeadStatus::Cancelled => "cancelled",
        }
    }
}

/// Repository record pairing the scored lead with its routing decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    pub lead_id: LeadId,
    pub scored: ScoredLead,
    pub decision: Option<RoutingDecision>,
    pub status: LeadStatus,
}

impl LeadRecord {
    pub fn submission(&self) -> &LeadSubmission {
        &self.scored.submission
    }

    pub fn status_view(&self) -> LeadStatusView {
        let decision = self.decision.as_ref();
        LeadStatusView {
            lead_id: self.lead_id.clone(),
            status: self.status.label(),
            qualification: self.scored.qualification.label(),
            aggregate_score: self.scored.aggregate,
            response_sla: self.scored.response_sla.label(),
            priority: decision.map(|d| d.priority.label()),
            assigned_team: decision.map(|d| d.team.clone()),
            assigned_member: decision.and_then(|d| d.outcome.member_id()).map(|id| id.0.clone()),
            routing_reason: decision.map(|d| d.reason.clone()),
        }
    }
}

/// Storage abstraction so the intake service can be exercised in isolation.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError>;
    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError>;
    fn recent(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook where CRM and call-placement adapters subscribe to routed
/// leads.
pub trait NotificationSink: Send + Sync {
    fn publish(&self, notification: RoutingNotification) -> Result<(), NotificationError>;
}

/// Notification payload so routes/tests can assert the integration boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingNotification {
    pub template: String,
    pub lead_id: LeadId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a lead's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct LeadStatusView {
    pub lead_id: LeadId,
    pub status: &'static str,
    pub qualification: &'static str,
    pub aggregate_score: u8,
    pub response_sla: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_member: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_reason: Option<String>,
}
