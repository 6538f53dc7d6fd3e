use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::clock::{Clock, SystemClock};
use super::domain::{AssignmentOutcome, LeadSubmission, Priority, ScoredLead};
use super::repository::{
    LeadId, LeadRecord, LeadRepository, LeadStatus, NotificationError, NotificationSink,
    RepositoryError, RoutingNotification,
};
use super::roster::RosterStore;
use super::routing::{RoutingConfig, RoutingEngine, RoutingError};
use super::scoring::{LeadScorer, ScoringConfig};

/// Service composing the scorer, routing engine, roster, repository, and
/// notification sink into the intake pipeline: score, route, persist, notify.
pub struct LeadIntakeService<S, R, N, C = SystemClock> {
    scorer: LeadScorer<C>,
    engine: RoutingEngine,
    roster: Arc<S>,
    repository: Arc<R>,
    notifications: Arc<N>,
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

impl<S, R, N> LeadIntakeService<S, R, N, SystemClock>
where
    S: RosterStore + 'static,
    R: LeadRepository + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(
        roster: Arc<S>,
        repository: Arc<R>,
        notifications: Arc<N>,
        scoring: ScoringConfig,
        routing: RoutingConfig,
    ) -> Self {
        Self::with_clock(roster, repository, notifications, scoring, routing, SystemClock)
    }
}

impl<S, R, N, C> LeadIntakeService<S, R, N, C>
where
    S: RosterStore + 'static,
    R: LeadRepository + 'static,
    N: NotificationSink + 'static,
    C: Clock,
{
    pub fn with_clock(
        roster: Arc<S>,
        repository: Arc<R>,
        notifications: Arc<N>,
        scoring: ScoringConfig,
        routing: RoutingConfig,
        clock: C,
    ) -> Self {
        Self {
            scorer: LeadScorer::with_clock(scoring, clock),
            engine: RoutingEngine::new(routing),
            roster,
            repository,
            notifications,
        }
    }

    /// Score a submission without routing or persistence.
    pub fn score(&self, submission: LeadSubmission) -> ScoredLead {
        self.scorer.score(submission)
    }

    /// Run the full pipeline for one submission. Scoring always precedes
    /// routing; that ordering is the pipeline's only sequencing constraint.
    pub fn intake(&self, submission: LeadSubmission) -> Result<LeadRecord, IntakeServiceError> {
        let scored = self.scorer.score(submission);
        let decision = self.engine.route(&scored, self.roster.as_ref())?;

        let status = match decision.outcome {
            AssignmentOutcome::QueuedAtTeamLevel => LeadStatus::Queued,
            _ => LeadStatus::Routed,
        };
        let lead_id = next_lead_id();
        info!(
            lead = %lead_id.0,
            team = %decision.team,
            outcome = decision.outcome.label(),
            priority = decision.priority.label(),
            "lead routed"
        );

        let urgent = decision.priority == Priority::Urgent;
        let reserved = match &decision.outcome {
            AssignmentOutcome::Assigned { member_id } => Some(member_id.clone()),
            _ => None,
        };
        let record = LeadRecord {
            lead_id,
            scored,
            decision: Some(decision),
            status,
        };

        // A failed insert must not leave the reservation applied.
        let stored = match self.repository.insert(record) {
            Ok(stored) => stored,
            Err(err) => {
                if let Some(member_id) = reserved {
                    if let Err(release_err) = self.roster.release_capacity(&member_id) {
                        warn!(
                            member = %member_id.0,
                            error = %release_err,
                            "failed to release reservation after insert failure"
                        );
                    }
                }
                return Err(err.into());
            }
        };

        if urgent {
            self.notifications.publish(urgent_notification(&stored))?;
        }

        Ok(stored)
    }

    /// Process a batch independently: one lead's failure is reported in its
    /// slot and never halts the remaining submissions.
    pub fn intake_batch(
        &self,
        submissions: Vec<LeadSubmission>,
    ) -> Vec<Result<LeadRecord, IntakeServiceError>> {
        submissions
            .into_iter()
            .map(|submission| self.intake(submission))
            .collect()
    }

    /// Fetch a lead and current status for API responses.
    pub fn get(&self, lead_id: &LeadId) -> Result<LeadRecord, IntakeServiceError> {
        let record = self
            .repository
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Compensate a cancelled or failed downstream handoff: release the
    /// reserved capacity (degraded assignments never reserved any) and mark
    /// the record cancelled.
    pub fn cancel(&self, lead_id: &LeadId) -> Result<LeadRecord, IntakeServiceError> {
        let mut record = self
            .repository
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.status == LeadStatus::Cancelled {
            return Ok(record);
        }

        if record.status == LeadStatus::Routed {
            if let Some(AssignmentOutcome::Assigned { member_id }) =
                record.decision.as_ref().map(|decision| &decision.outcome)
            {
                self.roster
                    .release_capacity(member_id)
                    .map_err(RoutingError::from)?;
            }
        }

        record.status = LeadStatus::Cancelled;
        self.repository.update(record.clone())?;
        Ok(record)
    }
}

fn urgent_notification(record: &LeadRecord) -> RoutingNotification {
    let mut details = BTreeMap::new();
    details.insert(
        "qualification".to_string(),
        record.scored.qualification.label().to_string(),
    );
    details.insert(
        "response_sla".to_string(),
        record.scored.response_sla.label().to_string(),
    );
    if let Some(decision) = &record.decision {
        details.insert("team".to_string(), decision.team.clone());
        if let Some(member) = decision.outcome.member_id() {
            details.insert("member".to_string(), member.0.clone());
        }
    }

    RoutingNotification {
        template: "urgent_lead_routed".to_string(),
        lead_id: record.lead_id.clone(),
        details,
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
