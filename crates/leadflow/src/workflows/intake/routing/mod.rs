mod candidates;
mod config;
mod priority;

pub use config::{RankWeights, RoutingConfig};

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::domain::{AssignmentOutcome, RoutingDecision, ScoredLead};
use super::roster::{RosterError, RosterStore};
use candidates::CandidatePool;
use priority::ReasonContext;

/// Failure raised by `route`. The engine degrades through every capacity
/// condition; only an unreachable roster store surfaces, because without it
/// no capacity bookkeeping can be trusted.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Maps a scored lead to a team and, when possible, a concrete member,
/// reserving one unit of that member's capacity as part of the decision.
pub struct RoutingEngine {
    config: RoutingConfig,
}

impl RoutingEngine {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Produce a routing decision for a well-formed scored lead.
    ///
    /// Selection and reservation run as a read-pick-reserve loop: when a
    /// reservation reports the candidate saturated (a concurrent caller won
    /// the last slot), the member is excluded and selection re-runs against a
    /// fresh snapshot. The loop is bounded by team size, after which the
    /// staged filter degrades to overflow or team-level queueing.
    pub fn route<S>(&self, lead: &ScoredLead, roster: &S) -> Result<RoutingDecision, RoutingError>
    where
        S: RosterStore + ?Sized,
    {
        let team = self.config.team_for(&lead.submission.case_type).to_string();
        let alternatives = self.config.alternatives(&team);
        let priority = priority::determine_priority(lead);
        let mut excluded = BTreeSet::new();

        loop {
            let members = roster.team_members(&team)?;

            let (pool, widened) =
                match candidates::select_candidates(&members, lead.qualification, &excluded) {
                    CandidatePool::Empty => {
                        warn!(team = %team, "no members rostered; queueing at team level");
                        let reason = priority::compose_reason(
                            lead,
                            &team,
                            &ReasonContext {
                                candidate: None,
                                widened: false,
                                degraded: false,
                                queued: true,
                            },
                        );
                        return Ok(RoutingDecision {
                            team,
                            outcome: AssignmentOutcome::QueuedAtTeamLevel,
                            priority,
                            reason,
                            estimated_response: lead.response_sla,
                            alternatives,
                        });
                    }
                    CandidatePool::Overflow(member) => {
                        warn!(
                            team = %team,
                            member = %member.id.0,
                            load = member.current_load,
                            max_load = member.max_load,
                            "team saturated; degraded assignment without reservation"
                        );
                        let reason = priority::compose_reason(
                            lead,
                            &team,
                            &ReasonContext {
                                candidate: None,
                                widened: false,
                                degraded: true,
                                queued: false,
                            },
                        );
                        return Ok(RoutingDecision {
                            team,
                            outcome: AssignmentOutcome::DegradedAssigned {
                                member_id: member.id,
                            },
                            priority,
                            reason,
                            estimated_response: lead.response_sla,
                            alternatives,
                        });
                    }
                    CandidatePool::Open(pool) => (pool, false),
                    CandidatePool::Widened(pool) => (pool, true),
                };

            let Some(candidate) = candidates::rank_candidates(pool, lead, &self.config.rank_weights)
            else {
                continue;
            };

            match roster.reserve_capacity(&candidate.member.id) {
                Ok(true) => {
                    let reason = priority::compose_reason(
                        lead,
                        &team,
                        &ReasonContext {
                            candidate: Some(&candidate),
                            widened,
                            degraded: false,
                            queued: false,
                        },
                    );
                    return Ok(RoutingDecision {
                        team,
                        outcome: AssignmentOutcome::Assigned {
                            member_id: candidate.member.id,
                        },
                        priority,
                        reason,
                        estimated_response: lead.response_sla,
                        alternatives,
                    });
                }
                Ok(false) => {
                    debug!(
                        member = %candidate.member.id.0,
                        "reservation lost to a concurrent caller; reselecting"
                    );
                    excluded.insert(candidate.member.id);
                }
                Err(RosterError::UnknownMember(member)) => {
                    debug!(member = %member, "member disappeared between read and reserve; reselecting");
                    excluded.insert(candidate.member.id);
                }
                Err(err @ RosterError::Unavailable(_)) => return Err(err.into()),
            }
        }
    }
}
