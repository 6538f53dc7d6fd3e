use super::domain::{MemberId, TeamMember};

/// Storage abstraction over team rosters and their capacity counters.
///
/// `reserve_capacity` is the central contract: it must check and increment a
/// member's load as one atomic step, returning `Ok(false)` when the member is
/// already at capacity. The routing engine reads a team snapshot, picks a
/// candidate, then reserves; when the reservation reports `false` because a
/// concurrent caller won the slot, the engine re-runs candidate selection
/// instead of overshooting `max_load`.
pub trait RosterStore: Send + Sync {
    /// Snapshot of every member rostered to `team`. An unknown team is an
    /// empty roster, not an error.
    fn team_members(&self, team: &str) -> Result<Vec<TeamMember>, RosterError>;

    /// Atomically claim one unit of capacity. `Ok(false)` means the member
    /// was saturated when the claim was attempted.
    fn reserve_capacity(&self, member: &MemberId) -> Result<bool, RosterError>;

    /// Return one unit of capacity, compensating a cancelled or failed
    /// downstream handoff.
    fn release_capacity(&self, member: &MemberId) -> Result<(), RosterError>;
}

/// Roster failures. `Unavailable` is the only condition the routing engine
/// surfaces to its caller; everything else is recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("unknown team member: {0}")]
    UnknownMember(String),
    #[error("roster unavailable: {0}")]
    Unavailable(String),
}
