//! Lead intake scoring and routing.
//!
//! Two components run in strict sequence per submission: the [`scoring`]
//! engine turns a raw contact-form submission into a [`domain::ScoredLead`],
//! and the [`routing`] engine turns that into a [`domain::RoutingDecision`],
//! reserving capacity on the chosen team member. The roster, persistence,
//! and notification seams are traits so the pipeline can be exercised
//! against in-memory fixtures.

pub mod clock;
pub mod domain;
pub mod http;
pub mod repository;
pub mod roster;
pub mod routing;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use clock::{Clock, SystemClock};
pub use domain::{
    AssignmentOutcome, Availability, ContactMethod, FactorScores, LeadSubmission, MemberId,
    Priority, Qualification, ResponseSla, RoutingDecision, ScoredLead, TeamMember,
};
pub use http::intake_router;
pub use repository::{
    LeadId, LeadRecord, LeadRepository, LeadStatus, LeadStatusView, NotificationError,
    NotificationSink, RepositoryError, RoutingNotification,
};
pub use roster::{RosterError, RosterStore};
pub use routing::{RankWeights, RoutingConfig, RoutingEngine, RoutingError};
pub use scoring::{FactorWeights, LeadScorer, ScoringConfig};
pub use service::{IntakeServiceError, LeadIntakeService};
