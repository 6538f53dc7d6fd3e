mod config;
mod factors;
pub(crate) mod qualification;

pub use config::{FactorWeights, ScoringConfig};

use super::clock::{Clock, SystemClock};
use super::domain::{LeadSubmission, ScoredLead};

/// Stateless scorer applying the injected policy tables to one submission.
///
/// Scoring is total: malformed or missing optional fields degrade to baseline
/// contributions and unknown case types resolve through the configured
/// defaults, so `score` has no failure mode.
pub struct LeadScorer<C = SystemClock> {
    config: ScoringConfig,
    clock: C,
}

impl LeadScorer<SystemClock> {
    pub fn new(config: ScoringConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> LeadScorer<C> {
    pub fn with_clock(config: ScoringConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, submission: LeadSubmission) -> ScoredLead {
        let factors = factors::score_factors(&submission, &self.config, self.clock.now());
        let aggregate = factors::aggregate_score(&factors, &self.config.weights);
        let qualification = qualification::qualify(aggregate, &factors);
        let estimated_value =
            qualification::estimated_value(&submission.case_type, &factors, &self.config);
        let response_sla = qualification::response_sla(qualification);

        ScoredLead {
            submission,
            factors,
            aggregate,
            qualification,
            estimated_value,
            response_sla,
        }
    }
}
