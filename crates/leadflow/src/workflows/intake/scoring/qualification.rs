use super::super::domain::{FactorScores, Qualification, ResponseSla};
use super::config::ScoringConfig;

const URGENCY_OVERRIDE: u8 = 90;
const CASE_VALUE_OVERRIDE: u8 = 85;
const VALUE_URGENCY_MULTIPLIER: f64 = 1.2;
const VALUE_ENGAGEMENT_MULTIPLIER: f64 = 1.1;

/// Ordered tier rules, first match wins. The two override rules let a
/// critical-urgency or high-value lead reach HOT below the plain 75 cutoff.
pub(crate) fn qualify(aggregate: u8, factors: &FactorScores) -> Qualification {
    if factors.urgency >= URGENCY_OVERRIDE && aggregate >= 60 {
        return Qualification::Hot;
    }
    if factors.case_value >= CASE_VALUE_OVERRIDE && aggregate >= 70 {
        return Qualification::Hot;
    }
    if aggregate >= 75 {
        return Qualification::Hot;
    }
    if aggregate >= 50 {
        return Qualification::Warm;
    }
    Qualification::Cold
}

/// Which HOT override fired, if any. Feeds the routing reason text.
pub(crate) fn hot_override(aggregate: u8, factors: &FactorScores) -> Option<&'static str> {
    if factors.urgency >= URGENCY_OVERRIDE && aggregate >= 60 {
        return Some("urgency override");
    }
    if factors.case_value >= CASE_VALUE_OVERRIDE && aggregate >= 70 {
        return Some("case-value override");
    }
    None
}

/// Heuristic monetary estimate: category base, lifted for urgent and highly
/// engaged leads. Multipliers compose.
pub(crate) fn estimated_value(
    case_type: &str,
    factors: &FactorScores,
    config: &ScoringConfig,
) -> u32 {
    let mut value = f64::from(config.value_base(case_type));
    if factors.urgency >= 80 {
        value *= VALUE_URGENCY_MULTIPLIER;
    }
    if factors.engagement >= 70 {
        value *= VALUE_ENGAGEMENT_MULTIPLIER;
    }
    value.round() as u32
}

pub(crate) const fn response_sla(qualification: Qualification) -> ResponseSla {
    match qualification {
        Qualification::Hot => ResponseSla::Minutes15,
        Qualification::Warm => ResponseSla::Hour1,
        Qualification::Cold => ResponseSla::Hours24,
    }
}
