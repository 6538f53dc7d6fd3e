use chrono::{DateTime, Datelike, Local, Timelike, Weekday};

use super::super::domain::{FactorScores, LeadSubmission};
use super::config::{FactorWeights, ScoringConfig};

const URGENCY_BASELINE: u32 = 50;
const URGENCY_ELEVATED_CAP: u32 = 95;
const COMPLETENESS_BASELINE: u32 = 40;
const ENGAGEMENT_BASELINE: u32 = 30;
const SPECIFICITY_CAP: u32 = 20;
const QUESTION_CAP: u32 = 10;

pub(crate) fn score_factors(
    submission: &LeadSubmission,
    config: &ScoringConfig,
    now: DateTime<Local>,
) -> FactorScores {
    FactorScores {
        urgency: urgency_score(submission, config),
        case_value: config.case_value(&submission.case_type),
        completeness: completeness_score(submission),
        engagement: engagement_score(submission, config),
        timing: timing_score(now),
    }
}

pub(crate) fn aggregate_score(factors: &FactorScores, weights: &FactorWeights) -> u8 {
    let total = f64::from(factors.urgency) * weights.urgency
        + f64::from(factors.case_value) * weights.case_value
        + f64::from(factors.completeness) * weights.completeness
        + f64::from(factors.engagement) * weights.engagement
        + f64::from(factors.timing) * weights.timing;
    total.round().clamp(0.0, 100.0) as u8
}

fn urgency_score(submission: &LeadSubmission, config: &ScoringConfig) -> u8 {
    let text = submission.message.to_lowercase();

    if config
        .critical_keywords
        .iter()
        .any(|keyword| text.contains(keyword.as_str()))
    {
        return 100;
    }

    let mut score = URGENCY_BASELINE;
    for keyword in &config.elevated_keywords {
        if text.contains(keyword.as_str()) {
            score = (score + u32::from(config.elevated_increment)).min(URGENCY_ELEVATED_CAP);
        }
    }

    if config.is_urgent_case_type(&submission.case_type) {
        score = (score + u32::from(config.urgent_case_bonus)).min(100);
    }

    score as u8
}

fn completeness_score(submission: &LeadSubmission) -> u8 {
    let mut score = COMPLETENESS_BASELINE;

    if has_text(submission.phone.as_deref()) {
        score += 25;
    }
    if submission.preferred_contact.is_some() {
        score += 10;
    }
    if has_text(submission.location.as_deref()) {
        score += 15;
    }

    let length = submission.message.chars().count();
    if length > 100 {
        score += 10;
    }
    if length > 300 {
        score += 10;
    }

    score.min(100) as u8
}

fn engagement_score(submission: &LeadSubmission, config: &ScoringConfig) -> u8 {
    let text = submission.message.to_lowercase();
    let mut score = ENGAGEMENT_BASELINE;

    let length = submission.message.chars().count();
    if length > 50 {
        score += 10;
    }
    if length > 150 {
        score += 10;
    }

    let matched = config
        .specificity_keywords
        .iter()
        .filter(|keyword| text.contains(keyword.as_str()))
        .count() as u32;
    score += (matched * 5).min(SPECIFICITY_CAP);

    let questions = submission.message.matches('?').count() as u32;
    score += (questions * 5).min(QUESTION_CAP);

    score.min(100) as u8
}

/// Step function of local hour-of-day and day-of-week. Late-night submissions
/// rank above evenings: a 2am contact is plausibly an emergency.
fn timing_score(now: DateTime<Local>) -> u8 {
    let weekend = matches!(now.weekday(), Weekday::Sat | Weekday::Sun);
    match now.hour() {
        9..=16 => {
            if weekend {
                70
            } else {
                100
            }
        }
        17..=21 => 80,
        22..=23 | 0..=4 => 85,
        _ => 60,
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|text| !text.trim().is_empty())
}
