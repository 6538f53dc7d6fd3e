use super::super::domain::{Priority, Qualification, ScoredLead};
use super::super::scoring::qualification::hot_override;
use super::candidates::RankedCandidate;

/// Ordered priority rules, first match wins. Independent of the scoring SLA:
/// a lead can carry a WARM one-hour SLA and still dispatch URGENT on raw
/// urgency alone.
pub(crate) fn determine_priority(lead: &ScoredLead) -> Priority {
    if lead.factors.urgency >= 90 || lead.qualification == Qualification::Hot {
        return Priority::Urgent;
    }
    if lead.aggregate >= 70 || lead.factors.case_value >= 85 {
        return Priority::High;
    }
    if lead.aggregate < 40 || lead.qualification == Qualification::Cold {
        return Priority::Low;
    }
    Priority::Normal
}

pub(crate) struct ReasonContext<'a> {
    pub candidate: Option<&'a RankedCandidate>,
    pub widened: bool,
    pub degraded: bool,
    pub queued: bool,
}

/// Reviewer-facing audit trail of which rules fired. Documentation only;
/// nothing downstream parses it.
pub(crate) fn compose_reason(lead: &ScoredLead, team: &str, context: &ReasonContext<'_>) -> String {
    let mut clauses = vec![format!(
        "{} lead (aggregate {})",
        lead.qualification.label(),
        lead.aggregate
    )];

    if let Some(override_rule) = hot_override(lead.aggregate, &lead.factors) {
        clauses.push(override_rule.to_string());
    }
    if lead.factors.urgency >= 90 {
        clauses.push(format!("critical urgency {}", lead.factors.urgency));
    }
    if lead.factors.case_value >= 85 {
        clauses.push("high-value case type".to_string());
    }

    if let Some(candidate) = context.candidate {
        if candidate.specialty_match {
            clauses.push("specialty match".to_string());
        }
        if let Some(language) = lead.submission.language.as_deref() {
            if candidate.language_match {
                clauses.push(format!("language match ({language})"));
            }
        }
        clauses.push(format!(
            "member at {:.0}% load",
            candidate.member.load_ratio() * 100.0
        ));
    }

    if context.widened {
        clauses.push("widened to busy members for HOT lead".to_string());
    }
    if context.degraded {
        clauses.push(format!("soft overflow: {team} fully saturated"));
    }
    if context.queued {
        clauses.push(format!("no members rostered for {team}; queued at team level"));
    }

    clauses.join("; ")
}
