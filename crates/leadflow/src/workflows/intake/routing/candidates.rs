use std::collections::BTreeSet;

use super::super::domain::{
    normalize_key, Availability, MemberId, Qualification, ScoredLead, TeamMember,
};
use super::config::RankWeights;

/// Result of the staged candidate filter.
pub(crate) enum CandidatePool {
    /// Members that are available with spare capacity.
    Open(Vec<TeamMember>),
    /// HOT widening: busy members with spare capacity, never offline ones.
    Widened(Vec<TeamMember>),
    /// Soft overflow: the least-loaded member regardless of capacity or
    /// availability. Capacity is not reserved on this path.
    Overflow(TeamMember),
    /// Nobody rostered at all.
    Empty,
}

/// Candidate chosen by the rank step, with the indicator terms retained for
/// reason composition.
pub(crate) struct RankedCandidate {
    pub member: TeamMember,
    pub fit_score: f64,
    pub specialty_match: bool,
    pub language_match: bool,
}

/// Staged filter over a team snapshot. `excluded` holds members that lost a
/// reservation race this routing pass and are skipped on re-selection; the
/// overflow fallback ignores it because no reservation happens there.
pub(crate) fn select_candidates(
    members: &[TeamMember],
    qualification: Qualification,
    excluded: &BTreeSet<MemberId>,
) -> CandidatePool {
    if members.is_empty() {
        return CandidatePool::Empty;
    }

    let eligible: Vec<&TeamMember> = members
        .iter()
        .filter(|member| !excluded.contains(&member.id))
        .collect();

    let open: Vec<TeamMember> = eligible
        .iter()
        .filter(|member| member.availability == Availability::Available && member.has_capacity())
        .map(|member| (*member).clone())
        .collect();
    if !open.is_empty() {
        return CandidatePool::Open(open);
    }

    if qualification == Qualification::Hot {
        let widened: Vec<TeamMember> = eligible
            .iter()
            .filter(|member| member.availability != Availability::Offline && member.has_capacity())
            .map(|member| (*member).clone())
            .collect();
        if !widened.is_empty() {
            return CandidatePool::Widened(widened);
        }
    }

    let fallback = members.iter().min_by(|a, b| {
        a.load_ratio()
            .total_cmp(&b.load_ratio())
            .then_with(|| a.current_load.cmp(&b.current_load))
    });
    match fallback {
        Some(member) => CandidatePool::Overflow(member.clone()),
        None => CandidatePool::Empty,
    }
}

/// Rank a non-degraded pool: `40·specialty + 30·language + 30·(1 − load)`,
/// ties broken by the lower current load. An absent lead language counts as a
/// match for every member so the optional field stays ordering-neutral.
pub(crate) fn rank_candidates(
    pool: Vec<TeamMember>,
    lead: &ScoredLead,
    weights: &RankWeights,
) -> Option<RankedCandidate> {
    let case_key = normalize_key(&lead.submission.case_type);

    pool.into_iter()
        .map(|member| {
            let specialty_match = member.matches_specialty(&case_key);
            let language_match = match lead.submission.language.as_deref() {
                Some(language) => member.speaks(language),
                None => true,
            };
            let fit_score = weights.specialty * f64::from(u8::from(specialty_match))
                + weights.language * f64::from(u8::from(language_match))
                + weights.load * (1.0 - member.load_ratio());
            RankedCandidate {
                member,
                fit_score,
                specialty_match,
                language_match,
            }
        })
        .max_by(|a, b| {
            a.fit_score
                .total_cmp(&b.fit_score)
                .then_with(|| b.member.current_load.cmp(&a.member.current_load))
        })
}
