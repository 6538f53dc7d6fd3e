use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for rostered team members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub String);

/// Raw contact-form submission as collected by the web intake form.
///
/// Optional fields may be absent or blank; the scorer degrades them to
/// baseline contributions rather than rejecting the lead. The case type is a
/// free-form category label and unknown labels resolve through the configured
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub case_type: String,
    pub message: String,
    #[serde(default)]
    pub preferred_contact: Option<ContactMethod>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Contact channel the lead asked to be reached on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    Phone,
    Email,
    Text,
}

impl ContactMethod {
    pub const fn label(self) -> &'static str {
        match self {
            ContactMethod::Phone => "phone",
            ContactMethod::Email => "email",
            ContactMethod::Text => "text",
        }
    }
}

/// The five independent factor scores, each bounded to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorScores {
    pub urgency: u8,
    pub case_value: u8,
    pub completeness: u8,
    pub engagement: u8,
    pub timing: u8,
}

/// Coarse urgency/value classification derived from the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Qualification {
    Hot,
    Warm,
    Cold,
}

impl Qualification {
    pub const fn label(self) -> &'static str {
        match self {
            Qualification::Hot => "HOT",
            Qualification::Warm => "WARM",
            Qualification::Cold => "COLD",
        }
    }
}

/// Target first-response window attached to a scored lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseSla {
    #[serde(rename = "15_minutes")]
    Minutes15,
    #[serde(rename = "1_hour")]
    Hour1,
    #[serde(rename = "24_hours")]
    Hours24,
}

impl ResponseSla {
    pub const fn label(self) -> &'static str {
        match self {
            ResponseSla::Minutes15 => "15 minutes",
            ResponseSla::Hour1 => "1 hour",
            ResponseSla::Hours24 => "24 hours",
        }
    }
}

/// A submission after scoring: factors, weighted aggregate, tier, estimated
/// case value, and the response SLA implied by the tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredLead {
    pub submission: LeadSubmission,
    pub factors: FactorScores,
    pub aggregate: u8,
    pub qualification: Qualification,
    pub estimated_value: u32,
    pub response_sla: ResponseSla,
}

/// Dispatch priority decided by the routing engine. May differ from the
/// scoring SLA; both travel on the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Urgent,
    High,
    Normal,
    Low,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Priority::Urgent => "URGENT",
            Priority::High => "HIGH",
            Priority::Normal => "NORMAL",
            Priority::Low => "LOW",
        }
    }
}

/// Availability state maintained by the external roster-management process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Busy,
    Offline,
}

impl Availability {
    pub const fn label(self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Busy => "busy",
            Availability::Offline => "offline",
        }
    }
}

/// Roster record for one agent: specialty tags, spoken languages, and the
/// mutable load counter the routing engine reserves against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: MemberId,
    pub name: String,
    pub specialties: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub current_load: u32,
    pub max_load: u32,
    pub availability: Availability,
}

impl TeamMember {
    /// Fraction of capacity in use. A zero `max_load` reads as saturated.
    pub fn load_ratio(&self) -> f64 {
        if self.max_load == 0 {
            return 1.0;
        }
        f64::from(self.current_load) / f64::from(self.max_load)
    }

    pub fn has_capacity(&self) -> bool {
        self.current_load < self.max_load
    }

    pub fn matches_specialty(&self, case_key: &str) -> bool {
        self.specialties
            .iter()
            .any(|tag| normalize_key(tag) == case_key)
    }

    pub fn speaks(&self, language: &str) -> bool {
        let wanted = normalize_key(language);
        self.languages.iter().any(|code| normalize_key(code) == wanted)
    }
}

/// How the lead was attached to the team, as a tagged variant so degraded
/// paths stay auditable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    /// A concrete member was selected and one unit of capacity reserved.
    Assigned { member_id: MemberId },
    /// Soft overflow: a member is named despite having no spare capacity or
    /// availability. No capacity was reserved.
    DegradedAssigned { member_id: MemberId },
    /// The team has nobody rostered; the lead waits at team level.
    QueuedAtTeamLevel,
}

impl AssignmentOutcome {
    pub fn member_id(&self) -> Option<&MemberId> {
        match self {
            AssignmentOutcome::Assigned { member_id }
            | AssignmentOutcome::DegradedAssigned { member_id } => Some(member_id),
            AssignmentOutcome::QueuedAtTeamLevel => None,
        }
    }

    pub const fn is_degraded(&self) -> bool {
        matches!(self, AssignmentOutcome::DegradedAssigned { .. })
    }

    pub const fn label(&self) -> &'static str {
        match self {
            AssignmentOutcome::Assigned { .. } => "assigned",
            AssignmentOutcome::DegradedAssigned { .. } => "degraded",
            AssignmentOutcome::QueuedAtTeamLevel => "queued",
        }
    }
}

/// Routing output: team, outcome, priority, reviewer-facing reason, the SLA
/// carried over from scoring, and the ordered escalation alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub team: String,
    pub outcome: AssignmentOutcome,
    pub priority: Priority,
    pub reason: String,
    pub estimated_response: ResponseSla,
    pub alternatives: Vec<String>,
}

/// Canonical lookup key for category labels, specialty tags, and language
/// codes: zero-width characters stripped, whitespace collapsed, lowercased.
pub(crate) fn normalize_key(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}
