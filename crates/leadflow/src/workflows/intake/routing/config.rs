use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::normalize_key;

/// Weights for the candidate fit score. Specialty 40 / language 30 / load 30
/// are tunable policy, not derived constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankWeights {
    pub specialty: f64,
    pub language: f64,
    pub load: f64,
}

/// Immutable routing policy: case category to team, escalation alternatives,
/// and the candidate rank weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Case category -> primary team. Unmapped categories land on
    /// `default_team`.
    pub team_assignments: BTreeMap<String, String>,
    pub default_team: String,
    /// Team -> ordered alternatives for manual escalation, independent of
    /// member availability.
    pub escalation_paths: BTreeMap<String, Vec<String>>,
    pub rank_weights: RankWeights,
}

impl RoutingConfig {
    /// Production routing tables for the firm's teams.
    pub fn standard() -> Self {
        let team_assignments = BTreeMap::from([
            ("personal injury".to_string(), "personal-injury".to_string()),
            ("car accident".to_string(), "personal-injury".to_string()),
            ("criminal defense".to_string(), "criminal-defense".to_string()),
            ("family law".to_string(), "family-law".to_string()),
            ("immigration".to_string(), "immigration".to_string()),
            ("business law".to_string(), "business-law".to_string()),
            ("estate planning".to_string(), "estate-planning".to_string()),
            ("general inquiry".to_string(), "intake".to_string()),
        ]);

        let escalation_paths = BTreeMap::from([
            (
                "personal-injury".to_string(),
                vec!["intake".to_string(), "business-law".to_string()],
            ),
            ("criminal-defense".to_string(), vec!["intake".to_string()]),
            ("family-law".to_string(), vec!["intake".to_string()]),
            ("immigration".to_string(), vec!["intake".to_string()]),
            (
                "business-law".to_string(),
                vec!["estate-planning".to_string(), "intake".to_string()],
            ),
            (
                "estate-planning".to_string(),
                vec!["business-law".to_string(), "intake".to_string()],
            ),
            ("intake".to_string(), Vec::new()),
        ]);

        Self {
            team_assignments,
            default_team: "intake".to_string(),
            escalation_paths,
            rank_weights: RankWeights {
                specialty: 40.0,
                language: 30.0,
                load: 30.0,
            },
        }
    }

    pub(crate) fn team_for(&self, case_type: &str) -> &str {
        self.team_assignments
            .get(&normalize_key(case_type))
            .unwrap_or(&self.default_team)
    }

    pub(crate) fn alternatives(&self, team: &str) -> Vec<String> {
        self.escalation_paths.get(team).cloned().unwrap_or_default()
    }
}
