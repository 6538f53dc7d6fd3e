use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::super::domain::normalize_key;

/// Weights applied to the five factor scores when building the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub urgency: f64,
    pub case_value: f64,
    pub completeness: f64,
    pub engagement: f64,
    pub timing: f64,
}

/// Immutable scoring policy injected into the scorer at construction time.
///
/// Every table here is tunable product policy rather than fixed law; the
/// `standard()` constructor carries the production values and tests
/// substitute fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Tier-1 keywords: any substring match forces urgency to 100.
    pub critical_keywords: Vec<String>,
    /// Tier-2 keywords: each match adds `elevated_increment` over the
    /// 50-point baseline, capped at 95.
    pub elevated_keywords: Vec<String>,
    pub elevated_increment: u8,
    /// Case categories treated as inherently urgent.
    pub urgent_case_types: BTreeSet<String>,
    pub urgent_case_bonus: u8,
    /// Case category -> value factor score.
    pub case_values: BTreeMap<String, u8>,
    pub default_case_value: u8,
    /// Keywords signalling a concrete, actionable inquiry.
    pub specificity_keywords: Vec<String>,
    /// Case category -> base estimated case value in whole currency units.
    pub value_bases: BTreeMap<String, u32>,
    pub default_value_base: u32,
    pub weights: FactorWeights,
}

impl ScoringConfig {
    /// Production scoring tables for the firm's practice areas.
    pub fn standard() -> Self {
        Self {
            critical_keywords: string_vec(&[
                "arrest",
                "jail",
                "custody",
                "emergency",
                "ambulance",
                "life threatening",
                "dying",
            ]),
            elevated_keywords: string_vec(&[
                "accident",
                "injured",
                "injury",
                "hospital",
                "police",
                "court",
                "deadline",
                "urgent",
                "asap",
                "immediately",
                "summons",
                "lawsuit",
            ]),
            elevated_increment: 15,
            urgent_case_types: ["personal injury", "car accident", "criminal defense"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            urgent_case_bonus: 10,
            case_values: BTreeMap::from([
                ("personal injury".to_string(), 90),
                ("car accident".to_string(), 85),
                ("criminal defense".to_string(), 80),
                ("business law".to_string(), 70),
                ("family law".to_string(), 65),
                ("immigration".to_string(), 60),
                ("estate planning".to_string(), 55),
                ("general inquiry".to_string(), 30),
            ]),
            default_case_value: 50,
            specificity_keywords: string_vec(&[
                "how much",
                "cost",
                "fee",
                "insurance",
                "settlement",
                "consultation",
                "hire",
                "retain",
                "statute",
                "court date",
                "when",
            ]),
            value_bases: BTreeMap::from([
                ("personal injury".to_string(), 25_000),
                ("car accident".to_string(), 18_000),
                ("criminal defense".to_string(), 10_000),
                ("business law".to_string(), 12_000),
                ("family law".to_string(), 8_000),
                ("immigration".to_string(), 6_000),
                ("estate planning".to_string(), 5_000),
                ("general inquiry".to_string(), 1_500),
            ]),
            default_value_base: 3_000,
            weights: FactorWeights {
                urgency: 0.25,
                case_value: 0.30,
                completeness: 0.15,
                engagement: 0.20,
                timing: 0.10,
            },
        }
    }

    pub(crate) fn case_value(&self, case_type: &str) -> u8 {
        self.case_values
            .get(&normalize_key(case_type))
            .copied()
            .unwrap_or(self.default_case_value)
    }

    pub(crate) fn value_base(&self, case_type: &str) -> u32 {
        self.value_bases
            .get(&normalize_key(case_type))
            .copied()
            .unwrap_or(self.default_value_base)
    }

    pub(crate) fn is_urgent_case_type(&self, case_type: &str) -> bool {
        self.urgent_case_types.contains(&normalize_key(case_type))
    }
}

fn string_vec(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
