use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::ParentScenario;

/// Domains assumed when a scenario has no children yet.
const DEFAULT_ANALYSIS_DOMAINS: [&str; 3] = ["DM", "AE", "EX"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::Low => write!(f, "Low"),
        }
    }
}

/// Data patterns and risk of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainAnalysis {
    pub patterns: Vec<String>,
    pub domains: Vec<String>,
    pub risk_level: RiskLevel,
    pub risk_explanation: String,
}

impl DomainAnalysis {
    pub fn fallback(domains: Vec<String>) -> Self {
        Self {
            patterns: vec![
                "Cross-domain data consistency checks".to_string(),
                "Safety signal validation patterns".to_string(),
                "Regulatory compliance verification".to_string(),
            ],
            domains,
            risk_level: RiskLevel::Medium,
            risk_explanation: "Standard clinical data validation scenario with moderate complexity"
                .to_string(),
        }
    }
}

/// Why a scenario is recommended and how to roll it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelThinking {
    pub selection_reasoning: String,
    pub priority_logic: String,
    pub implementation_steps: Vec<String>,
}

impl Default for ModelThinking {
    fn default() -> Self {
        Self {
            selection_reasoning: "Selected based on high relevance to specified clinical domains and comprehensive data validation coverage".to_string(),
            priority_logic: "Prioritized due to critical safety implications and regulatory compliance requirements".to_string(),
            implementation_steps: vec![
                "Review scenario specifications and requirements".to_string(),
                "Configure data validation rules and thresholds".to_string(),
                "Test scenario against sample clinical data".to_string(),
                "Deploy to production environment with monitoring".to_string(),
            ],
        }
    }
}

/// Sorted child domains, or `DM, AE, EX` for a childless scenario.
pub fn analysis_domains(scenario: &ParentScenario) -> Vec<String> {
    let domains = scenario.domains();
    if domains.is_empty() {
        DEFAULT_ANALYSIS_DOMAINS.iter().map(|d| d.to_string()).collect()
    } else {
        domains.into_iter().map(str::to_string).collect()
    }
}
