//! AI-assisted drafting of child edit checks and scenario analyses.
//!
//! Every public operation here returns a usable result even when the
//! generation service is down or answers with garbage: failures are logged
//! and replaced by deterministic substitutes.

mod analysis;
mod config;
mod draft;
mod engine;
mod parse;
mod prompt;

pub use analysis::{analysis_domains, DomainAnalysis, ModelThinking, RiskLevel};
pub use config::AiConfig;
pub use draft::{drafts_to_children, ChildDraft, ChildSuggestion, DraftEnvelope};
pub use engine::{GenerationRequest, OpenAiClient, ResponseFormat, TextGenerator};
pub use parse::MAX_REASONING_CHARS;

use serde::{Deserialize, Serialize};

use crate::classify::determine_scenario_tag;
use crate::entity::{ParentScenario, Tag};
use crate::error::{EditCheckError, Result};
use crate::validation::{validate_description, ValidationError, MIN_CODE_UPDATE_DESCRIPTION_LEN};

const CODE_UPDATE_PARENT_NAME: &str = "Updated Scenario";
const DEFAULT_QUERY_TEXT: &str = "Find subjects meeting the specified validation criteria";
const DEFAULT_PYTHON_CODE: &str = "def check_validation_rule(df):\n    # Generated code\n    return df";

/// Query text and code regenerated from an edited description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeUpdate {
    pub query_text: String,
    pub python_code: String,
}

/// The single draft used when generation fails.
pub fn fallback_drafts(name: &str, description: &str) -> Vec<ChildDraft> {
    vec![ChildDraft {
        name: format!("Basic {} Check", name),
        description: format!(
            "Performs basic validation checks related to {}",
            description.to_lowercase()
        ),
        required_cdash_items: vec!["SUBJID".to_string(), "VISIT".to_string()],
        rule_description: None,
        domains: vec!["DM".to_string()],
        tag: Tag::DataQuality.name().to_string(),
        reasoning_template: "Basic validation failed for subject {SUBJID} at visit {VISIT}".to_string(),
        pseudo_code: None,
    }]
}

pub struct ScenarioGenerator<G = OpenAiClient> {
    generator: G,
    config: AiConfig,
}

impl ScenarioGenerator<OpenAiClient> {
    /// Build the HTTP-backed generator. Fails without an API key.
    pub fn from_env() -> Result<Self> {
        let config = AiConfig::from_env()?;
        Self::from_config(config)
    }

    pub fn from_config(config: AiConfig) -> Result<Self> {
        let client = OpenAiClient::new(&config)?;
        Ok(Self::new(client, config))
    }
}

impl<G: TextGenerator> ScenarioGenerator<G> {
    pub fn new(generator: G, config: AiConfig) -> Self {
        Self { generator, config }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Run `attempt` once plus up to `max_retries` more times.
    fn with_retries<T>(&self, what: &str, mut attempt: impl FnMut() -> Result<T>) -> Result<T> {
        let attempts = self.config.max_retries.saturating_add(1);
        let mut last_error = None;
        for n in 1..=attempts {
            match attempt() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::debug!(attempt = n, error = %e, "{} attempt failed", what);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| EditCheckError::Generation(format!("{} was not attempted", what))))
    }

    fn request(&self, system: &str, user: String, max_tokens: u32, temperature: Option<f32>) -> GenerationRequest {
        GenerationRequest {
            system: system.to_string(),
            user,
            model: self.config.model.clone(),
            response_format: ResponseFormat::JsonObject,
            max_tokens,
            temperature,
        }
    }

    fn try_child_drafts(&self, name: &str, description: &str, tag_hint: Option<Tag>) -> Result<Vec<ChildDraft>> {
        let determined = determine_scenario_tag(name, description);
        let user = prompt::child_user_message(name, description, tag_hint, determined);
        let request = self.request(
            prompt::child_system_prompt(),
            user,
            self.config.max_tokens,
            Some(self.config.temperature),
        );

        self.with_retries("child generation", || {
            let raw = self.generator.generate(&request)?;
            parse::parse_child_drafts(&raw)
        })
    }

    /// Draft child edit checks for a parent. Never fails; on any error the
    /// single fallback draft is returned.
    pub fn generate_child_scenarios(
        &self,
        name: &str,
        description: &str,
        tag_hint: Option<Tag>,
    ) -> Vec<ChildDraft> {
        match self.try_child_drafts(name, description, tag_hint) {
            Ok(drafts) => {
                tracing::debug!(count = drafts.len(), parent = name, "generated child drafts");
                drafts
            }
            Err(e) => {
                tracing::warn!(error = %e, parent = name, "child generation failed, using fallback");
                fallback_drafts(name, description)
            }
        }
    }

    /// Patterns and risk assessment for a scenario. Never fails.
    pub fn domain_analysis(&self, scenario: &ParentScenario) -> DomainAnalysis {
        let domains = analysis_domains(scenario);
        let fields: Vec<&str> = scenario.cdash_items().into_iter().collect();
        let request = self.request(
            prompt::analysis_system_prompt(),
            prompt::domain_analysis_message(scenario, &domains, &fields),
            self.config.analysis_max_tokens,
            None,
        );

        let result = self.with_retries("domain analysis", || {
            let raw = self.generator.generate(&request)?;
            parse::parse_json_object::<DomainAnalysis>(&raw)
        });
        match result {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(error = %e, scenario = %scenario.name, "domain analysis failed, using fallback");
                DomainAnalysis::fallback(domains)
            }
        }
    }

    /// Recommendation reasoning for a scenario. Never fails.
    pub fn model_thinking(&self, scenario: &ParentScenario) -> ModelThinking {
        let request = self.request(
            prompt::thinking_system_prompt(),
            prompt::model_thinking_message(scenario),
            self.config.analysis_max_tokens,
            None,
        );

        let result = self.with_retries("model thinking", || {
            let raw = self.generator.generate(&request)?;
            parse::parse_json_object::<ModelThinking>(&raw)
        });
        match result {
            Ok(thinking) => thinking,
            Err(e) => {
                tracing::warn!(error = %e, scenario = %scenario.name, "model thinking failed, using fallback");
                ModelThinking::default()
            }
        }
    }

    /// Regenerate query text and code for an edited child description.
    pub fn code_update(&self, description: &str) -> std::result::Result<CodeUpdate, ValidationError> {
        validate_description(description, MIN_CODE_UPDATE_DESCRIPTION_LEN)?;

        let first = self
            .generate_child_scenarios(CODE_UPDATE_PARENT_NAME, description, None)
            .into_iter()
            .next();

        let query_text = first
            .as_ref()
            .map(|d| d.reasoning_template.clone())
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_QUERY_TEXT.to_string());
        let python_code = first
            .and_then(|d| d.pseudo_code)
            .filter(|code| !code.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PYTHON_CODE.to_string());

        Ok(CodeUpdate {
            query_text,
            python_code,
        })
    }

    /// Suggestions for the create form, before the parent exists.
    pub fn suggest_for_form(
        &self,
        name: &str,
        description: &str,
    ) -> std::result::Result<Vec<ChildSuggestion>, ValidationError> {
        if description.trim().is_empty() {
            return Err(ValidationError::DescriptionRequired);
        }
        Ok(self
            .generate_child_scenarios(name, description, None)
            .iter()
            .map(ChildSuggestion::from)
            .collect())
    }
}
