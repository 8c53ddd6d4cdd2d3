use std::fmt::Write;

use super::draft::DraftEnvelope;
use super::parse::MAX_REASONING_CHARS;
use crate::entity::{ParentScenario, Tag};

/// Number of children asked for per request.
pub const TARGET_CHILD_COUNT: usize = 5;

const CDISC_VARIABLES: &[(&str, &str)] = &[
    ("AE", "AETERM, AESTDTC, AEENDTC, AEOUT, AEACN, AESER, AESEV, AEREL"),
    ("CM", "CMTRT, CMSTDTC, CMENDTC, CMINDC, CMDOSE, CMROUTE"),
    ("VS", "VSTESTCD, VSORRES, VSORRESU, VISIT, VSDTC"),
    ("LB", "LBTEST, LBORRES, LBORRESU, LBNRIND, VISIT, LBDTC"),
    ("DM", "AGE, SEX, RACE, ACTARM, RFSTDTC, RFENDTC"),
    ("MH", "MHTERM, MHSTDTC, MHENDTC, MHPRESP"),
];

const WORKED_EXAMPLES: &str = r#"For "AE Outcome and Action Inconsistencies":
1. "AE led to drug withdrawal, but outcome still marked as Not Recovered" - Rule: When AEACN = 'DRUG WITHDRAWN' but AEOUT != 'RECOVERED/RESOLVED'
2. "SAE marked but no action taken on drug" - Rule: When AESER = 'Y' but AEACN is missing or = 'NONE'
3. "Fatal outcome but drug continuation indicated" - Rule: When AEOUT = 'FATAL' but AEACN = 'DRUG CONTINUED'

For "Missing Required Lab Values":
1. "Missing baseline creatinine for renal impairment subjects" - Rule: When MHTERM contains 'RENAL' but baseline LBTEST = 'Creatinine' is missing
2. "Missing liver function tests with hepatotoxic drugs" - Rule: When CMTRT contains a hepatotoxic medication but ALT/AST baseline is missing"#;

const EXAMPLE_RESPONSE: &str = r#"{
  "child_scenarios": [
    {
      "name": "Drug Withdrawn but Not Recovered",
      "description": "Rule: When AEACN = 'DRUG WITHDRAWN' but AEOUT != 'RECOVERED/RESOLVED'",
      "required_cdash_items": ["AEACN", "AEOUT", "SUBJID"],
      "domains": ["AE"],
      "tag": "Safety",
      "reasoning_template": "AEACN is 'DRUG WITHDRAWN', ensure AEOUT is 'RECOVERED/RESOLVED'. Flag where it is not.",
      "pseudo_code": "def check_ae_outcome_action_inconsistency(ae_df):\n    flagged = ae_df[(ae_df['AEACN'] == 'DRUG WITHDRAWN') & (ae_df['AEOUT'] != 'RECOVERED/RESOLVED')]\n    return flagged[['SUBJID', 'AETERM', 'AEACN', 'AEOUT']]"
    }
  ]
}"#;

const REASONING_EXAMPLES: &[&str] = &[
    "AESEV is marked as 'Severe', ensure the CTCAE_GRADE is 3 or higher. Flag where the grade is <3.",
    "For AE records with CTCAE_GRADE = 4 or 5, check AEACN is 'None' or missing.",
    "AESER = 'Y' but AEOUT is blank or missing, verify serious AE has documented outcome.",
];

fn tag_definition(tag: Tag) -> &'static str {
    match tag {
        Tag::Safety => "adverse events, SAEs, safety monitoring, drug interactions, vital sign abnormalities",
        Tag::Efficacy => "treatment response, efficacy endpoints, primary and secondary outcomes",
        Tag::DataQuality => "missing data, completeness, data entry errors, format validation",
        Tag::Compliance => "protocol adherence, visit windows, inclusion and exclusion criteria",
        Tag::ProtocolDeviation => "visit scheduling violations, procedure deviations, consent issues",
        Tag::Other => "general administrative or miscellaneous checks",
    }
}

/// JSON schema of the expected response, pretty-printed.
pub fn output_schema() -> String {
    let schema = schemars::schema_for!(DraftEnvelope);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

pub fn child_system_prompt() -> &'static str {
    "You are an expert clinical data quality assurance specialist. Generate realistic, \
     implementable quality checks based on CDISC standards. Always respond with valid JSON."
}

/// Instruction for generating child edit checks under one parent.
pub fn child_user_message(
    name: &str,
    description: &str,
    tag_hint: Option<Tag>,
    determined: Tag,
) -> String {
    let mut msg = String::new();

    let _ = writeln!(
        msg,
        "You are a clinical data quality expert creating specific edit check rules. \
         Generate {} very specific child scenarios for this parent scenario:\n",
        TARGET_CHILD_COUNT
    );
    let _ = writeln!(msg, "Parent: {}", name);
    let _ = writeln!(msg, "Description: {}", description);
    if let Some(hint) = tag_hint {
        let _ = writeln!(msg, "Tag chosen by the author: {}", hint);
    }
    let _ = writeln!(
        msg,
        "\nBased on the parent scenario content, the primary tag category should be: {}\n",
        determined
    );

    msg.push_str("Each child scenario must be a precise edit check rule with exact conditions, like these examples:\n\n");
    msg.push_str(WORKED_EXAMPLES);
    msg.push_str("\n\nEach rule should:\n");
    for line in [
        "Be very specific with exact field values and conditions",
        "Reference actual CDISC CDASH variable names (AEACN, AEOUT, AESER, AESTDTC, LBTEST, LBORRES, etc.)",
        "State the logical condition clearly (when X = 'VALUE' but Y != 'EXPECTED')",
        "Focus on realistic clinical data validation scenarios",
        "Include a complete Python function that accepts a DataFrame and returns flagged records",
        "Use descriptive function names like check_ae_outcome_inconsistency()",
    ] {
        let _ = writeln!(msg, "- {}", line);
    }

    msg.push_str("\nUse these CDISC domains and variables:\n");
    for (domain, variables) in CDISC_VARIABLES {
        let _ = writeln!(msg, "- {}: {}", domain, variables);
    }

    let _ = writeln!(
        msg,
        "\nAll child scenarios should use the tag \"{}\". Only use a different tag if a \
         specific child clearly belongs to another category:",
        determined
    );
    for tag in Tag::ALL {
        let _ = writeln!(msg, "- \"{}\" - For {}", tag, tag_definition(tag));
    }

    let _ = writeln!(
        msg,
        "\nThe reasoning_template must be a concise clinical validation rule of at most {} characters, for example:",
        MAX_REASONING_CHARS
    );
    for example in REASONING_EXAMPLES {
        let _ = writeln!(msg, "- \"{}\"", example);
    }

    msg.push_str("\nRespond with a single JSON object matching this schema:\n");
    msg.push_str(&output_schema());
    msg.push_str("\n\nExample response:\n");
    msg.push_str(EXAMPLE_RESPONSE);
    msg.push('\n');

    msg
}

pub fn analysis_system_prompt() -> &'static str {
    "You are a clinical data analysis expert. Analyze scenarios for data patterns and risk assessment."
}

pub fn domain_analysis_message(
    scenario: &ParentScenario,
    domains: &[String],
    cdash_fields: &[&str],
) -> String {
    format!(
        r#"Analyze the clinical scenario "{name}" for domain data patterns and risk assessment.

Scenario Description: {description}
Domains Involved: {domains}
CDASH Fields: {fields}
Child Scenarios: {count}

Provide analysis in JSON format:
{{
  "patterns": ["pattern1", "pattern2", "pattern3"],
  "domains": ["domain1", "domain2"],
  "risk_level": "High|Medium|Low",
  "risk_explanation": "explanation of risk assessment"
}}
"#,
        name = scenario.name,
        description = scenario.description,
        domains = domains.join(", "),
        fields = cdash_fields.join(", "),
        count = scenario.child_scenarios.len(),
    )
}

pub fn thinking_system_prompt() -> &'static str {
    "You are an AI clinical scenario recommendation expert. Explain your reasoning for scenario selection."
}

pub fn model_thinking_message(scenario: &ParentScenario) -> String {
    let domains: Vec<&str> = scenario.domains().into_iter().collect();
    format!(
        r#"Explain the reasoning for recommending the clinical scenario "{name}".

Scenario: {name}
Description: {description}
Tag: {tag}
Domains: {domains}
Number of Child Scenarios: {count}

Provide reasoning in JSON format:
{{
  "selection_reasoning": "why this scenario was recommended",
  "priority_logic": "explanation of priority assessment",
  "implementation_steps": ["step1", "step2", "step3"]
}}
"#,
        name = scenario.name,
        description = scenario.description,
        tag = scenario.tag_name().unwrap_or("Not specified"),
        domains = domains.join(", "),
        count = scenario.child_scenarios.len(),
    )
}
