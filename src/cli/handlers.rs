use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::classify::{classify_tag, scenario_metadata};
use crate::dry_run::dry_run;
use crate::entity::{split_list, ChildScenario, ParentScenario, Tag};
use crate::error::{EditCheckError, Result};
use crate::export::{export_file_name, write_csv};
use crate::recommend::{recommend, RecommendCriteria};
use crate::search::parse_query;
use crate::storage::seed::{build_from_rows, write_seed, SeedRow};
use crate::storage::ScenarioStore;
use crate::suggest::{drafts_to_children, ScenarioGenerator};
use crate::validation::{validate_child_text, validate_new_scenario};
use crate::warnings::format_warning;

/// Load the scenario library, reporting seed problems on stderr.
fn open_store(seed: &Path) -> ScenarioStore {
    let (store, warnings) = ScenarioStore::from_seed(seed);
    for warning in &warnings {
        eprintln!("{}", format_warning(warning));
    }
    store
}

fn find_scenario<'a>(store: &'a ScenarioStore, id: &str) -> Result<&'a ParentScenario> {
    store
        .find(id)
        .ok_or_else(|| EditCheckError::ScenarioNotFound(id.to_string()))
}

fn short_id(scenario: &ParentScenario) -> String {
    scenario.id.to_string()[..8].to_string()
}

fn print_scenario_line(s: &ParentScenario) {
    let mut flags = Vec::new();
    if s.is_ootb {
        flags.push("OOTB");
    }
    if !s.is_active {
        flags.push("inactive");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" ({})", flags.join(", "))
    };

    println!(
        "  ({}) [{}] {}{} - {} checks",
        short_id(s),
        s.tag_name().unwrap_or("-"),
        s.name,
        flags,
        s.child_scenarios.len()
    );
}

fn print_scenarios(scenarios: &[&ParentScenario], json: bool, empty_message: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(scenarios)?);
    } else if scenarios.is_empty() {
        println!("{}", empty_message);
    } else {
        for s in scenarios {
            print_scenario_line(s);
        }
    }
    Ok(())
}

pub fn handle_classify(text: String, json: bool) -> Result<()> {
    let tag = classify_tag(&text);
    if json {
        println!("{}", serde_json::json!({ "tag": tag }));
    } else {
        println!("{}", tag);
    }
    Ok(())
}

pub fn handle_metadata(description: String, json: bool) -> Result<()> {
    let metadata = scenario_metadata(&description)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else {
        println!("Name: {}", metadata.name);
        println!("Tag: {}", metadata.tag);
    }
    Ok(())
}

pub fn handle_list(seed: &Path, active_only: bool, json: bool) -> Result<()> {
    let store = open_store(seed);
    let scenarios: Vec<&ParentScenario> = store
        .all()
        .iter()
        .filter(|s| !active_only || s.is_active)
        .collect();

    if !json && !scenarios.is_empty() {
        println!("Scenarios:\n");
    }
    print_scenarios(&scenarios, json, "No scenarios found.")
}

pub fn handle_facets(seed: &Path, json: bool) -> Result<()> {
    let store = open_store(seed);
    let domains = store.all_domains();
    let tags = store.all_tags();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "domains": domains, "tags": tags }))?
        );
    } else {
        println!("Domains: {}", domains.into_iter().collect::<Vec<_>>().join(", "));
        println!(
            "Tags: {}",
            tags.iter().map(Tag::name).collect::<Vec<_>>().join(", ")
        );
    }
    Ok(())
}

pub fn handle_get(seed: &Path, id: String, json: bool) -> Result<()> {
    let store = open_store(seed);
    let s = find_scenario(&store, &id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(s)?);
        return Ok(());
    }

    println!("Scenario ({})", s.id);
    println!("Name: {}", s.name);
    println!("Tag: {}", s.tag_name().unwrap_or("-"));
    println!("Active: {}", if s.is_active { "yes" } else { "no" });
    println!("Out of the box: {}", if s.is_ootb { "yes" } else { "no" });
    println!("Created: {}", s.created_at.format("%Y-%m-%d %H:%M"));
    if !s.description.is_empty() {
        println!("\n{}", s.description);
    }

    if !s.child_scenarios.is_empty() {
        println!("\nChecks:");
        for (i, child) in s.child_scenarios.iter().enumerate() {
            println!(
                "\n  {}. [{}] {}",
                i + 1,
                child.tag_name().unwrap_or("-"),
                child.scenario_text
            );
            if !child.domains.is_empty() {
                println!("     domains: {}", child.domains.join(", "));
            }
            if !child.required_cdash_items.is_empty() {
                println!("     fields: {}", child.required_cdash_items.join(", "));
            }
            if !child.reasoning_template.is_empty() {
                println!("     query: {}", child.reasoning_template);
            }
        }
    }

    Ok(())
}

pub fn handle_search(
    seed: &Path,
    query: String,
    tag: Option<Tag>,
    domain: Option<String>,
    active_only: bool,
    json: bool,
) -> Result<()> {
    let store = open_store(seed);

    let mut filter = parse_query(&query);
    if let Some(tag) = tag {
        filter = filter.with_tag(tag);
    }
    if let Some(domain) = domain {
        filter = filter.with_domain(domain.to_uppercase());
    }
    if active_only {
        filter = filter.active_only();
    }

    let results = store.search(&filter);
    if !json && !results.is_empty() {
        println!("Search results for '{}':\n", query);
    }
    print_scenarios(&results, json, &format!("No results found for '{}'.", query))
}

pub fn handle_recommend(seed: &Path, domains: Vec<String>, tags: Vec<Tag>, json: bool) -> Result<()> {
    let domains = domains
        .iter()
        .flat_map(|d| split_list(d))
        .map(|d| d.to_uppercase());
    let criteria = RecommendCriteria::new(domains, tags);
    criteria.validate()?;

    let store = open_store(seed);
    let recommendations = recommend(store.all(), &criteria);

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else if recommendations.is_empty() {
        println!("No matching scenarios.");
    } else {
        println!("Recommended scenarios:\n");
        for r in &recommendations {
            println!(
                "  {:>2}  ({}) [{}] {}",
                r.score,
                short_id(r.scenario),
                r.scenario.tag_name().unwrap_or("-"),
                r.scenario.name
            );
            for reason in &r.reasons {
                println!("        {}", reason);
            }
        }
    }

    Ok(())
}

pub fn handle_dry_run(seed: &Path, id: String, json: bool) -> Result<()> {
    let store = open_store(seed);
    let report = dry_run(find_scenario(&store, &id)?);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for detail in &report.details {
            println!(
                "  passed  {} (fields: {}, domains: {})",
                detail.child_scenario, detail.required_items_found, detail.domains_validated
            );
        }
        println!("{}", report.summary());
    }
    Ok(())
}

pub fn handle_export(seed: &Path, output: Option<PathBuf>) -> Result<()> {
    let store = open_store(seed);

    match output {
        Some(path) if path.as_os_str() == "-" => {
            write_csv(store.all(), io::stdout().lock())?;
        }
        output => {
            let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(Utc::now())));
            let rows = write_csv(store.all(), File::create(&path)?)?;
            println!("Exported {} rows to {}", rows, path.display());
        }
    }
    Ok(())
}

fn read_seed_rows(input: &Path) -> Result<Vec<SeedRow>> {
    let is_csv = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        let mut reader = csv::Reader::from_path(input)?;
        let rows = reader.deserialize().collect::<std::result::Result<Vec<SeedRow>, _>>()?;
        Ok(rows)
    } else {
        let file = File::open(input)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

pub fn handle_build_seed(input: PathBuf, output: PathBuf) -> Result<()> {
    let rows = read_seed_rows(&input)?;
    let records = build_from_rows(&rows);
    write_seed(&records, File::create(&output)?)?;

    let checks: usize = records.iter().map(|r| r.children.len()).sum();
    println!(
        "Wrote {} scenarios ({} checks) from {} rows to {}",
        records.len(),
        checks,
        rows.len(),
        output.display()
    );
    Ok(())
}

pub fn handle_suggest(name: String, description: String, json: bool) -> Result<()> {
    let generator = ScenarioGenerator::from_env()?;
    let suggestions = generator.suggest_for_form(&name, &description)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else {
        for (i, s) in suggestions.iter().enumerate() {
            println!("{}. [{}] {}", i + 1, s.tag, s.scenario_text);
            if !s.domains.is_empty() {
                println!("   domains: {}", s.domains.join(", "));
            }
            if !s.required_cdash_items.is_empty() {
                println!("   fields: {}", s.required_cdash_items.join(", "));
            }
            println!("   query: {}", s.reasoning_template);
        }
    }
    Ok(())
}

pub fn handle_create(
    name: String,
    description: String,
    tag: Option<Tag>,
    children: Vec<String>,
    suggest: bool,
    json: bool,
) -> Result<()> {
    validate_new_scenario(&name)?;
    for text in &children {
        validate_child_text(text)?;
    }

    let mut scenario = ParentScenario::new(name.trim().to_string(), description, tag);
    scenario.child_scenarios = children
        .into_iter()
        .map(|text| ChildScenario::new(text.trim().to_string()))
        .collect();

    if suggest {
        let generator = ScenarioGenerator::from_env()?;
        let drafts = generator.generate_child_scenarios(&scenario.name, &scenario.description, tag);
        scenario.child_scenarios.extend(drafts_to_children(drafts));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&scenario)?);
    } else {
        println!("Created scenario ({}) {}", short_id(&scenario), scenario.name);
        for child in &scenario.child_scenarios {
            println!("  - [{}] {}", child.tag_name().unwrap_or("-"), child.scenario_text);
        }
    }
    Ok(())
}

pub fn handle_analyze(seed: &Path, id: String, json: bool) -> Result<()> {
    let store = open_store(seed);
    let scenario = find_scenario(&store, &id)?;
    let analysis = ScenarioGenerator::from_env()?.domain_analysis(scenario);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("Risk: {}", analysis.risk_level);
        println!("  {}", analysis.risk_explanation);
        println!("Domains: {}", analysis.domains.join(", "));
        println!("Patterns:");
        for pattern in &analysis.patterns {
            println!("  - {}", pattern);
        }
    }
    Ok(())
}

pub fn handle_explain(seed: &Path, id: String, json: bool) -> Result<()> {
    let store = open_store(seed);
    let scenario = find_scenario(&store, &id)?;
    let thinking = ScenarioGenerator::from_env()?.model_thinking(scenario);

    if json {
        println!("{}", serde_json::to_string_pretty(&thinking)?);
    } else {
        println!("Why: {}", thinking.selection_reasoning);
        println!("Priority: {}", thinking.priority_logic);
        println!("Steps:");
        for (i, step) in thinking.implementation_steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }
    Ok(())
}

pub fn handle_update_code(description: String, json: bool) -> Result<()> {
    let generator = ScenarioGenerator::from_env()?;
    let update = generator.code_update(&description)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&update)?);
    } else {
        println!("Query: {}\n", update.query_text);
        println!("{}", update.python_code);
    }
    Ok(())
}
