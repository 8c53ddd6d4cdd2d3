use clap::Parser;
use edit_checks::cli::{
    handle_analyze, handle_build_seed, handle_classify, handle_create, handle_dry_run,
    handle_explain, handle_export, handle_facets, handle_get, handle_list, handle_metadata, handle_recommend,
    handle_search, handle_suggest, handle_update_code, Cli, Commands,
};
use edit_checks::logging;

fn main() {
    // Before parsing so EDIT_CHECKS_SEED can come from .env
    dotenvy::dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    let seed = cli.seed.as_path();

    let result = match cli.command {
        Commands::Classify { text, json } => handle_classify(text, json),
        Commands::Metadata { description, json } => handle_metadata(description, json),
        Commands::List { active_only, json } => handle_list(seed, active_only, json),
        Commands::Facets { json } => handle_facets(seed, json),
        Commands::Get { id, json } => handle_get(seed, id, json),
        Commands::Search {
            query,
            tag,
            domain,
            active_only,
            json,
        } => handle_search(seed, query, tag, domain, active_only, json),
        Commands::Recommend { domains, tags, json } => handle_recommend(seed, domains, tags, json),
        Commands::DryRun { id, json } => handle_dry_run(seed, id, json),
        Commands::Export { output } => handle_export(seed, output),
        Commands::BuildSeed { input, output } => handle_build_seed(input, output),
        Commands::Suggest {
            name,
            description,
            json,
        } => handle_suggest(name, description, json),
        Commands::Create {
            name,
            description,
            tag,
            children,
            suggest,
            json,
        } => handle_create(name, description, tag, children, suggest, json),
        Commands::Analyze { id, json } => handle_analyze(seed, id, json),
        Commands::Explain { id, json } => handle_explain(seed, id, json),
        Commands::UpdateCode { description, json } => handle_update_code(description, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
