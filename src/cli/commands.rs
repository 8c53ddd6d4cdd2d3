use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::entity::Tag;
use crate::storage::seed::DEFAULT_SEED_FILE;

#[derive(Parser, Debug)]
#[command(name = "edit-checks")]
#[command(version, about = "Author, search and AI-draft clinical edit-check scenarios")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Seed file with the out-of-the-box scenario library (JSON or YAML)
    #[arg(long, global = true, env = "EDIT_CHECKS_SEED", default_value = DEFAULT_SEED_FILE)]
    pub seed: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify free text into a scenario tag
    Classify {
        /// Text to classify (scenario name and/or description)
        text: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Derive a scenario name and tag from a description
    Metadata {
        /// Scenario description (at least 70 characters)
        description: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List scenarios
    List {
        /// Only show active scenarios
        #[arg(long)]
        active_only: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the domains and tags available as filters
    Facets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a scenario and its child checks
    Get {
        /// Scenario ID (full UUID or unique prefix like "a1b2c")
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search scenarios
    Search {
        /// Search text; may contain "tag:<name>", "domain:<code>" and "active:true"
        #[arg(default_value = "")]
        query: String,

        /// Only scenarios with this tag on the parent or any child
        #[arg(long)]
        tag: Option<Tag>,

        /// Only scenarios with a child in this domain (e.g. AE)
        #[arg(long)]
        domain: Option<String>,

        /// Only show active scenarios
        #[arg(long)]
        active_only: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recommend scenarios for selected domains and tags
    Recommend {
        /// Domain code or comma-separated codes (can be specified multiple times)
        #[arg(long = "domain", short = 'd')]
        domains: Vec<String>,

        /// Tag name (can be specified multiple times)
        #[arg(long = "tag", short = 't')]
        tags: Vec<Tag>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Simulate running a scenario's checks
    DryRun {
        /// Scenario ID (full UUID or unique prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export all scenarios to CSV
    Export {
        /// Output file; "-" writes to stdout. Defaults to a timestamped file name
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Build a seed file from spreadsheet rows (JSON array or CSV)
    BuildSeed {
        /// Spreadsheet rows exported as JSON or CSV
        input: PathBuf,

        /// Seed file to write
        #[arg(long, short = 'o', default_value = DEFAULT_SEED_FILE)]
        output: PathBuf,
    },

    /// Suggest child checks for a scenario that does not exist yet
    Suggest {
        /// Scenario name
        #[arg(long, default_value = "")]
        name: String,

        /// Scenario description
        description: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a scenario, optionally drafting its child checks
    Create {
        /// Scenario name
        name: String,

        /// Scenario description
        #[arg(long, default_value = "")]
        description: String,

        /// Scenario tag
        #[arg(long)]
        tag: Option<Tag>,

        /// Child check text (can be specified multiple times)
        #[arg(long = "child", short = 'c')]
        children: Vec<String>,

        /// Draft child checks with the text-generation service
        #[arg(long)]
        suggest: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze a scenario's domain patterns and risk
    Analyze {
        /// Scenario ID (full UUID or unique prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Explain why a scenario would be recommended
    Explain {
        /// Scenario ID (full UUID or unique prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Regenerate query text and code from an edited check description
    UpdateCode {
        /// Check description (at least 20 characters)
        description: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
