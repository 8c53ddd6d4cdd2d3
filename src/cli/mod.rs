mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_analyze, handle_build_seed, handle_classify, handle_create, handle_dry_run,
    handle_explain, handle_export, handle_facets, handle_get, handle_list, handle_metadata, handle_recommend,
    handle_search, handle_suggest, handle_update_code,
};
