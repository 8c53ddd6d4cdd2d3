pub mod classify;
pub mod cli;
pub mod dry_run;
pub mod entity;
pub mod error;
pub mod export;
pub mod logging;
pub mod recommend;
pub mod search;
pub mod storage;
pub mod suggest;
pub mod validation;
pub mod warnings;

pub use entity::{ChildScenario, ParentScenario, Tag};
pub use error::{EditCheckError, Result};
pub use storage::ScenarioStore;
pub use suggest::{AiConfig, ScenarioGenerator, TextGenerator};
pub use validation::ValidationError;
