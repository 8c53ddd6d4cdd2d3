mod scenario_store;
pub mod seed;

pub use scenario_store::{ScenarioStore, ScenarioUpdate};
pub use seed::{SeedChild, SeedScenario};
