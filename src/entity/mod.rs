mod child;
mod parent;
mod tag;

pub use child::{split_list, ChildScenario};
pub use parent::ParentScenario;
pub use tag::Tag;

/// Version string stamped on newly created scenarios.
pub const DEFAULT_VERSION: &str = "1.0";
