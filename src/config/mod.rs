pub mod applicator;
pub mod loader;
pub mod schema;

pub use applicator::{apply_rules, RuleOutcome, RuleReport, RulesApplied};
pub use loader::{load_from_path, load_from_str, ConfigError};
pub use schema::{Metadata, RuleConfig, RuleDefinition, ValidationError, ValidationIssue};
