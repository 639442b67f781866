//! rucop-rules: Style cops and the autocorrect engine
//!
//! Available cops:
//! - rails/action_order: Order controller actions in the expected order
//! - rails/presence: Replace conditionals on present?/blank? with .presence
//!
//! The engine runs every enabled cop per pass, applies non-conflicting
//! corrections, and repeats on the rewritten source up to a fixed pass
//! bound.

pub mod action_order;
pub mod config;
pub mod engine;
pub mod logging;
pub mod matcher;
pub mod presence;
pub mod registry;
pub mod report;

pub use action_order::ActionOrderCop;
pub use config::{Config, ConfigError, DEFAULT_EXPECTED_ORDER};
pub use engine::{run, Analysis, EngineError, MAX_PASSES};
pub use matcher::{presence_predicate, structural_eq, PresencePredicate};
pub use presence::PresenceCop;
pub use registry::{Cop, CopRegistry, Detection};
pub use report::{diagnostics, to_json, Diagnostic};
