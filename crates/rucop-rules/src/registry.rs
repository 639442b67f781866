//! Cop trait and registry

use rucop_core::{EditPlan, Node, Offense};

use crate::config::Config;

/// One finding from a cop: the offenses it reports and, when the cop
/// can correct it, the edit plan that fixes them as a unit.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub offenses: Vec<Offense>,
    pub plan: Option<EditPlan>,
}

impl Detection {
    pub fn report_only(offenses: Vec<Offense>) -> Self {
        Self {
            offenses,
            plan: None,
        }
    }

    pub fn correctable(offenses: Vec<Offense>, plan: EditPlan) -> Self {
        Self {
            offenses,
            plan: Some(plan),
        }
    }
}

/// A style cop that can detect and optionally correct one pattern
pub trait Cop: Send + Sync {
    /// The unique identifier for this cop (e.g., "rails/action_order")
    fn name(&self) -> &'static str;

    /// A short description of what this cop does
    fn description(&self) -> &'static str;

    /// Check a parsed program and return detections in discovery order
    fn check(&self, program: &[Node], source: &str) -> Vec<Detection>;
}

/// Registry of all available cops
pub struct CopRegistry {
    cops: Vec<Box<dyn Cop>>,
}

impl CopRegistry {
    /// Create a registry with the cops the configuration enables
    pub fn with_config(config: &Config) -> Self {
        let mut registry = Self { cops: Vec::new() };

        if config.action_order.enabled {
            registry.register(Box::new(crate::action_order::ActionOrderCop::new(
                config.action_order.expected_order.clone(),
            )));
        }
        if config.presence.enabled {
            registry.register(Box::new(crate::presence::PresenceCop));
        }

        registry
    }

    /// Register a new cop
    pub fn register(&mut self, cop: Box<dyn Cop>) {
        self.cops.push(cop);
    }

    /// Get all cop names
    pub fn all_names(&self) -> Vec<&'static str> {
        self.cops.iter().map(|c| c.name()).collect()
    }

    /// Get all cops with their descriptions
    pub fn list_cops(&self) -> Vec<(&'static str, &'static str)> {
        self.cops
            .iter()
            .map(|c| (c.name(), c.description()))
            .collect()
    }

    /// Run every registered cop on a program, keeping discovery order.
    ///
    /// Each cop completes its full walk before the next starts.
    pub fn check_all(&self, program: &[Node], source: &str) -> Vec<Detection> {
        let mut detections = Vec::new();
        for cop in &self.cops {
            detections.extend(cop.check(program, source));
        }
        detections
    }
}

impl Default for CopRegistry {
    fn default() -> Self {
        Self::with_config(&Config::default())
    }
}
