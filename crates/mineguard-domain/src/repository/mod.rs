//! Repository trait definitions for fleet setup sources

use crate::model::Scenario;
use mineguard_types::Error;

/// Source of a fleet setup
pub trait ScenarioRepository {
    /// Load the scenario
    fn load(&self) -> Result<Scenario, Error>;
}

/// Scenario held in memory, e.g. one built by a test
#[derive(Debug, Clone, Default)]
pub struct InMemoryScenario(pub Scenario);

impl ScenarioRepository for InMemoryScenario {
    fn load(&self) -> Result<Scenario, Error> {
        Ok(self.0.clone())
    }
}
