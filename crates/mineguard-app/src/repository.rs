//! Repository adapters for persistence layer

use std::path::{Path, PathBuf};

use mineguard_domain::repository::ScenarioRepository;
use mineguard_domain::service::Fleet;
use mineguard_infra::persistence::FileScenarioRepository;
use mineguard_types::Result;
use tracing::info;

use crate::config::Config;

/// Open file-based scenario repository
pub fn open_scenario_repo(path: PathBuf) -> FileScenarioRepository {
    FileScenarioRepository::new(path)
}

/// Build a fleet from any scenario source
pub fn load_fleet(repo: &impl ScenarioRepository) -> Result<Fleet> {
    let scenario = repo.load()?;
    let fleet = Fleet::from_scenario(&scenario)?;
    info!(
        scenario = scenario.name.as_deref().unwrap_or("(unnamed)"),
        vehicles = fleet.len(),
        "fleet ready"
    );
    Ok(fleet)
}

/// Fleet from `path`, else the configured scenario, else the built-in pit
pub fn open_fleet(config: &Config, path: Option<&Path>) -> Result<Fleet> {
    match path.or(config.scenario_path.as_deref()) {
        Some(path) => load_fleet(&open_scenario_repo(path.to_path_buf())),
        None => {
            info!("using built-in pit fleet");
            Ok(Fleet::default_pit())
        }
    }
}
