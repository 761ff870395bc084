//! File-based implementation of ScenarioRepository

use std::fs;
use std::path::{Path, PathBuf};

use mineguard_domain::model::Scenario;
use mineguard_domain::repository::ScenarioRepository;
use mineguard_types::{Error, Result};
use tracing::debug;

/// Scenario stored as a TOML file
pub struct FileScenarioRepository {
    path: PathBuf,
}

impl FileScenarioRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse scenario TOML text
    pub fn parse(text: &str) -> Result<Scenario> {
        Ok(toml::from_str(text)?)
    }

    /// Write a scenario back out as TOML
    pub fn save(&self, scenario: &Scenario) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(scenario)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl ScenarioRepository for FileScenarioRepository {
    fn load(&self) -> Result<Scenario> {
        if !self.path.exists() {
            return Err(Error::FileNotFound(self.path.display().to_string()));
        }

        let content = fs::read_to_string(&self.path)?;
        let scenario = Self::parse(&content)?;
        debug!(
            path = %self.path.display(),
            waypoints = scenario.waypoints.len(),
            vehicles = scenario.vehicles.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
        name = "two trucks"

        [[waypoints]]
        name = "A"
        latitude = -20.0
        longitude = -44.0
        altitude = 900.0

        [[waypoints]]
        name = "B"
        latitude = -19.999
        longitude = -44.0

        [[vehicles]]
        id = "HT-1"
        category = "haul_truck"
        start = "A"
        route = ["A", "B"]
        waypoint_index = 1
        cycle_state = "hauling"
        target_speed = 30.0

        [[vehicles]]
        id = "LV-1"
        category = "light_vehicle"
        start = "B"
        active = false
    "#;

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        fs::write(&path, SAMPLE).unwrap();

        let scenario = FileScenarioRepository::new(&path).load().unwrap();
        assert_eq!(scenario.name.as_deref(), Some("two trucks"));
        assert_eq!(scenario.waypoints.len(), 2);
        assert_eq!(scenario.waypoints[1].altitude, 0.0);
        assert_eq!(scenario.vehicles[0].route, vec!["A", "B"]);
        assert!(!scenario.vehicles[1].active);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let repo = FileScenarioRepository::new(dir.path().join("absent.toml"));
        assert!(matches!(repo.load(), Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[[vehicles]]\nid = 12").unwrap();
        assert!(matches!(
            FileScenarioRepository::new(&path).load(),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let repo = FileScenarioRepository::new(dir.path().join("nested").join("s.toml"));
        let scenario = FileScenarioRepository::parse(SAMPLE).unwrap();

        repo.save(&scenario).unwrap();
        assert_eq!(repo.load().unwrap(), scenario);
    }
}
