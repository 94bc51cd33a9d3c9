use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;
use log::info;

mod discovery;
mod node;
mod registry;

pub use discovery::DiscoveryConfig;
pub use node::NodeConfig;
pub use registry::RegistryConfig;

/// Main configuration for a Nearlink node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Node configuration
    pub node: NodeConfig,

    /// Registry configuration
    pub registry: RegistryConfig,

    /// Discovery configuration
    pub discovery: DiscoveryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            registry: RegistryConfig::default(),
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let config_str = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Config = toml::from_str(&config_str)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let config_str = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, config_str)
            .map_err(|e| format!("Failed to write config file: {}", e))?;

        Ok(())
    }

    /// Generate a default configuration file if it doesn't exist
    pub fn generate_default<P: AsRef<Path>>(path: P) -> Result<(), String> {
        let path = path.as_ref();

        if path.exists() {
            info!("Config file already exists at {:?}", path);
            return Ok(());
        }

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create config directory: {}", e))?;
            }
        }

        let config = Config::default();
        config.save(path)?;

        info!("Generated default config at {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn config_round_trips_through_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nearlink.toml");

        let mut config = Config::default();
        config.node.display_name = "Test Node".to_string();
        config.registry.auto_invite_names = vec!["Living Room TV".to_string()];
        config.registry.invite_timeout_secs = 5;

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(loaded.node.display_name, "Test Node");
        assert_eq!(loaded.registry.auto_invite_names, vec!["Living Room TV"]);
        assert_eq!(loaded.registry.invite_timeout_secs, 5);
    }

    #[test]
    fn generate_default_creates_a_loadable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf/nearlink.toml");

        Config::generate_default(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(loaded.registry.invite_timeout_secs, 20);
        assert!(loaded.registry.auto_invite_names.is_empty());
        assert!(loaded.registry.auto_accept);
    }

    #[test]
    fn generate_default_leaves_existing_file_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nearlink.toml");

        let mut config = Config::default();
        config.node.display_name = "Keep Me".to_string();
        config.save(&path).unwrap();

        Config::generate_default(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap().node.display_name, "Keep Me");
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/nearlink.toml").is_err());
    }
}
