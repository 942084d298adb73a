//! Test configuration builder: a TOML file in a temp dir plus a fake environment

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use web_alarm::{Config, ConfigError, ConfigManager};

pub struct TestConfigBuilder {
    temp_dir: TempDir,
    main_toml: Option<String>,
    env: HashMap<String, String>,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            main_toml: None,
            env: HashMap::new(),
        }
    }

    /// Write `content` as config/main.toml
    pub fn with_main_toml(mut self, content: &str) -> Self {
        self.main_toml = Some(content.to_string());
        self
    }

    /// Add a variable to the fake environment
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config").join("main.toml")
    }

    /// Load through the same path the binary uses; the file is optional
    /// unless one was written.
    pub async fn load(self) -> Result<Config, ConfigError> {
        let config_path = self.config_path();
        let required = self.main_toml.is_some();

        if let Some(content) = &self.main_toml {
            fs::create_dir_all(config_path.parent().expect("config dir"))
                .expect("Failed to create config dir");
            fs::write(&config_path, content).expect("Failed to write main.toml");
        }

        let env = self.env;
        ConfigManager::load_configuration(&config_path, required, move |key| env.get(key).cloned())
            .await
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
