use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the configured API key.
const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub agents: AgentsConfig,
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AgentsConfig {
    pub defaults: AgentDefaults,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AgentDefaults {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default = "AgentDefaults::default_user_id")]
    pub user_id: String,
}

impl AgentDefaults {
    fn default_user_id() -> String {
        "user123".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub gemini: ProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// File names for the durable store and the audit log.
///
/// Relative names resolve under the config directory; absolute paths
/// are used as given.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_memory_file")]
    pub memory_file: String,
    #[serde(default = "StorageConfig::default_log_file")]
    pub log_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            memory_file: Self::default_memory_file(),
            log_file: Self::default_log_file(),
        }
    }
}

impl StorageConfig {
    fn default_memory_file() -> String {
        "chat_memory.json".to_string()
    }

    fn default_log_file() -> String {
        "chat_log.txt".to_string()
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_dir = Self::config_dir()?;
        let config_path = config_dir.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'breeze init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path)?;
        let mut config: Self = serde_json::from_str(&content)?;

        // Environment wins over the file for the credential.
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.providers.gemini.api_key = key;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Missing credential is fatal before the loop starts.
    pub fn validate(&self) -> anyhow::Result<()> {
        let key = self.providers.gemini.api_key.trim();
        if key.is_empty() || key == "your-gemini-api-key-here" {
            anyhow::bail!(
                "No Gemini API key configured. Set {API_KEY_ENV} or add it to the config file."
            );
        }
        Ok(())
    }

    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("breeze"))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Path to the durable conversation store.
    pub fn memory_path(&self) -> anyhow::Result<PathBuf> {
        Self::resolve(&self.storage.memory_file)
    }

    /// Path to the append-only audit log.
    pub fn log_path(&self) -> anyhow::Result<PathBuf> {
        Self::resolve(&self.storage.log_file)
    }

    fn resolve(name: &str) -> anyhow::Result<PathBuf> {
        let path = PathBuf::from(name);
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(Self::config_dir()?.join(path))
        }
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let config_template = r#"{
  "agents": {
    "defaults": {
      "model": "gemini-2.0-flash",
      "system_prompt": "You are a friendly and witty customer support assistant. Always greet the user by name, and crack light jokes occasionally.",
      "user_id": "user123"
    }
  },
  "providers": {
    "gemini": {
      "api_key": "your-gemini-api-key-here"
    }
  },
  "storage": {
    "memory_file": "chat_memory.json",
    "log_file": "chat_log.txt"
  }
}"#;

        std::fs::write(&config_path, config_template)?;

        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Next steps:");
        println!("   1. Edit the config file and add your Gemini API key");
        println!("      (or export {API_KEY_ENV} instead)");
        println!("   2. Run 'breeze chat' to start a conversation");
        println!();
        Ok(())
    }
}
