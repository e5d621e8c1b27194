use std::collections::BTreeMap;
use std::path::PathBuf;

use config::ConfigError;
use serde::Deserialize;
use serde_json::Value;

use crate::utils;

const CONFIG: &str = include_str!("../../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
}

fn default_frame_rate() -> f64 {
    30.0
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
        }
    }
}

/// Demo module definition. Providers are simulated: every part resolves
/// after `delay_ms`, and a module with `fail` set never loads.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ModuleManifest {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default)]
    pub fail: Option<String>,
    /// Deliver view and state inside a `default` envelope
    #[serde(default)]
    pub wrap_default: bool,
    #[serde(default)]
    pub state: Value,
    /// State keys that get an increment action
    #[serde(default)]
    pub counters: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub initial_module: Option<String>,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleManifest>,
}

impl Config {
    /// Embedded defaults overlaid by `config.{json5,json,yaml,toml,ini}` from
    /// the config directory, when one exists
    pub fn new() -> Result<Self, ConfigError> {
        let data_dir = utils::get_data_dir();
        let config_dir = utils::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("_config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(
                config::File::from(config_dir.join(file))
                    .format(*format)
                    .required(false),
            );
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            log::info!(
                "No configuration file in {}, using defaults",
                config_dir.display()
            );
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        log::info!("Config: {} modules", cfg.modules.len());
        Ok(cfg)
    }

    /// Only the embedded defaults
    pub fn embedded() -> Result<Self, ConfigError> {
        json5::from_str(CONFIG)
            .map_err(|e| ConfigError::Message(format!("Failed to load default config: {e}")))
    }

    /// Configured initial module if it exists, otherwise the first key
    pub fn initial_module(&self) -> Option<String> {
        self.initial_module
            .clone()
            .filter(|key| self.modules.contains_key(key))
            .or_else(|| self.modules.keys().next().cloned())
    }

    /// Keep only `keys`, in the order given. Unknown keys are kept out.
    pub fn select_modules(&mut self, keys: &[String]) {
        if keys.is_empty() {
            return;
        }
        self.modules.retain(|key, _| keys.contains(key));
        self.initial_module = keys
            .iter()
            .find(|key| self.modules.contains_key(*key))
            .cloned();
    }
}
