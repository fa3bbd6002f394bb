use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub generation: GenerationSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Settings for the generation backend.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GenerationSettings {
    /// Model identifier passed to the backend
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key (GEMINI_API_KEY when unset)
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Override for the backend base URL (useful against local stubs)
    #[serde(default)]
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: None,
            base_url: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Create settings from CLI arguments (config file plus CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(cli.config.clone()).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        Ok(settings)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(model) = &cli.model {
            self.generation.model = model.clone();
        }
        if let Some(api_key_env) = &cli.api_key_env {
            self.generation.api_key_env = Some(api_key_env.clone());
        }
    }

    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = std::path::Path::new(root).join("formgen");
        let s = Config::builder()
            .add_source(File::from(config_path).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        Ok(settings)
    }
}
