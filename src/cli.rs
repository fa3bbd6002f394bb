use clap::Parser;
use std::path::PathBuf;

/// Formgen - turns free-text prompts into fillable form schemas
#[derive(Parser, Debug, Clone)]
#[command(name = "formgen", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "FORMGEN_CONFIG", default_value = "formgen.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "FORMGEN_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "FORMGEN_PORT")]
    pub port: Option<u16>,

    /// Generation model identifier
    #[arg(long, env = "FORMGEN_MODEL")]
    pub model: Option<String>,

    /// Environment variable holding the backend API key
    #[arg(long, env = "FORMGEN_API_KEY_ENV")]
    pub api_key_env: Option<String>,
}
