use crate::domain::a001_category::margins::SystemMargins;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub margins: MarginDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

/// System-wide margin fallback applied when neither a category nor any of
/// its ancestors defines one.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MarginDefaults {
    #[serde(default)]
    pub min_margin_percentage: f64,
    #[serde(default)]
    pub normal_margin_percentage: f64,
}

impl MarginDefaults {
    pub fn as_system_margins(&self) -> SystemMargins {
        SystemMargins {
            min: self.min_margin_percentage,
            normal: self.normal_margin_percentage,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://127.0.0.1:8000/api"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}
